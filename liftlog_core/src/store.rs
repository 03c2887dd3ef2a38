//! Document persistence.
//!
//! The core talks to storage through [`DocumentStore`], a small
//! document/collection interface keyed by slash-separated paths such as
//! `users/u1/progress/2024-01-01`. Two backends are provided:
//! - [`JsonFileStore`]: one JSON file per document with file locking
//! - [`MemoryStore`]: in-process map, used by tests

use crate::{Error, Result};
use fs2::FileExt;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Sort direction for collection queries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Document store trait for persisting ledger, stats and plans
pub trait DocumentStore {
    /// Read a document; `None` if absent
    fn get_document(&self, path: &str) -> Result<Option<Value>>;

    /// Whether anything is stored at `path`, readable or not
    fn document_exists(&self, path: &str) -> Result<bool> {
        Ok(self.get_document(path)?.is_some())
    }

    /// Write a document, replacing any previous value
    fn set_document(&mut self, path: &str, value: Value) -> Result<()>;

    /// Read every document directly under `path`, sorted by a field
    fn query_collection(
        &self,
        path: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<(String, Value)>>;

    /// Write several documents; none are written if staging fails
    fn batch_write(&mut self, writes: Vec<(String, Value)>) -> Result<()>;
}

/// Document paths used by the core
pub mod paths {
    pub const PREDEFINED_PLANS: &str = "predefined_plans";

    pub fn plan(plan_id: &str) -> String {
        format!("{}/{}", PREDEFINED_PLANS, plan_id)
    }

    pub fn progress_collection(user_id: &str) -> String {
        format!("users/{}/progress", user_id)
    }

    pub fn progress(user_id: &str, date_key: &str) -> String {
        format!("users/{}/progress/{}", user_id, date_key)
    }

    pub fn stats(user_id: &str) -> String {
        format!("users/{}/stats", user_id)
    }

    pub fn profile(user_id: &str) -> String {
        format!("users/{}/profile", user_id)
    }
}

/// Reject empty segments and anything that could escape the store root
fn check_path(path: &str) -> Result<()> {
    let ok = !path.is_empty()
        && path
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != ".." && !seg.contains('\\'));
    if ok {
        Ok(())
    } else {
        Err(Error::Persistence(format!("invalid document path '{}'", path)))
    }
}

fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn sort_documents(docs: &mut [(String, Value)], order_by: &str, direction: Direction) {
    docs.sort_by(|(_, a), (_, b)| {
        let ord = compare_field(a, b, order_by);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}

// ============================================================================
// JSON file backend
// ============================================================================

/// JSON-file document store with file locking
///
/// Documents live at `<root>/<path>.json`; a collection is the directory
/// `<root>/<path>/`.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at a directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn document_path(&self, path: &str) -> PathBuf {
        self.root.join(format!("{}.json", path))
    }

    fn read_locked(file_path: &std::path::Path) -> Result<String> {
        let file = File::open(file_path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;
        Ok(contents)
    }

    /// Write to a temp file next to the target, ready to be persisted
    fn stage(&self, path: &str, value: &Value) -> Result<(NamedTempFile, PathBuf)> {
        check_path(path)?;
        let target = self.document_path(path);
        let parent = target.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "document path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        // Acquire exclusive lock on the temp file to serialize concurrent writers
        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(value)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        Ok((temp, target))
    }
}

impl DocumentStore for JsonFileStore {
    fn get_document(&self, path: &str) -> Result<Option<Value>> {
        check_path(path)?;
        let file_path = self.document_path(path);
        if !file_path.exists() {
            return Ok(None);
        }

        let contents = Self::read_locked(&file_path)?;
        match serde_json::from_str(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded document {}", path);
                Ok(Some(value))
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse document {:?}: {}. Treating as absent.",
                    file_path,
                    e
                );
                Ok(None)
            }
        }
    }

    fn document_exists(&self, path: &str) -> Result<bool> {
        check_path(path)?;
        Ok(self.document_path(path).exists())
    }

    fn set_document(&mut self, path: &str, value: Value) -> Result<()> {
        let (temp, target) = self.stage(path, &value)?;
        // Atomically replace the old document
        temp.persist(&target).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved document {}", path);
        Ok(())
    }

    fn query_collection(
        &self,
        path: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<(String, Value)>> {
        check_path(path)?;
        let dir = self.root.join(path);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut docs = Vec::new();
        for dir_entry in std::fs::read_dir(&dir)? {
            let file_path = dir_entry?.path();
            if file_path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = file_path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let id = id.to_string();

            let contents = Self::read_locked(&file_path)?;
            match serde_json::from_str::<Value>(&contents) {
                Ok(value) => docs.push((id, value)),
                Err(e) => {
                    tracing::warn!("Skipping unreadable document {:?}: {}", file_path, e);
                    // Continue reading, don't fail the whole query
                }
            }
        }

        sort_documents(&mut docs, order_by, direction);
        tracing::debug!("Queried {} documents from {}", docs.len(), path);
        Ok(docs)
    }

    fn batch_write(&mut self, writes: Vec<(String, Value)>) -> Result<()> {
        // Stage everything first so a serialization or disk error writes nothing
        let staged = writes
            .iter()
            .map(|(path, value)| self.stage(path, value))
            .collect::<Result<Vec<_>>>()?;

        let count = staged.len();
        for (temp, target) in staged {
            temp.persist(&target).map_err(|e| Error::Io(e.error))?;
        }
        tracing::debug!("Batch wrote {} documents", count);
        Ok(())
    }
}

// ============================================================================
// In-memory backend
// ============================================================================

/// In-memory document store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    documents: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn get_document(&self, path: &str) -> Result<Option<Value>> {
        check_path(path)?;
        Ok(self.documents.get(path).cloned())
    }

    fn set_document(&mut self, path: &str, value: Value) -> Result<()> {
        check_path(path)?;
        self.documents.insert(path.to_string(), value);
        Ok(())
    }

    fn query_collection(
        &self,
        path: &str,
        order_by: &str,
        direction: Direction,
    ) -> Result<Vec<(String, Value)>> {
        check_path(path)?;
        let prefix = format!("{}/", path);
        let mut docs: Vec<_> = self
            .documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter_map(|(key, value)| {
                let id = &key[prefix.len()..];
                (!id.contains('/')).then(|| (id.to_string(), value.clone()))
            })
            .collect();
        sort_documents(&mut docs, order_by, direction);
        Ok(docs)
    }

    fn batch_write(&mut self, writes: Vec<(String, Value)>) -> Result<()> {
        for (path, _) in &writes {
            check_path(path)?;
        }
        self.documents.extend(writes);
        Ok(())
    }
}
