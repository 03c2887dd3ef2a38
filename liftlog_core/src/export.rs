//! CSV export of the progress ledger.
//!
//! One row per logged set, so the file opens directly in a spreadsheet.

use crate::types::ProgressEntry;
use crate::Result;
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    body_weight: f64,
    plan_id: Option<&'a str>,
    day_id: Option<&'a str>,
    exercise: &'a str,
    pattern: Option<&'a str>,
    set_number: usize,
    weight: f64,
    reps: u32,
    rir: u32,
}

/// Write entries as CSV to any writer; returns the number of rows
pub fn write_history<W: Write>(entries: &[ProgressEntry], writer: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for entry in entries {
        let date = entry.date_key();
        for exercise in &entry.logged_exercises {
            for (i, set) in exercise.logged_sets.iter().enumerate() {
                writer.serialize(CsvRow {
                    date: date.clone(),
                    body_weight: entry.body_weight,
                    plan_id: entry.selected_plan_id.as_deref(),
                    day_id: entry.selected_plan_day_id.as_deref(),
                    exercise: &exercise.name,
                    pattern: exercise.movement_pattern_name.as_deref(),
                    set_number: i + 1,
                    weight: set.weight,
                    reps: set.reps,
                    rir: set.rir,
                })?;
                rows += 1;
            }
        }
    }

    writer.flush()?;
    Ok(rows)
}

/// Export entries to a CSV file, replacing it
pub fn export_history(entries: &[ProgressEntry], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    let rows = write_history(entries, std::io::BufWriter::new(file))?;
    tracing::info!("Exported {} sets to {:?}", rows, path);
    Ok(rows)
}
