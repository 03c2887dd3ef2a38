//! Date-keyed progress ledger.
//!
//! One entry per calendar date; recording again on the same date replaces
//! the earlier entry wholesale. History is read newest first.

use crate::store::{paths, Direction, DocumentStore};
use crate::types::{LoggedExercise, ProgressEntry, SetEntry, TrainingPlan};
use crate::Result;

/// Ledger of a single user's sessions
#[derive(Clone, Debug)]
pub struct ProgressLedger {
    user_id: String,
}

impl ProgressLedger {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    /// Upsert an entry by its date, overwriting any entry for that date
    pub fn record<S: DocumentStore + ?Sized>(&self, store: &mut S, entry: &ProgressEntry) -> Result<()> {
        let path = paths::progress(&self.user_id, &entry.date_key());
        store.set_document(&path, serde_json::to_value(entry)?)?;
        tracing::info!(
            "Recorded session for {} ({} exercises)",
            entry.date_key(),
            entry.logged_exercises.len()
        );
        Ok(())
    }

    /// All entries, newest date first
    pub fn history<S: DocumentStore + ?Sized>(&self, store: &S) -> Result<Vec<ProgressEntry>> {
        let docs = store.query_collection(
            &paths::progress_collection(&self.user_id),
            "date",
            Direction::Descending,
        )?;

        let mut entries = Vec::with_capacity(docs.len());
        for (id, value) in docs {
            match serde_json::from_value::<ProgressEntry>(value) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!("Failed to parse progress entry {}: {}", id, e);
                    // Continue reading, don't fail completely
                }
            }
        }

        tracing::debug!("Loaded {} progress entries", entries.len());
        Ok(entries)
    }
}

/// Heaviest set, first one wins on ties
///
/// The running maximum starts at weight 0 and is only replaced by a
/// strictly heavier set, so a list of zero-weight sets yields its first set.
pub fn best_of(sets: &[SetEntry]) -> Option<SetEntry> {
    let mut best = *sets.first()?;
    let mut max_weight = 0.0;
    for set in sets {
        if set.weight > max_weight {
            max_weight = set.weight;
            best = *set;
        }
    }
    Some(best)
}

/// Best set of the exercise named `exercise_name`, if it has any sets
pub fn best_set(exercises: &[LoggedExercise], exercise_name: &str) -> Option<SetEntry> {
    exercises
        .iter()
        .find(|ex| ex.name == exercise_name)
        .and_then(|ex| best_of(&ex.logged_sets))
}

/// Plan context of a stored entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanContext {
    /// Entry was logged without selecting a plan
    NotSelected,
    /// Plan and day still exist
    Available { plan_name: String, day_name: String },
    /// Referenced plan or day no longer exists; the logged exercises remain usable
    Unavailable,
}

/// Resolve the plan/day an entry was logged against
pub fn plan_context(entry: &ProgressEntry, plans: &[TrainingPlan]) -> PlanContext {
    let (Some(plan_id), Some(day_id)) = (&entry.selected_plan_id, &entry.selected_plan_day_id) else {
        return PlanContext::NotSelected;
    };

    let found = plans
        .iter()
        .find(|p| &p.id == plan_id)
        .and_then(|plan| plan.day(day_id).map(|day| (plan, day)));

    match found {
        Some((plan, day)) => PlanContext::Available {
            plan_name: plan.name.clone(),
            day_name: day.name.clone(),
        },
        None => {
            tracing::debug!(
                "Entry {} references missing plan context {}/{}",
                entry.date_key(),
                plan_id,
                day_id
            );
            PlanContext::Unavailable
        }
    }
}
