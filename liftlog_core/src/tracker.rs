//! Request/response facade over the store for the signed-in user.
//!
//! A [`Tracker`] loads plans, stats and history once, then sequences the
//! multi-step operations:
//! - submission: write entry, write stats, re-read history
//! - preference and availability saves: one batch write of profile + stats
//!
//! In-memory state is only replaced after every store call of an operation
//! succeeded. Submission is not transactional: if the stats write fails the
//! entry is already in the ledger, and the caller should reload.

use crate::catalog::{predefined_plans, Catalog};
use crate::ledger::{plan_context, PlanContext, ProgressLedger};
use crate::preferences;
use crate::session::SessionDraft;
use crate::stats::{self, Achievement, SessionOutcome};
use crate::store::{paths, Direction, DocumentStore};
use crate::types::{
    ExercisePreferences, ProfileRecord, ProgressEntry, StatsRecord, TrainingPlan, UserStats,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Authentication collaborator
pub trait SessionProvider {
    fn current_user_id(&self) -> Option<String>;
}

/// Provider backed by a fixed, possibly absent, user id
#[derive(Clone, Debug, Default)]
pub struct StaticSession {
    user_id: Option<String>,
}

impl StaticSession {
    pub fn new(user_id: Option<String>) -> Self {
        Self { user_id }
    }
}

impl SessionProvider for StaticSession {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}

/// Write the predefined plans if the store has none
///
/// Check-then-act without locking: two first loads may both seed. Plan ids
/// are fixed and writes overwrite, so a double seed is harmless.
pub fn seed_predefined_plans<S: DocumentStore + ?Sized>(store: &mut S) -> Result<usize> {
    let existing = store.query_collection(paths::PREDEFINED_PLANS, "id", Direction::Ascending)?;
    if !existing.is_empty() {
        return Ok(0);
    }

    let writes = predefined_plans()
        .iter()
        .map(|plan| -> Result<(String, serde_json::Value)> {
            Ok((paths::plan(&plan.id), serde_json::to_value(plan)?))
        })
        .collect::<Result<Vec<_>>>()?;
    let count = writes.len();
    store.batch_write(writes)?;
    tracing::info!("Seeded {} predefined plans", count);
    Ok(count)
}

fn parse_document<T: DeserializeOwned>(path: &str, value: Option<serde_json::Value>) -> Option<T> {
    let value = value?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            tracing::warn!("Failed to parse {}: {}. Ignoring it.", path, e);
            None
        }
    }
}

/// Plans, stats and history of the signed-in user
pub struct Tracker<'c, S: DocumentStore> {
    store: S,
    catalog: &'c Catalog,
    user_id: String,
    ledger: ProgressLedger,
    plans: Vec<TrainingPlan>,
    stats: UserStats,
    history: Vec<ProgressEntry>,
}

impl<'c, S: DocumentStore> Tracker<'c, S> {
    /// Authenticate, seed plans if needed, and load everything
    pub fn open(store: S, catalog: &'c Catalog, session: &dyn SessionProvider) -> Result<Self> {
        let user_id = session.current_user_id().ok_or(Error::NotAuthenticated)?;
        let mut tracker = Self {
            store,
            catalog,
            ledger: ProgressLedger::new(user_id.clone()),
            user_id,
            plans: Vec::new(),
            stats: UserStats::default(),
            history: Vec::new(),
        };
        tracker.reload()?;
        Ok(tracker)
    }

    /// Re-read plans, stats and history from the store
    pub fn reload(&mut self) -> Result<()> {
        seed_predefined_plans(&mut self.store).map_err(Error::into_persistence)?;
        let plans = self.load_plans().map_err(Error::into_persistence)?;
        let stats = self.load_stats().map_err(Error::into_persistence)?;
        let history = self
            .ledger
            .history(&self.store)
            .map_err(Error::into_persistence)?;

        tracing::info!(
            "Loaded {} plans and {} sessions for user {}",
            plans.len(),
            history.len(),
            self.user_id
        );
        self.plans = plans;
        self.stats = stats;
        self.history = history;
        Ok(())
    }

    fn load_plans(&self) -> Result<Vec<TrainingPlan>> {
        let docs = self
            .store
            .query_collection(paths::PREDEFINED_PLANS, "id", Direction::Ascending)?;
        Ok(docs
            .into_iter()
            .filter_map(|(id, value)| parse_document(&paths::plan(&id), Some(value)))
            .collect())
    }

    fn load_stats(&mut self) -> Result<UserStats> {
        let profile_path = paths::profile(&self.user_id);
        let stats_path = paths::stats(&self.user_id);

        let profile: Option<ProfileRecord> =
            parse_document(&profile_path, self.store.get_document(&profile_path)?);
        let record: Option<StatsRecord> =
            parse_document(&stats_path, self.store.get_document(&stats_path)?);

        let unreadable = record.is_none() && self.store.document_exists(&stats_path)?;
        let first_access = record.is_none() && !unreadable;
        let stats = stats::merge_records(profile, record);
        if first_access {
            tracing::info!("No stats for user {}, creating defaults", self.user_id);
            self.store
                .set_document(&stats_path, serde_json::to_value(StatsRecord::from(&stats))?)?;
        } else if unreadable {
            tracing::warn!(
                "Stats for user {} are unreadable, using defaults and leaving {} as is",
                self.user_id,
                stats_path
            );
        }
        Ok(stats)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub fn plans(&self) -> &[TrainingPlan] {
        &self.plans
    }

    pub fn plan(&self, plan_id: &str) -> Option<&TrainingPlan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    /// Entries newest first, as of the last load or submission
    pub fn history(&self) -> &[ProgressEntry] {
        &self.history
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        stats::achievements(&self.stats)
    }

    /// Plan context of an entry against the loaded plans
    pub fn plan_context(&self, entry: &ProgressEntry) -> PlanContext {
        plan_context(entry, &self.plans)
    }

    /// Record a finished session and update stats
    ///
    /// Validation happens before any write. Steps: write the entry, write
    /// the updated stats (carrying the current preferences), re-read history.
    pub fn submit(&mut self, draft: SessionDraft) -> Result<SessionOutcome> {
        let entry = draft.into_entry()?;

        let (mut next, outcome) =
            stats::apply_session(self.catalog, &self.stats, &entry.logged_exercises);

        let mut dates: Vec<_> = self.history.iter().map(|e| e.date).collect();
        dates.push(entry.date);
        let anchor = dates.iter().copied().max().unwrap_or(entry.date);
        next.streak_days = stats::streak_ending_at(&dates, anchor);

        self.ledger
            .record(&mut self.store, &entry)
            .map_err(Error::into_persistence)?;
        self.write_stats(&next).map_err(Error::into_persistence)?;
        let history = self
            .ledger
            .history(&self.store)
            .map_err(Error::into_persistence)?;

        tracing::info!(
            "Session {} submitted: +{} XP, level {}",
            entry.date_key(),
            outcome.experience_gained,
            next.level
        );
        self.stats = next;
        self.history = history;
        Ok(outcome)
    }

    fn write_stats(&mut self, stats: &UserStats) -> Result<()> {
        let value = serde_json::to_value(StatsRecord::from(stats))?;
        self.store.set_document(&paths::stats(&self.user_id), value)
    }

    fn save_settings(&mut self, weekly_availability: u32, prefs: ExercisePreferences) -> Result<()> {
        let mut next = self.stats.clone();
        next.weekly_availability = weekly_availability;
        next.exercise_preferences = prefs;

        let profile = ProfileRecord {
            weekly_availability: Some(next.weekly_availability),
            exercise_preferences: Some(next.exercise_preferences.clone()),
        };
        let writes = vec![
            (paths::profile(&self.user_id), serde_json::to_value(profile)?),
            (
                paths::stats(&self.user_id),
                serde_json::to_value(StatsRecord::from(&next))?,
            ),
        ];
        self.store
            .batch_write(writes)
            .map_err(Error::into_persistence)?;
        self.stats = next;
        Ok(())
    }

    /// Replace the whole preference mapping
    pub fn save_preferences(&mut self, prefs: ExercisePreferences) -> Result<()> {
        let availability = self.stats.weekly_availability;
        self.save_settings(availability, prefs)?;
        tracing::info!(
            "Saved {} exercise preferences",
            self.stats.exercise_preferences.len()
        );
        Ok(())
    }

    /// Choose the exercise for one pattern
    ///
    /// Returns `Ok(false)` without writing when the pattern is unknown or
    /// the exercise is not one of its options.
    pub fn set_preference(&mut self, pattern_name: &str, exercise_name: &str) -> Result<bool> {
        let Some(pattern) = self.catalog.pattern(pattern_name) else {
            return Ok(false);
        };
        let mut prefs = self.stats.exercise_preferences.clone();
        if !preferences::choose(&mut prefs, pattern, exercise_name) {
            return Ok(false);
        }
        self.save_preferences(prefs)?;
        Ok(true)
    }

    /// Save the weekly availability used for split generation
    pub fn save_weekly_availability(&mut self, weekly_availability: u32) -> Result<()> {
        let prefs = self.stats.exercise_preferences.clone();
        self.save_settings(weekly_availability, prefs)?;
        tracing::info!("Saved weekly availability {}", weekly_availability);
        Ok(())
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.store
    }
}
