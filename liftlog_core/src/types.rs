//! Core domain types for the Liftlog system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Catalog exercises and movement patterns
//! - Training plans, days and planned slots
//! - Logged sessions and ledger entries
//! - User progression stats

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global mapping of movement-pattern name to the chosen exercise name
pub type ExercisePreferences = BTreeMap<String, String>;

/// Weekly availability used when nothing has been saved yet
pub const DEFAULT_WEEKLY_AVAILABILITY: u32 = 3;

/// Canonical storage key format for ledger dates
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Catalog Types
// ============================================================================

/// Tracked lift a catalog exercise contributes to
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum LiftCategory {
    BenchPress,
    Squat,
    Deadlift,
    #[default]
    None,
}

/// A concrete exercise (e.g., "Barbell Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseDetail {
    pub name: String,
    pub sets: u32,
    /// Rep range such as "6-8"
    pub reps: String,
    pub rir: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub category: LiftCategory,
}

impl ExerciseDetail {
    /// Lower bound of the rep range, used as a single planned target
    pub fn min_reps(&self) -> Option<u32> {
        self.reps
            .split('-')
            .next()
            .and_then(|s| s.trim().parse().ok())
    }
}

/// An abstract movement (e.g., "Horizontal Push") with its exercise choices
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MovementPattern {
    pub name: String,
    pub standard: ExerciseDetail,
    pub alternatives: Vec<ExerciseDetail>,
}

impl MovementPattern {
    /// Standard followed by alternatives, in display order
    pub fn options(&self) -> impl Iterator<Item = &ExerciseDetail> {
        std::iter::once(&self.standard).chain(self.alternatives.iter())
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// One planned exercise slot within a day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlannedSlot {
    /// Movement pattern name; unknown names are used as literal exercise names
    pub pattern_name: String,
    pub sets: u32,
    pub reps: u32,
}

/// A single training day of a plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanDay {
    pub id: String,
    pub name: String,
    pub slots: Vec<PlannedSlot>,
}

/// A complete training plan
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrainingPlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub days: Vec<PlanDay>,
}

impl TrainingPlan {
    /// Look up a day by id
    pub fn day(&self, day_id: &str) -> Option<&PlanDay> {
        self.days.iter().find(|d| d.id == day_id)
    }
}

// ============================================================================
// Session and Ledger Types
// ============================================================================

/// One performed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: u32,
    pub rir: u32,
}

impl SetEntry {
    pub fn new(weight: f64, reps: u32, rir: u32) -> Self {
        Self { weight, reps, rir }
    }
}

/// An exercise as logged within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LoggedExercise {
    /// Resolved concrete exercise name (logging identity)
    pub name: String,
    /// Planned sets from the plan slot
    pub sets: u32,
    /// Planned reps from the plan slot
    pub reps: u32,
    pub logged_sets: Vec<SetEntry>,
    /// Originating pattern, for context only
    #[serde(default)]
    pub movement_pattern_name: Option<String>,
    /// Target RIR of the resolved exercise
    #[serde(default)]
    pub rir: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl LoggedExercise {
    /// Append an empty set slot
    pub fn add_set(&mut self) {
        self.logged_sets.push(SetEntry::default());
    }
}

/// A recorded session, one per calendar date
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProgressEntry {
    pub date: NaiveDate,
    pub body_weight: f64,
    #[serde(default)]
    pub selected_plan_id: Option<String>,
    #[serde(default)]
    pub selected_plan_day_id: Option<String>,
    pub logged_exercises: Vec<LoggedExercise>,
}

impl ProgressEntry {
    /// Storage key (`yyyy-MM-dd`)
    pub fn date_key(&self) -> String {
        self.date.format(DATE_KEY_FORMAT).to_string()
    }
}

// ============================================================================
// Stats Types
// ============================================================================

/// Heaviest weights recorded for the tracked lifts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonalBests {
    pub bench_press: f64,
    pub squat: f64,
    pub deadlift: f64,
}

impl PersonalBests {
    pub fn get(&self, category: LiftCategory) -> f64 {
        match category {
            LiftCategory::BenchPress => self.bench_press,
            LiftCategory::Squat => self.squat,
            LiftCategory::Deadlift => self.deadlift,
            LiftCategory::None => 0.0,
        }
    }

    pub(crate) fn set(&mut self, category: LiftCategory, weight: f64) {
        match category {
            LiftCategory::BenchPress => self.bench_press = weight,
            LiftCategory::Squat => self.squat = weight,
            LiftCategory::Deadlift => self.deadlift = weight,
            LiftCategory::None => {}
        }
    }
}

/// User progression snapshot
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub level: u32,
    pub experience: u64,
    pub workouts_completed: u32,
    pub streak_days: u32,
    pub personal_bests: PersonalBests,
    pub weekly_availability: u32,
    pub exercise_preferences: ExercisePreferences,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            workouts_completed: 0,
            streak_days: 0,
            personal_bests: PersonalBests::default(),
            weekly_availability: DEFAULT_WEEKLY_AVAILABILITY,
            exercise_preferences: ExercisePreferences::new(),
        }
    }
}

/// Stored "stats" document; every field is optional on read
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct StatsRecord {
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub experience: Option<u64>,
    #[serde(default)]
    pub workouts_completed: Option<u32>,
    #[serde(default)]
    pub streak_days: Option<u32>,
    #[serde(default)]
    pub personal_bests: Option<PersonalBests>,
    #[serde(default)]
    pub weekly_availability: Option<u32>,
    #[serde(default)]
    pub exercise_preferences: Option<ExercisePreferences>,
}

impl From<&UserStats> for StatsRecord {
    fn from(stats: &UserStats) -> Self {
        Self {
            level: Some(stats.level),
            experience: Some(stats.experience),
            workouts_completed: Some(stats.workouts_completed),
            streak_days: Some(stats.streak_days),
            personal_bests: Some(stats.personal_bests),
            weekly_availability: Some(stats.weekly_availability),
            exercise_preferences: Some(stats.exercise_preferences.clone()),
        }
    }
}

/// Stored "profile" document holding user settings
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ProfileRecord {
    #[serde(default)]
    pub weekly_availability: Option<u32>,
    #[serde(default)]
    pub exercise_preferences: Option<ExercisePreferences>,
}

// ============================================================================
// Presentation Signals
// ============================================================================

/// View the presentation layer should show next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveView {
    Plan,
    Log,
    History,
    Stats,
}
