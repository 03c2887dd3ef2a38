//! Leveling, personal bests, streaks and achievements.
//!
//! Experience is the source of truth; the level is always derived from it:
//! `level = floor(sqrt(xp / 100)) + 1`. Every completed session is worth a
//! base 100 XP plus 50 XP per tracked lift whose personal best it beats.

use crate::catalog::Catalog;
use crate::ledger::best_of;
use crate::types::{
    LiftCategory, LoggedExercise, ProfileRecord, StatsRecord, UserStats,
    DEFAULT_WEEKLY_AVAILABILITY,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Experience awarded for every completed session
pub const BASE_SESSION_XP: u64 = 100;

/// Experience awarded per beaten personal best
pub const PERSONAL_BEST_XP: u64 = 50;

const XP_PER_LEVEL_UNIT: u64 = 100;

/// Name keywords for exercises missing from the catalog; lists are disjoint
pub const LIFT_KEYWORDS: [(LiftCategory, &[&str]); 3] = [
    (LiftCategory::BenchPress, &["supino", "bench press"]),
    (LiftCategory::Squat, &["agachamento", "squat"]),
    (LiftCategory::Deadlift, &["levantamento terra", "deadlift"]),
];

const TRACKED_LIFTS: [LiftCategory; 3] = [
    LiftCategory::BenchPress,
    LiftCategory::Squat,
    LiftCategory::Deadlift,
];

// ============================================================================
// Leveling
// ============================================================================

fn isqrt(n: u64) -> u64 {
    let mut root = (n as f64).sqrt() as u64;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Level for an experience total
pub fn level(experience: u64) -> u32 {
    isqrt(experience / XP_PER_LEVEL_UNIT) as u32 + 1
}

/// Minimum experience needed to be at `level`
pub fn xp_floor(level: u32) -> u64 {
    let steps = u64::from(level.saturating_sub(1));
    steps * steps * XP_PER_LEVEL_UNIT
}

/// Fraction of the way from the current level to the next, in `[0, 1)`
pub fn level_progress(experience: u64) -> f64 {
    let current = level(experience);
    let floor = xp_floor(current);
    let next = xp_floor(current + 1);
    (experience - floor) as f64 / (next - floor) as f64
}

// ============================================================================
// Session completion
// ============================================================================

/// Tracked lift an exercise counts towards
///
/// Catalog exercises carry their category; names the catalog doesn't know
/// are matched case-insensitively against [`LIFT_KEYWORDS`].
pub fn classify(catalog: &Catalog, exercise_name: &str) -> LiftCategory {
    if let Some(exercise) = catalog.exercise(exercise_name) {
        return exercise.category;
    }

    let lowered = exercise_name.to_lowercase();
    LIFT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(LiftCategory::None)
}

/// What a completed session changed
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOutcome {
    pub experience_gained: u64,
    /// Lifts whose personal best was raised, with the new weight
    pub new_personal_bests: Vec<(LiftCategory, f64)>,
    pub leveled_up: bool,
}

/// Apply a completed session to the prior stats
///
/// Only the sets of this session are considered. Preferences and weekly
/// availability are carried over untouched.
pub fn apply_session(
    catalog: &Catalog,
    prior: &UserStats,
    exercises: &[LoggedExercise],
) -> (UserStats, SessionOutcome) {
    let mut next = prior.clone();
    let mut outcome = SessionOutcome {
        experience_gained: BASE_SESSION_XP,
        new_personal_bests: Vec::new(),
        leveled_up: false,
    };

    for category in TRACKED_LIFTS {
        let session_best = exercises
            .iter()
            .filter(|ex| classify(catalog, &ex.name) == category)
            .filter_map(|ex| best_of(&ex.logged_sets))
            .map(|set| set.weight)
            .fold(0.0_f64, f64::max);

        if session_best > prior.personal_bests.get(category) {
            tracing::info!(
                "New personal best for {:?}: {} (was {})",
                category,
                session_best,
                prior.personal_bests.get(category)
            );
            next.personal_bests.set(category, session_best);
            outcome.new_personal_bests.push((category, session_best));
            outcome.experience_gained += PERSONAL_BEST_XP;
        }
    }

    next.workouts_completed += 1;
    next.experience += outcome.experience_gained;
    next.level = level(next.experience);
    outcome.leveled_up = next.level > prior.level;

    (next, outcome)
}

/// Consecutive days with a session, ending at `anchor`
///
/// Returns 0 when `anchor` itself has no session.
pub fn streak_ending_at(dates: &[NaiveDate], anchor: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    let mut streak = 0;
    let mut cursor = Some(anchor);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

// ============================================================================
// Loading
// ============================================================================

/// Merge the stored profile and stats documents into one snapshot
///
/// Settings precedence: profile, then stats record, then defaults. An empty
/// preference mapping counts as absent. Counters come from the stats record
/// only, and the level is always recomputed from experience.
pub fn merge_records(profile: Option<ProfileRecord>, stats: Option<StatsRecord>) -> UserStats {
    let profile = profile.unwrap_or_default();
    let stats = stats.unwrap_or_default();

    let weekly_availability = profile
        .weekly_availability
        .or(stats.weekly_availability)
        .unwrap_or(DEFAULT_WEEKLY_AVAILABILITY);

    let exercise_preferences = profile
        .exercise_preferences
        .filter(|prefs| !prefs.is_empty())
        .or(stats.exercise_preferences)
        .unwrap_or_default();

    let experience = stats.experience.unwrap_or(0);
    let derived = level(experience);
    if let Some(stored) = stats.level {
        if stored != derived {
            tracing::warn!(
                "Stored level {} disagrees with experience {}, using {}",
                stored,
                experience,
                derived
            );
        }
    }

    UserStats {
        level: derived,
        experience,
        workouts_completed: stats.workouts_completed.unwrap_or(0),
        streak_days: stats.streak_days.unwrap_or(0),
        personal_bests: stats.personal_bests.unwrap_or_default(),
        weekly_availability,
        exercise_preferences,
    }
}

// ============================================================================
// Achievements
// ============================================================================

/// Progress towards one achievement
#[derive(Clone, Debug, PartialEq)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub progress: f64,
    pub target: f64,
}

impl Achievement {
    pub fn completed(&self) -> bool {
        self.progress >= self.target
    }
}

/// Achievements computed fresh from a snapshot
pub fn achievements(stats: &UserStats) -> Vec<Achievement> {
    vec![
        Achievement {
            id: "streak_7",
            title: "Seven-day streak",
            progress: f64::from(stats.streak_days),
            target: 7.0,
        },
        Achievement {
            id: "bench_100",
            title: "Bench press 100",
            progress: stats.personal_bests.bench_press,
            target: 100.0,
        },
        Achievement {
            id: "workouts_50",
            title: "Fifty workouts",
            progress: f64::from(stats.workouts_completed),
            target: 50.0,
        },
    ]
}
