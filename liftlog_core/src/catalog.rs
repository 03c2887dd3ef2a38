//! Default catalog of exercises, movement patterns and predefined plans.
//!
//! The catalog is static data built once per process. Lookups return
//! `Option` so callers can treat unknown names as literals.

use crate::types::*;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Muscle-group bucket used to compose training days
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Shoulders,
    Triceps,
    BackThickness,
    BackWidth,
    RearDelts,
    Biceps,
    Quads,
    Hamstrings,
    Calves,
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::BackThickness => "Back (thickness)",
            MuscleGroup::BackWidth => "Back (width)",
            MuscleGroup::RearDelts => "Rear delts",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
        };
        f.write_str(label)
    }
}

/// The complete catalog of exercises and movement patterns
#[derive(Clone, Debug)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseDetail>,
    pub patterns: HashMap<String, MovementPattern>,
    /// Ordered pattern names per muscle group
    pub muscle_groups: BTreeMap<MuscleGroup, Vec<String>>,
}

impl Catalog {
    /// Look up a concrete exercise by name
    pub fn exercise(&self, name: &str) -> Option<&ExerciseDetail> {
        self.exercises.get(name)
    }

    /// Look up a movement pattern by name
    pub fn pattern(&self, name: &str) -> Option<&MovementPattern> {
        self.patterns.get(name)
    }

    /// Patterns of a muscle group, in table order
    pub fn patterns_for(&self, group: MuscleGroup) -> Vec<&MovementPattern> {
        self.muscle_groups
            .get(&group)
            .map(|names| names.iter().filter_map(|n| self.pattern(n)).collect())
            .unwrap_or_default()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (name, exercise) in &self.exercises {
            if name != &exercise.name {
                errors.push(format!(
                    "Exercise key '{}' doesn't match exercise.name '{}'",
                    name, exercise.name
                ));
            }
            if exercise.sets == 0 {
                errors.push(format!("Exercise '{}' has zero sets", name));
            }
            if exercise.min_reps().is_none() {
                errors.push(format!(
                    "Exercise '{}' has unparseable rep range '{}'",
                    name, exercise.reps
                ));
            }
        }

        for (name, pattern) in &self.patterns {
            if name != &pattern.name {
                errors.push(format!(
                    "Pattern key '{}' doesn't match pattern.name '{}'",
                    name, pattern.name
                ));
            }
            let mut seen = HashSet::new();
            for option in pattern.options() {
                if !seen.insert(option.name.as_str()) {
                    errors.push(format!(
                        "Pattern '{}' lists exercise '{}' more than once",
                        name, option.name
                    ));
                }
                match self.exercises.get(&option.name) {
                    Some(known) if known == option => {}
                    Some(_) => errors.push(format!(
                        "Pattern '{}' carries a stale copy of exercise '{}'",
                        name, option.name
                    )),
                    None => errors.push(format!(
                        "Pattern '{}' references non-existent exercise '{}'",
                        name, option.name
                    )),
                }
            }
        }

        for (group, names) in &self.muscle_groups {
            if names.is_empty() {
                errors.push(format!("Muscle group '{}' has no patterns", group));
            }
            for pattern_name in names {
                if !self.patterns.contains_key(pattern_name) {
                    errors.push(format!(
                        "Muscle group '{}' references non-existent pattern '{}'",
                        group, pattern_name
                    ));
                }
            }
        }

        errors
    }
}

fn exercise(
    name: &str,
    sets: u32,
    reps: &str,
    rir: u32,
    notes: Option<&str>,
    category: LiftCategory,
) -> ExerciseDetail {
    ExerciseDetail {
        name: name.into(),
        sets,
        reps: reps.into(),
        rir,
        notes: notes.map(Into::into),
        category,
    }
}

/// Builds the default catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> Catalog {
    use LiftCategory::{BenchPress, Deadlift, None as Untracked, Squat};

    let exercises = vec![
        // Chest
        exercise("Barbell Bench Press", 3, "6-8", 2, Some("Shoulder blades pinned, feet planted"), BenchPress),
        exercise("Dumbbell Bench Press", 3, "8-10", 2, None, BenchPress),
        exercise("Machine Chest Press", 3, "8-12", 1, None, Untracked),
        exercise("Incline Dumbbell Press", 3, "8-10", 2, Some("30-degree bench"), Untracked),
        exercise("Low Incline Smith Press", 3, "8-10", 2, None, Untracked),
        exercise("Cable Fly", 3, "12-15", 1, None, Untracked),
        exercise("Pec Deck", 3, "12-15", 1, None, Untracked),
        // Shoulders
        exercise("Overhead Press", 3, "6-8", 2, None, Untracked),
        exercise("Seated Dumbbell Shoulder Press", 3, "8-10", 2, None, Untracked),
        exercise("Dumbbell Lateral Raise", 3, "12-15", 1, None, Untracked),
        exercise("Cable Lateral Raise", 3, "12-15", 1, Some("Cable at hip height"), Untracked),
        // Triceps
        exercise("Overhead Cable Triceps Extension", 3, "10-12", 1, None, Untracked),
        exercise("Skull Crusher", 3, "8-12", 1, None, Untracked),
        exercise("Triceps Pushdown", 3, "10-15", 1, None, Untracked),
        // Back thickness
        exercise("Barbell Row", 3, "6-8", 2, None, Untracked),
        exercise("Chest-Supported Row", 3, "8-10", 1, None, Untracked),
        exercise("Seated Cable Row", 3, "10-12", 1, None, Untracked),
        exercise("Conventional Deadlift", 3, "4-6", 2, Some("Reset each rep"), Deadlift),
        exercise("Trap Bar Deadlift", 3, "5-8", 2, None, Deadlift),
        // Back width
        exercise("Pull-Up", 3, "6-10", 2, None, Untracked),
        exercise("Lat Pulldown", 3, "8-12", 1, None, Untracked),
        exercise("Neutral-Grip Pulldown", 3, "8-12", 1, None, Untracked),
        // Rear delts
        exercise("Reverse Pec Deck", 3, "12-15", 1, None, Untracked),
        exercise("Face Pull", 3, "12-15", 1, None, Untracked),
        // Biceps
        exercise("Barbell Curl", 3, "8-10", 1, None, Untracked),
        exercise("Incline Dumbbell Curl", 3, "10-12", 1, None, Untracked),
        exercise("Hammer Curl", 3, "10-12", 1, None, Untracked),
        // Quads
        exercise("Back Squat", 3, "5-8", 2, Some("Hit depth below parallel"), Squat),
        exercise("Front Squat", 3, "5-8", 2, None, Squat),
        exercise("Hack Squat", 3, "8-10", 1, None, Squat),
        exercise("Leg Press", 3, "10-12", 1, None, Untracked),
        exercise("Leg Extension", 3, "12-15", 1, None, Untracked),
        // Hamstrings
        exercise("Romanian Deadlift", 3, "8-10", 2, None, Untracked),
        exercise("Stiff-Leg Deadlift", 3, "8-10", 2, None, Untracked),
        exercise("Seated Leg Curl", 3, "10-12", 1, None, Untracked),
        exercise("Lying Leg Curl", 3, "10-12", 1, None, Untracked),
        // Calves
        exercise("Standing Calf Raise", 4, "10-15", 1, Some("Pause at the bottom"), Untracked),
        exercise("Seated Calf Raise", 4, "12-15", 1, None, Untracked),
    ];

    let exercises: HashMap<String, ExerciseDetail> =
        exercises.into_iter().map(|e| (e.name.clone(), e)).collect();

    let pattern_table: [(&str, &str, &[&str]); 16] = [
        ("Horizontal Push", "Barbell Bench Press", &["Dumbbell Bench Press", "Machine Chest Press"]),
        ("Incline Push", "Incline Dumbbell Press", &["Low Incline Smith Press"]),
        ("Chest Fly", "Cable Fly", &["Pec Deck"]),
        ("Vertical Push", "Overhead Press", &["Seated Dumbbell Shoulder Press"]),
        ("Lateral Raise", "Dumbbell Lateral Raise", &["Cable Lateral Raise"]),
        ("Triceps Extension", "Overhead Cable Triceps Extension", &["Skull Crusher", "Triceps Pushdown"]),
        ("Horizontal Pull", "Barbell Row", &["Chest-Supported Row", "Seated Cable Row"]),
        ("Hip Hinge", "Conventional Deadlift", &["Trap Bar Deadlift"]),
        ("Vertical Pull", "Pull-Up", &["Lat Pulldown", "Neutral-Grip Pulldown"]),
        ("Rear Delt Fly", "Reverse Pec Deck", &["Face Pull"]),
        ("Elbow Flexion", "Barbell Curl", &["Incline Dumbbell Curl", "Hammer Curl"]),
        ("Knee-Dominant Squat", "Back Squat", &["Front Squat", "Hack Squat", "Leg Press"]),
        ("Knee Extension", "Leg Extension", &[]),
        ("Hamstring Hinge", "Romanian Deadlift", &["Stiff-Leg Deadlift"]),
        ("Knee Flexion", "Seated Leg Curl", &["Lying Leg Curl"]),
        ("Calf Raise", "Standing Calf Raise", &["Seated Calf Raise"]),
    ];

    // Unknown names become zero-set placeholders that `validate` reports
    let lookup = |name: &str| {
        exercises
            .get(name)
            .cloned()
            .unwrap_or_else(|| exercise(name, 0, "", 0, None, Untracked))
    };

    let mut patterns = HashMap::new();
    for (name, standard, alternatives) in pattern_table {
        let standard = lookup(standard);
        let alternatives = alternatives.iter().map(|alt| lookup(*alt)).collect();
        patterns.insert(
            name.to_string(),
            MovementPattern {
                name: name.into(),
                standard,
                alternatives,
            },
        );
    }

    let group_table: [(MuscleGroup, &[&str]); 10] = [
        (MuscleGroup::Chest, &["Horizontal Push", "Incline Push", "Chest Fly"]),
        (MuscleGroup::Shoulders, &["Vertical Push", "Lateral Raise"]),
        (MuscleGroup::Triceps, &["Triceps Extension"]),
        (MuscleGroup::BackThickness, &["Horizontal Pull", "Hip Hinge"]),
        (MuscleGroup::BackWidth, &["Vertical Pull"]),
        (MuscleGroup::RearDelts, &["Rear Delt Fly"]),
        (MuscleGroup::Biceps, &["Elbow Flexion"]),
        (MuscleGroup::Quads, &["Knee-Dominant Squat", "Knee Extension"]),
        (MuscleGroup::Hamstrings, &["Hamstring Hinge", "Knee Flexion"]),
        (MuscleGroup::Calves, &["Calf Raise"]),
    ];

    let muscle_groups: BTreeMap<MuscleGroup, Vec<String>> = group_table
        .into_iter()
        .map(|(group, names)| (group, names.iter().map(|n| n.to_string()).collect()))
        .collect();

    Catalog {
        exercises,
        patterns,
        muscle_groups,
    }
}

// ============================================================================
// Predefined Plans
// ============================================================================

fn slot(pattern_name: &str, sets: u32, reps: u32) -> PlannedSlot {
    PlannedSlot {
        pattern_name: pattern_name.into(),
        sets,
        reps,
    }
}

fn day(id: &str, name: &str, slots: Vec<PlannedSlot>) -> PlanDay {
    PlanDay {
        id: id.into(),
        name: name.into(),
        slots,
    }
}

/// Plans written to the store on first load
///
/// Ids are fixed so that seeding twice overwrites rather than duplicates.
pub fn predefined_plans() -> Vec<TrainingPlan> {
    vec![
        TrainingPlan {
            id: "ppl-classic".into(),
            name: "Push / Pull / Legs".into(),
            description: "Three-day rotation hitting each muscle group once per cycle".into(),
            days: vec![
                day(
                    "push",
                    "Push",
                    vec![
                        slot("Horizontal Push", 4, 6),
                        slot("Vertical Push", 3, 8),
                        slot("Incline Push", 3, 10),
                        slot("Lateral Raise", 3, 12),
                        slot("Triceps Extension", 3, 12),
                    ],
                ),
                day(
                    "pull",
                    "Pull",
                    vec![
                        slot("Hip Hinge", 3, 5),
                        slot("Vertical Pull", 4, 8),
                        slot("Horizontal Pull", 3, 8),
                        slot("Rear Delt Fly", 3, 15),
                        slot("Elbow Flexion", 3, 10),
                    ],
                ),
                day(
                    "legs",
                    "Legs",
                    vec![
                        slot("Knee-Dominant Squat", 4, 6),
                        slot("Hamstring Hinge", 3, 8),
                        slot("Knee Extension", 3, 12),
                        slot("Knee Flexion", 3, 12),
                        slot("Calf Raise", 4, 12),
                        slot("Hanging Leg Raise", 3, 12),
                    ],
                ),
            ],
        },
        TrainingPlan {
            id: "upper-lower".into(),
            name: "Upper / Lower".into(),
            description: "Four-day split alternating upper and lower body".into(),
            days: vec![
                day(
                    "upper-a",
                    "Upper A",
                    vec![
                        slot("Horizontal Push", 4, 6),
                        slot("Horizontal Pull", 4, 8),
                        slot("Vertical Push", 3, 8),
                        slot("Vertical Pull", 3, 10),
                        slot("Elbow Flexion", 2, 12),
                    ],
                ),
                day(
                    "lower-a",
                    "Lower A",
                    vec![
                        slot("Knee-Dominant Squat", 4, 6),
                        slot("Hamstring Hinge", 3, 8),
                        slot("Calf Raise", 4, 12),
                    ],
                ),
                day(
                    "upper-b",
                    "Upper B",
                    vec![
                        slot("Incline Push", 3, 10),
                        slot("Vertical Pull", 4, 8),
                        slot("Lateral Raise", 3, 15),
                        slot("Rear Delt Fly", 3, 15),
                        slot("Triceps Extension", 3, 12),
                    ],
                ),
                day(
                    "lower-b",
                    "Lower B",
                    vec![
                        slot("Hip Hinge", 3, 5),
                        slot("Knee Extension", 3, 12),
                        slot("Knee Flexion", 3, 12),
                        slot("Calf Raise", 4, 15),
                    ],
                ),
            ],
        },
    ]
}
