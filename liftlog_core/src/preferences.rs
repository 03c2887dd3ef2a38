//! Movement pattern to preferred exercise resolution.
//!
//! Preferences are a single global mapping of pattern name to exercise
//! name. A preference that names neither the standard exercise nor one of
//! the alternatives (missing, or left over from an older catalog) resolves
//! to the standard exercise. That fallback is the intended behavior for
//! stale values; the stored preference itself is left untouched.

use crate::split::Split;
use crate::types::{ExercisePreferences, ExerciseDetail, MovementPattern};
use std::collections::HashSet;

/// Resolve a pattern to the user's chosen exercise
pub fn resolve<'a>(pattern: &'a MovementPattern, prefs: &ExercisePreferences) -> &'a ExerciseDetail {
    let Some(chosen) = prefs.get(&pattern.name) else {
        return &pattern.standard;
    };

    if *chosen == pattern.standard.name {
        return &pattern.standard;
    }

    match pattern.alternatives.iter().find(|alt| alt.name == *chosen) {
        Some(alt) => alt,
        None => {
            tracing::debug!(
                "Preference '{}' for pattern '{}' not in catalog, using standard '{}'",
                chosen,
                pattern.name,
                pattern.standard.name
            );
            &pattern.standard
        }
    }
}

/// Every pattern of a split once, in first-seen order across days
pub fn unique_patterns<'a>(split: &Split<'a>) -> Vec<&'a MovementPattern> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for pattern in split.days.iter().flat_map(|day| day.patterns()) {
        if seen.insert(pattern.name.as_str()) {
            unique.push(pattern);
        }
    }
    unique
}

/// Record a choice in the mapping after checking it against the pattern
///
/// Returns `false` and leaves the mapping unchanged when `exercise_name`
/// is not one of the pattern's options.
pub fn choose(prefs: &mut ExercisePreferences, pattern: &MovementPattern, exercise_name: &str) -> bool {
    if !pattern.options().any(|o| o.name == exercise_name) {
        return false;
    }
    prefs.insert(pattern.name.clone(), exercise_name.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::config::SplitConfig;
    use crate::split::SplitGenerator;

    fn horizontal_push() -> &'static MovementPattern {
        get_default_catalog().pattern("Horizontal Push").unwrap()
    }

    #[test]
    fn test_empty_prefs_resolve_to_standard() {
        let pattern = horizontal_push();
        let prefs = ExercisePreferences::new();
        assert_eq!(resolve(pattern, &prefs), &pattern.standard);
    }

    #[test]
    fn test_standard_pref_resolves_to_standard() {
        let pattern = horizontal_push();
        let mut prefs = ExercisePreferences::new();
        prefs.insert(pattern.name.clone(), pattern.standard.name.clone());
        assert_eq!(resolve(pattern, &prefs), &pattern.standard);
    }

    #[test]
    fn test_each_alternative_resolves() {
        let pattern = horizontal_push();
        for alt in &pattern.alternatives {
            let mut prefs = ExercisePreferences::new();
            prefs.insert(pattern.name.clone(), alt.name.clone());
            assert_eq!(resolve(pattern, &prefs), alt);
        }
    }

    #[test]
    fn test_stale_pref_falls_back_to_standard() {
        let pattern = horizontal_push();
        let mut prefs = ExercisePreferences::new();
        prefs.insert(pattern.name.clone(), "Floor Press (retired)".into());
        assert_eq!(resolve(pattern, &prefs).name, "Barbell Bench Press");
    }

    #[test]
    fn test_unique_patterns_dedupes_in_first_seen_order() {
        let gen = SplitGenerator::new(get_default_catalog(), &SplitConfig::default()).unwrap();
        let split = gen.generate(6);
        let unique = unique_patterns(&split);

        let names: HashSet<_> = unique.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), unique.len());

        let first_seen: Vec<_> = split.days[..3]
            .iter()
            .flat_map(|d| d.patterns())
            .map(|p| p.name.as_str())
            .collect();
        let unique_names: Vec<_> = unique.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(unique_names, first_seen);
    }

    #[test]
    fn test_choose_rejects_foreign_exercise() {
        let pattern = horizontal_push();
        let mut prefs = ExercisePreferences::new();
        assert!(!choose(&mut prefs, pattern, "Back Squat"));
        assert!(prefs.is_empty());
        assert!(choose(&mut prefs, pattern, "Dumbbell Bench Press"));
        assert_eq!(prefs["Horizontal Push"], "Dumbbell Bench Press");
    }
}
