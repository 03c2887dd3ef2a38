//! Split generation from weekly availability.
//!
//! Maps the number of training days per week to an ordered sequence of
//! day kinds, each composed of muscle-group buckets of movement patterns:
//! - 2 days: Upper / Lower
//! - 3 days: Push / Pull / Legs
//! - 4 days: Upper / Lower / Upper / Lower
//! - 5 days: Push / Pull / Legs / Upper / Lower
//! - 6 days: Push / Pull / Legs twice
//!
//! Any other value routes to the configured fallback split.

use crate::catalog::{Catalog, MuscleGroup};
use crate::config::SplitConfig;
use crate::types::{MovementPattern, PlanDay, PlannedSlot, TrainingPlan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported weekly availabilities
pub const SUPPORTED_AVAILABILITY: std::ops::RangeInclusive<u32> = 2..=6;

/// Kind of training day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Push,
    Pull,
    Legs,
    Upper,
    Lower,
}

impl DayKind {
    /// Muscle groups trained on this day, in display order
    pub fn muscle_groups(self) -> &'static [MuscleGroup] {
        use MuscleGroup::*;
        match self {
            DayKind::Push => &[Chest, Shoulders, Triceps],
            DayKind::Pull => &[BackThickness, BackWidth, RearDelts, Biceps],
            DayKind::Legs => &[Quads, Hamstrings, Calves],
            DayKind::Upper => &[
                Chest,
                Shoulders,
                Triceps,
                BackThickness,
                BackWidth,
                RearDelts,
                Biceps,
            ],
            DayKind::Lower => &[Quads, Hamstrings, Calves],
        }
    }
}

impl fmt::Display for DayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DayKind::Push => "Push",
            DayKind::Pull => "Pull",
            DayKind::Legs => "Legs",
            DayKind::Upper => "Upper",
            DayKind::Lower => "Lower",
        };
        f.write_str(label)
    }
}

/// A muscle group with the patterns that train it
#[derive(Clone, Debug)]
pub struct MuscleBucket<'a> {
    pub group: MuscleGroup,
    pub patterns: Vec<&'a MovementPattern>,
}

/// One generated training day
#[derive(Clone, Debug)]
pub struct SplitDay<'a> {
    pub kind: DayKind,
    pub buckets: Vec<MuscleBucket<'a>>,
}

impl<'a> SplitDay<'a> {
    /// All patterns of the day, bucket by bucket
    pub fn patterns(&self) -> impl Iterator<Item = &'a MovementPattern> + '_ {
        self.buckets.iter().flat_map(|b| b.patterns.iter().copied())
    }
}

/// An ordered split; day N is `days[N - 1]`
#[derive(Clone, Debug)]
pub struct Split<'a> {
    pub weekly_availability: u32,
    pub days: Vec<SplitDay<'a>>,
}

impl<'a> Split<'a> {
    /// Select a day by its 1-based "Day N" number
    pub fn day(&self, number: usize) -> Option<&SplitDay<'a>> {
        number.checked_sub(1).and_then(|i| self.days.get(i))
    }

    /// Convert into a plan whose days hold one slot per pattern
    ///
    /// Slots take the standard exercise's planned sets and the lower bound
    /// of its rep range. Ids are derived from the availability so the same
    /// split always yields the same plan and day ids.
    pub fn to_training_plan(&self) -> TrainingPlan {
        let days = self
            .days
            .iter()
            .enumerate()
            .map(|(i, day)| PlanDay {
                id: format!("day-{}", i + 1),
                name: format!("Day {}: {}", i + 1, day.kind),
                slots: day
                    .patterns()
                    .map(|p| PlannedSlot {
                        pattern_name: p.name.clone(),
                        sets: p.standard.sets,
                        reps: p.standard.min_reps().unwrap_or(8),
                    })
                    .collect(),
            })
            .collect();

        let kinds: Vec<String> = self.days.iter().map(|d| d.kind.to_string()).collect();
        TrainingPlan {
            id: format!("split-{}", self.weekly_availability),
            name: format!("{}-day split", self.weekly_availability),
            description: kinds.join(" / "),
            days,
        }
    }
}

/// Day sequence for a supported availability
pub fn day_kinds(weekly_availability: u32) -> Option<&'static [DayKind]> {
    use DayKind::*;
    match weekly_availability {
        2 => Some(&[Upper, Lower]),
        3 => Some(&[Push, Pull, Legs]),
        4 => Some(&[Upper, Lower, Upper, Lower]),
        5 => Some(&[Push, Pull, Legs, Upper, Lower]),
        6 => Some(&[Push, Pull, Legs, Push, Pull, Legs]),
        _ => None,
    }
}

/// Generates splits against a catalog
pub struct SplitGenerator<'a> {
    catalog: &'a Catalog,
    fallback_days: u32,
}

impl<'a> SplitGenerator<'a> {
    /// Create a generator; `config.fallback_days` must itself be supported
    pub fn new(catalog: &'a Catalog, config: &SplitConfig) -> crate::Result<Self> {
        if day_kinds(config.fallback_days).is_none() {
            return Err(crate::Error::Config(format!(
                "split.fallback_days must be within {:?}, got {}",
                SUPPORTED_AVAILABILITY, config.fallback_days
            )));
        }
        Ok(Self {
            catalog,
            fallback_days: config.fallback_days,
        })
    }

    /// Generate the split for a weekly availability
    ///
    /// Values outside 2..=6 use the configured fallback split.
    pub fn generate(&self, weekly_availability: u32) -> Split<'a> {
        let (effective, kinds) = match day_kinds(weekly_availability) {
            Some(kinds) => (weekly_availability, kinds),
            None => {
                tracing::warn!(
                    "Weekly availability {} unsupported, using {}-day fallback split",
                    weekly_availability,
                    self.fallback_days
                );
                (
                    self.fallback_days,
                    day_kinds(self.fallback_days).unwrap_or(&[]),
                )
            }
        };

        let days = kinds
            .iter()
            .map(|&kind| SplitDay {
                kind,
                buckets: kind
                    .muscle_groups()
                    .iter()
                    .map(|&group| MuscleBucket {
                        group,
                        patterns: self.catalog.patterns_for(group),
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!("Generated {}-day split", effective);
        Split {
            weekly_availability: effective,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;

    fn generator() -> SplitGenerator<'static> {
        SplitGenerator::new(get_default_catalog(), &SplitConfig::default()).unwrap()
    }

    #[test]
    fn test_split_length_matches_availability() {
        let gen = generator();
        for n in SUPPORTED_AVAILABILITY {
            let split = gen.generate(n);
            assert_eq!(split.days.len(), n as usize);
            for day in &split.days {
                assert!(
                    day.buckets.iter().any(|b| !b.patterns.is_empty()),
                    "{}-day split has an empty {} day",
                    n,
                    day.kind
                );
            }
        }
    }

    #[test]
    fn test_three_day_is_push_pull_legs() {
        let split = generator().generate(3);
        let kinds: Vec<_> = split.days.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DayKind::Push, DayKind::Pull, DayKind::Legs]);
    }

    #[test]
    fn test_out_of_range_uses_fallback() {
        let gen = generator();
        for n in [0, 1, 7, 12] {
            let split = gen.generate(n);
            assert_eq!(split.weekly_availability, 4);
            let kinds: Vec<_> = split.days.iter().map(|d| d.kind).collect();
            assert_eq!(
                kinds,
                vec![DayKind::Upper, DayKind::Lower, DayKind::Upper, DayKind::Lower]
            );
        }
    }

    #[test]
    fn test_fallback_is_configurable() {
        let config = SplitConfig { fallback_days: 3 };
        let gen = SplitGenerator::new(get_default_catalog(), &config).unwrap();
        assert_eq!(gen.generate(9).days.len(), 3);
    }

    #[test]
    fn test_unsupported_fallback_rejected() {
        let config = SplitConfig { fallback_days: 9 };
        assert!(SplitGenerator::new(get_default_catalog(), &config).is_err());
    }

    #[test]
    fn test_day_selection_is_one_based() {
        let split = generator().generate(5);
        assert_eq!(split.day(1).unwrap().kind, DayKind::Push);
        assert_eq!(split.day(5).unwrap().kind, DayKind::Lower);
        assert!(split.day(0).is_none());
        assert!(split.day(6).is_none());
    }

    #[test]
    fn test_upper_is_union_of_push_and_pull() {
        let mut union: Vec<_> = DayKind::Push.muscle_groups().to_vec();
        union.extend_from_slice(DayKind::Pull.muscle_groups());
        assert_eq!(DayKind::Upper.muscle_groups(), union.as_slice());
        assert_eq!(DayKind::Lower.muscle_groups(), DayKind::Legs.muscle_groups());
    }

    #[test]
    fn test_training_plan_ids_are_stable() {
        let plan = generator().generate(3).to_training_plan();
        assert_eq!(plan.id, "split-3");
        assert_eq!(plan.days[0].id, "day-1");
        assert_eq!(plan.days[0].name, "Day 1: Push");
        let first = &plan.days[0].slots[0];
        assert_eq!(first.pattern_name, "Horizontal Push");
        assert_eq!(first.sets, 3);
        assert_eq!(first.reps, 6);
    }
}
