//! Session building from plan days and past ledger entries.
//!
//! A built session is an editable [`SessionDraft`]: the user fills in set
//! slots and appends extra sets, then the draft is validated into a
//! [`ProgressEntry`] for the ledger.

use crate::catalog::Catalog;
use crate::error::ValidationError;
use crate::preferences::resolve;
use crate::types::{
    ActiveView, ExercisePreferences, LoggedExercise, PlanDay, ProgressEntry, SetEntry,
    TrainingPlan,
};
use chrono::NaiveDate;

/// Builds loggable exercise lists
pub struct SessionBuilder<'a> {
    catalog: &'a Catalog,
}

impl<'a> SessionBuilder<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Build the exercise list for a plan day
    ///
    /// Planned sets/reps come from the slot, never from the resolved
    /// exercise. Slots naming an unknown pattern are logged under that name
    /// with a target RIR of 0.
    pub fn build(&self, day: &PlanDay, prefs: &ExercisePreferences) -> Vec<LoggedExercise> {
        day.slots
            .iter()
            .map(|slot| {
                let (name, rir, notes, pattern_name) = match self.catalog.pattern(&slot.pattern_name) {
                    Some(pattern) => {
                        let chosen = resolve(pattern, prefs);
                        (
                            chosen.name.clone(),
                            chosen.rir,
                            chosen.notes.clone(),
                            Some(pattern.name.clone()),
                        )
                    }
                    None => {
                        tracing::debug!(
                            "Slot '{}' is not a known pattern, logging it literally",
                            slot.pattern_name
                        );
                        (slot.pattern_name.clone(), 0, None, None)
                    }
                };

                LoggedExercise {
                    name,
                    sets: slot.sets,
                    reps: slot.reps,
                    logged_sets: vec![SetEntry::default(); slot.sets as usize],
                    movement_pattern_name: pattern_name,
                    rir,
                    notes,
                }
            })
            .collect()
    }

    /// Start a draft for a plan day and switch the view to logging
    pub fn start(
        &self,
        plan: &TrainingPlan,
        day: &PlanDay,
        prefs: &ExercisePreferences,
    ) -> (SessionDraft, ActiveView) {
        let draft = SessionDraft {
            date: None,
            body_weight: 0.0,
            plan_id: Some(plan.id.clone()),
            day_id: Some(day.id.clone()),
            exercises: self.build(day, prefs),
        };
        (draft, ActiveView::Log)
    }

    /// Start a draft from a past entry
    ///
    /// The exercise list and plan selection are copied; every logged slot
    /// is reset to an empty set so the count of sets done last time is kept.
    pub fn from_template(&self, entry: &ProgressEntry) -> (SessionDraft, ActiveView) {
        let exercises = entry
            .logged_exercises
            .iter()
            .map(|ex| LoggedExercise {
                logged_sets: vec![SetEntry::default(); ex.logged_sets.len().max(ex.sets as usize)],
                ..ex.clone()
            })
            .collect();

        let draft = SessionDraft {
            date: None,
            body_weight: entry.body_weight,
            plan_id: entry.selected_plan_id.clone(),
            day_id: entry.selected_plan_day_id.clone(),
            exercises,
        };
        (draft, ActiveView::Log)
    }
}

/// An editable session that has not been submitted yet
#[derive(Clone, Debug, PartialEq)]
pub struct SessionDraft {
    pub date: Option<NaiveDate>,
    pub body_weight: f64,
    pub plan_id: Option<String>,
    pub day_id: Option<String>,
    pub exercises: Vec<LoggedExercise>,
}

impl SessionDraft {
    /// Append an empty set to an exercise; `false` if the index is invalid
    pub fn add_set(&mut self, exercise: usize) -> bool {
        match self.exercises.get_mut(exercise) {
            Some(ex) => {
                ex.add_set();
                true
            }
            None => false,
        }
    }

    /// Fill a set slot; `false` if either index is invalid
    pub fn fill_set(&mut self, exercise: usize, set: usize, entry: SetEntry) -> bool {
        match self
            .exercises
            .get_mut(exercise)
            .and_then(|ex| ex.logged_sets.get_mut(set))
        {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    /// Check the draft is complete enough to be recorded
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.plan_id.is_none() {
            return Err(ValidationError::MissingPlan);
        }
        if self.day_id.is_none() {
            return Err(ValidationError::MissingDay);
        }
        if self.date.is_none() {
            return Err(ValidationError::MissingDate);
        }
        if self.exercises.is_empty() {
            return Err(ValidationError::NoExercises);
        }
        Ok(())
    }

    /// Validate and turn the draft into a ledger entry
    pub fn into_entry(self) -> Result<ProgressEntry, ValidationError> {
        self.validate()?;
        let date = self.date.ok_or(ValidationError::MissingDate)?;
        Ok(ProgressEntry {
            date,
            body_weight: self.body_weight,
            selected_plan_id: self.plan_id,
            selected_plan_day_id: self.day_id,
            logged_exercises: self.exercises,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get_default_catalog, predefined_plans};
    use crate::types::PlannedSlot;

    fn push_day() -> (TrainingPlan, PlanDay) {
        let plan = predefined_plans().remove(0);
        let day = plan.days[0].clone();
        (plan, day)
    }

    #[test]
    fn test_build_uses_slot_targets_not_catalog() {
        let builder = SessionBuilder::new(get_default_catalog());
        let day = PlanDay {
            id: "d".into(),
            name: "Test".into(),
            slots: vec![PlannedSlot {
                pattern_name: "Horizontal Push".into(),
                sets: 5,
                reps: 5,
            }],
        };
        let exercises = builder.build(&day, &ExercisePreferences::new());
        assert_eq!(exercises.len(), 1);
        let bench = &exercises[0];
        assert_eq!(bench.name, "Barbell Bench Press");
        assert_eq!(bench.sets, 5);
        assert_eq!(bench.reps, 5);
        assert_eq!(bench.rir, 2);
        assert_eq!(bench.logged_sets, vec![SetEntry::default(); 5]);
        assert_eq!(bench.movement_pattern_name.as_deref(), Some("Horizontal Push"));
    }

    #[test]
    fn test_build_applies_preferences() {
        let builder = SessionBuilder::new(get_default_catalog());
        let (_, day) = push_day();
        let mut prefs = ExercisePreferences::new();
        prefs.insert("Horizontal Push".into(), "Dumbbell Bench Press".into());
        let exercises = builder.build(&day, &prefs);
        assert_eq!(exercises[0].name, "Dumbbell Bench Press");
    }

    #[test]
    fn test_unknown_pattern_is_literal() {
        let builder = SessionBuilder::new(get_default_catalog());
        let legs = predefined_plans().remove(0).days.remove(2);
        let exercises = builder.build(&legs, &ExercisePreferences::new());
        let literal = exercises.last().unwrap();
        assert_eq!(literal.name, "Hanging Leg Raise");
        assert_eq!(literal.rir, 0);
        assert!(literal.notes.is_none());
        assert!(literal.movement_pattern_name.is_none());
        assert_eq!(literal.logged_sets.len(), 3);
    }

    #[test]
    fn test_start_switches_to_log_view() {
        let builder = SessionBuilder::new(get_default_catalog());
        let (plan, day) = push_day();
        let (draft, view) = builder.start(&plan, &day, &ExercisePreferences::new());
        assert_eq!(view, ActiveView::Log);
        assert_eq!(draft.plan_id.as_deref(), Some("ppl-classic"));
        assert_eq!(draft.day_id.as_deref(), Some("push"));
    }

    #[test]
    fn test_add_set_has_no_upper_bound() {
        let builder = SessionBuilder::new(get_default_catalog());
        let (plan, day) = push_day();
        let (mut draft, _) = builder.start(&plan, &day, &ExercisePreferences::new());
        let planned = draft.exercises[0].sets as usize;
        for _ in 0..10 {
            assert!(draft.add_set(0));
        }
        assert_eq!(draft.exercises[0].logged_sets.len(), planned + 10);
        assert!(!draft.add_set(99));
    }

    #[test]
    fn test_validation_reports_missing_fields() {
        let builder = SessionBuilder::new(get_default_catalog());
        let (plan, day) = push_day();
        let (mut draft, _) = builder.start(&plan, &day, &ExercisePreferences::new());

        assert_eq!(draft.validate(), Err(ValidationError::MissingDate));

        draft.date = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.day_id = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingDay));

        draft.plan_id = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingPlan));

        draft.plan_id = Some("p".into());
        draft.day_id = Some("d".into());
        draft.exercises.clear();
        assert_eq!(draft.clone().into_entry(), Err(ValidationError::NoExercises));
    }

    #[test]
    fn test_template_resets_sets_and_keeps_count() {
        let builder = SessionBuilder::new(get_default_catalog());
        let (plan, day) = push_day();
        let (mut draft, _) = builder.start(&plan, &day, &ExercisePreferences::new());
        draft.date = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.body_weight = 81.0;
        draft.add_set(0);
        draft.fill_set(0, 0, SetEntry::new(100.0, 5, 1));
        let entry = draft.into_entry().unwrap();

        let (copy, view) = builder.from_template(&entry);
        assert_eq!(view, ActiveView::Log);
        assert!(copy.date.is_none());
        assert_eq!(copy.body_weight, 81.0);
        assert_eq!(copy.plan_id, entry.selected_plan_id);
        assert_eq!(copy.exercises[0].name, entry.logged_exercises[0].name);
        assert_eq!(
            copy.exercises[0].logged_sets,
            vec![SetEntry::default(); entry.logged_exercises[0].logged_sets.len()]
        );
    }
}
