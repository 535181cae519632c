//! Personal record detection for a finished workout
//!
//! Each exercise in the workout is compared against the same exercise (matched
//! by name) in earlier completed sessions. Only completed non-warmup sets count.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ExerciseEntry, WorkoutRecord};

/// What kind of record was set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// No earlier session has this exercise
    FirstTime,
    /// Heaviest working set ever
    Weight,
    /// Highest single-session volume for the exercise
    Volume,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise_name: String,
    pub kind: RecordKind,
    /// Weight (kg) or volume (kg x reps); `None` for first-time records
    pub value: Option<Decimal>,
}

impl fmt::Display for PersonalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.value) {
            (RecordKind::Weight, Some(v)) => write!(f, "{}: {}kg (Weight PR)", self.exercise_name, v),
            (RecordKind::Volume, Some(v)) => write!(f, "{}: {}kg (Volume PR)", self.exercise_name, v),
            _ => write!(f, "{} (First Time)", self.exercise_name),
        }
    }
}

/// Records set by `workout` relative to `history`
///
/// History entries with the same id as `workout`, that are not completed, or
/// that took place on or after the workout's date are ignored.
pub fn detect_personal_records(workout: &WorkoutRecord, history: &[WorkoutRecord]) -> Vec<PersonalRecord> {
    let earlier: Vec<&WorkoutRecord> = history
        .iter()
        .filter(|w| w.is_completed() && w.id != workout.id && w.date() < workout.date())
        .collect();

    let mut records = Vec::new();

    for exercise in &workout.exercises {
        let Some(max_weight) = exercise.max_weight() else {
            continue;
        };

        let previous: Vec<&ExerciseEntry> = earlier
            .iter()
            .flat_map(|w| w.exercises.iter())
            .filter(|e| e.exercise_name == exercise.exercise_name && e.working_sets().next().is_some())
            .collect();

        if previous.is_empty() {
            records.push(PersonalRecord {
                exercise_name: exercise.exercise_name.clone(),
                kind: RecordKind::FirstTime,
                value: None,
            });
            continue;
        }

        let previous_max_weight = previous.iter().filter_map(|e| e.max_weight()).max();
        if previous_max_weight.is_some_and(|prev| max_weight > prev) {
            records.push(PersonalRecord {
                exercise_name: exercise.exercise_name.clone(),
                kind: RecordKind::Weight,
                value: Some(max_weight),
            });
        }

        let volume = exercise.volume();
        let previous_max_volume = previous.iter().map(|e| e.volume()).max();
        if previous_max_volume.is_some_and(|prev| volume > prev) {
            records.push(PersonalRecord {
                exercise_name: exercise.exercise_name.clone(),
                kind: RecordKind::Volume,
                value: Some(volume),
            });
        }
    }

    records
}
