//! Muscle fatigue model behind the body-status visualization
//!
//! Each completed workout marks the body regions its exercises train:
//!
//! - performed within the fatigued window (24h): the region becomes `Fatigued`
//! - within the recovering window (48h): the region becomes `Recovering`, but
//!   only if nothing more recent has already marked it
//! - older: no effect
//!
//! The model sorts its own copy of the history newest-first before applying
//! these rules, so callers may pass workouts in any order.

use chrono::{DateTime, Utc};

use crate::catalog::ExerciseCatalog;
use crate::history;
use crate::models::{BodyRegion, BodyStatus, MuscleStatus, WorkoutRecord};
use crate::thresholds::FatigueWindows;

/// Derives [`BodyStatus`] from workout history
#[derive(Debug, Clone)]
pub struct FatigueModel {
    catalog: ExerciseCatalog,
    windows: FatigueWindows,
}

impl Default for FatigueModel {
    fn default() -> Self {
        Self::new(ExerciseCatalog::builtin())
    }
}

impl FatigueModel {
    pub fn new(catalog: ExerciseCatalog) -> Self {
        Self {
            catalog,
            windows: FatigueWindows::default(),
        }
    }

    pub fn with_windows(catalog: ExerciseCatalog, windows: FatigueWindows) -> Self {
        Self { catalog, windows }
    }

    pub fn catalog(&self) -> &ExerciseCatalog {
        &self.catalog
    }

    /// Per-region status as of `now`
    pub fn derive_body_status(&self, workouts: &[WorkoutRecord], now: DateTime<Utc>) -> BodyStatus {
        let mut ordered: Vec<&WorkoutRecord> = workouts.iter().filter(|w| w.is_completed()).collect();
        ordered.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));

        let fatigued_window = history::saturating_hours(self.windows.fatigued_hours);
        let recovering_window = history::saturating_hours(self.windows.recovering_hours);
        let mut status = BodyStatus::default();

        for workout in ordered {
            let elapsed = now - workout.performed_at;
            if elapsed > recovering_window {
                continue;
            }

            for region in self.regions_trained(workout) {
                if elapsed <= fatigued_window {
                    status.set(region, MuscleStatus::Fatigued);
                } else if status.get(region) == MuscleStatus::Fresh {
                    status.set(region, MuscleStatus::Recovering);
                }
            }
        }

        status
    }

    /// Mark every region a just-finished workout trained as fatigued
    ///
    /// Regions the workout does not touch keep their current status.
    pub fn apply_workout(&self, current: &BodyStatus, workout: &WorkoutRecord) -> BodyStatus {
        let regions = self.regions_trained(workout);
        if regions.is_empty() {
            tracing::warn!(workout = %workout.name, "No exercises resolved to a muscle group");
            return *current;
        }

        let mut updated = *current;
        for region in regions {
            updated.set(region, MuscleStatus::Fatigued);
        }
        tracing::debug!(workout = %workout.name, status = ?updated, "Applied workout fatigue");
        updated
    }

    /// Distinct regions trained by a workout, in first-seen order
    pub fn regions_trained(&self, workout: &WorkoutRecord) -> Vec<BodyRegion> {
        let mut regions = Vec::with_capacity(BodyRegion::ALL.len());

        for exercise in &workout.exercises {
            match self.catalog.muscle_group_of(exercise) {
                Some(group) => {
                    let region = group.region();
                    if !regions.contains(&region) {
                        regions.push(region);
                    }
                }
                None => tracing::debug!(
                    exercise_id = %exercise.exercise_id,
                    exercise = %exercise.exercise_name,
                    "Exercise not in catalog, skipping"
                ),
            }
        }

        regions
    }
}

/// Training suggestion for today based on which regions are fresh
pub fn suggest_focus(status: &BodyStatus) -> &'static str {
    match suggest_focus_region(status) {
        Some(BodyRegion::LowerBody) => "Lower body is fresh - great day for legs!",
        Some(BodyRegion::UpperBody) => "Upper body is fresh - perfect for push/pull!",
        Some(BodyRegion::Core) => "Core is ready - add some ab work today!",
        _ => "Consider active recovery or light cardio today.",
    }
}

/// First fresh region in priority order lower body, upper body, core
pub fn suggest_focus_region(status: &BodyStatus) -> Option<BodyRegion> {
    [BodyRegion::LowerBody, BodyRegion::UpperBody, BodyRegion::Core]
        .into_iter()
        .find(|region| status.get(*region) == MuscleStatus::Fresh)
}
