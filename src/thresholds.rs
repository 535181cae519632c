//! Threshold and penalty tables shared by the insight engine and fatigue model
//!
//! Nutrition thresholds are ratios of today's intake to the daily target.
//! Every table has a `Default` holding the production values and can be
//! overridden from the `[thresholds]` section of the configuration file.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest lookback any window may use
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Largest single recovery penalty; a score cannot lose more than it has
pub const MAX_PENALTY: i32 = 100;

/// Intake ratios used by the nutrition rules and the recovery score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionThresholds {
    /// Protein below this ratio triggers the low-protein warning
    pub protein_low_ratio: Decimal,
    /// Protein below this ratio after training triggers the combined warning
    pub protein_very_low_ratio: Decimal,
    /// Protein at or above this ratio after training earns the combined achievement
    pub protein_good_ratio: Decimal,
    /// Lower bound (inclusive) of the on-target protein band
    pub protein_target_min: Decimal,
    /// Upper bound (inclusive) of the on-target protein band
    pub protein_target_max: Decimal,
    /// Protein below this ratio takes the heavier recovery penalty
    pub protein_critical_ratio: Decimal,
    /// Calories below this ratio trigger the severe deficit warning
    pub calorie_deficit_severe: Decimal,
    /// Calories below this ratio penalize recovery on a muscle goal
    pub calorie_deficit_moderate: Decimal,
    /// Calories above this ratio trigger the excess tip
    pub calorie_excess: Decimal,
}

impl Default for NutritionThresholds {
    fn default() -> Self {
        Self {
            protein_low_ratio: dec!(0.70),
            protein_very_low_ratio: dec!(0.60),
            protein_good_ratio: dec!(0.80),
            protein_target_min: dec!(0.90),
            protein_target_max: dec!(1.10),
            protein_critical_ratio: dec!(0.50),
            calorie_deficit_severe: dec!(0.50),
            calorie_deficit_moderate: dec!(0.70),
            calorie_excess: dec!(1.15),
        }
    }
}

/// Training-history thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutThresholds {
    /// This-week volume must exceed last week's by this factor
    pub volume_increase_ratio: Decimal,
    /// Today's volume must exceed the recent mean by this factor
    pub volume_above_average_ratio: Decimal,
    /// Minimum recent workouts before week-over-week volume is compared
    pub min_workouts_for_overload: usize,
    pub days_since_workout_warning: i64,
    pub consecutive_days_warning: u32,
    pub consecutive_days_moderate: u32,
    pub recent_window_days: i64,
    pub extended_window_days: i64,
    /// How far back the consecutive-day scan looks
    pub max_consecutive_check_days: u32,
}

impl Default for WorkoutThresholds {
    fn default() -> Self {
        Self {
            volume_increase_ratio: dec!(1.05),
            volume_above_average_ratio: dec!(1.10),
            min_workouts_for_overload: 2,
            days_since_workout_warning: 3,
            consecutive_days_warning: 5,
            consecutive_days_moderate: 3,
            recent_window_days: 7,
            extended_window_days: 14,
            max_consecutive_check_days: 14,
        }
    }
}

/// Points removed from the recovery score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPenalties {
    pub base_score: i32,
    pub consecutive_warning: i32,
    pub consecutive_moderate: i32,
    pub protein_very_low: i32,
    pub protein_low: i32,
    pub no_nutrition_data: i32,
    pub calorie_deficit_muscle_goal: i32,
}

impl Default for RecoveryPenalties {
    fn default() -> Self {
        Self {
            base_score: 100,
            consecutive_warning: 20,
            consecutive_moderate: 10,
            protein_very_low: 15,
            protein_low: 10,
            no_nutrition_data: 5,
            calorie_deficit_muscle_goal: 10,
        }
    }
}

/// Lookback windows for the fatigue model, in hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueWindows {
    pub fatigued_hours: i64,
    pub recovering_hours: i64,
}

impl Default for FatigueWindows {
    fn default() -> Self {
        Self {
            fatigued_hours: 24,
            recovering_hours: 48,
        }
    }
}

/// All tables in one place
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    #[serde(default)]
    pub nutrition: NutritionThresholds,
    #[serde(default)]
    pub workout: WorkoutThresholds,
    #[serde(default)]
    pub recovery: RecoveryPenalties,
    #[serde(default)]
    pub fatigue: FatigueWindows,
}

impl Thresholds {
    /// Reject tables whose bands overlap or invert
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = &self.nutrition;
        let ratios = [
            ("nutrition.protein_low_ratio", n.protein_low_ratio),
            ("nutrition.protein_very_low_ratio", n.protein_very_low_ratio),
            ("nutrition.protein_good_ratio", n.protein_good_ratio),
            ("nutrition.protein_target_min", n.protein_target_min),
            ("nutrition.protein_target_max", n.protein_target_max),
            ("nutrition.protein_critical_ratio", n.protein_critical_ratio),
            ("nutrition.calorie_deficit_severe", n.calorie_deficit_severe),
            ("nutrition.calorie_deficit_moderate", n.calorie_deficit_moderate),
            ("nutrition.calorie_excess", n.calorie_excess),
        ];
        for (name, value) in ratios {
            if value <= Decimal::ZERO {
                return Err(invalid(name, "ratio must be positive"));
            }
        }

        if n.protein_target_min > n.protein_target_max {
            return Err(invalid(
                "nutrition.protein_target_min",
                "on-target band lower bound exceeds upper bound",
            ));
        }
        if n.protein_low_ratio >= n.protein_target_min {
            return Err(invalid(
                "nutrition.protein_low_ratio",
                "low-protein band overlaps the on-target band",
            ));
        }
        if n.protein_critical_ratio > n.protein_low_ratio {
            return Err(invalid(
                "nutrition.protein_critical_ratio",
                "critical band must sit below the low band",
            ));
        }

        let w = &self.workout;
        if w.recent_window_days <= 0 || w.extended_window_days <= w.recent_window_days {
            return Err(invalid(
                "workout.extended_window_days",
                "extended window must be longer than the recent window",
            ));
        }
        if w.extended_window_days > MAX_WINDOW_DAYS {
            return Err(invalid(
                "workout.extended_window_days",
                &format!("must be at most {} days", MAX_WINDOW_DAYS),
            ));
        }
        if i64::from(w.max_consecutive_check_days) > MAX_WINDOW_DAYS {
            return Err(invalid(
                "workout.max_consecutive_check_days",
                &format!("must be at most {} days", MAX_WINDOW_DAYS),
            ));
        }
        if w.consecutive_days_moderate > w.consecutive_days_warning {
            return Err(invalid(
                "workout.consecutive_days_moderate",
                "moderate streak exceeds warning streak",
            ));
        }

        let f = &self.fatigue;
        if f.fatigued_hours <= 0 || f.recovering_hours <= f.fatigued_hours {
            return Err(invalid(
                "fatigue.recovering_hours",
                "recovering window must extend past the fatigued window",
            ));
        }
        if f.recovering_hours > MAX_WINDOW_DAYS * 24 {
            return Err(invalid(
                "fatigue.recovering_hours",
                &format!("must be at most {} hours", MAX_WINDOW_DAYS * 24),
            ));
        }

        let r = &self.recovery;
        if !(0..=100).contains(&r.base_score) {
            return Err(invalid("recovery.base_score", "must be within 0-100"));
        }
        let penalties = [
            ("recovery.consecutive_warning", r.consecutive_warning),
            ("recovery.consecutive_moderate", r.consecutive_moderate),
            ("recovery.protein_very_low", r.protein_very_low),
            ("recovery.protein_low", r.protein_low),
            ("recovery.no_nutrition_data", r.no_nutrition_data),
            ("recovery.calorie_deficit_muscle_goal", r.calorie_deficit_muscle_goal),
        ];
        for (name, penalty) in penalties {
            if !(0..=MAX_PENALTY).contains(&penalty) {
                return Err(invalid(
                    name,
                    &format!("penalty must be within 0-{}", MAX_PENALTY),
                ));
            }
        }

        Ok(())
    }
}

fn invalid(name: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidThreshold {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
    }

    #[test]
    fn test_overlapping_protein_bands_rejected() {
        let mut thresholds = Thresholds::default();
        thresholds.nutrition.protein_low_ratio = dec!(0.95);
        assert!(matches!(
            thresholds.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_inverted_fatigue_windows_rejected() {
        let mut thresholds = Thresholds::default();
        thresholds.fatigue.recovering_hours = 12;
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_oversized_windows_rejected() {
        let mut thresholds = Thresholds::default();
        thresholds.fatigue.recovering_hours = i64::MAX;
        assert!(thresholds.validate().is_err());

        let mut thresholds = Thresholds::default();
        thresholds.fatigue.recovering_hours = MAX_WINDOW_DAYS * 24;
        assert!(thresholds.validate().is_ok());

        let mut thresholds = Thresholds::default();
        thresholds.workout.extended_window_days = i64::MAX;
        assert!(thresholds.validate().is_err());

        let mut thresholds = Thresholds::default();
        thresholds.workout.max_consecutive_check_days = u32::MAX;
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_penalties_must_stay_in_range() {
        let mut thresholds = Thresholds::default();
        thresholds.recovery.no_nutrition_data = i32::MIN;
        assert!(matches!(
            thresholds.validate(),
            Err(ConfigError::InvalidThreshold { ref name, .. }) if name == "recovery.no_nutrition_data"
        ));

        let mut thresholds = Thresholds::default();
        thresholds.recovery.consecutive_warning = MAX_PENALTY + 1;
        assert!(thresholds.validate().is_err());

        let mut thresholds = Thresholds::default();
        thresholds.recovery.protein_low = MAX_PENALTY;
        assert!(thresholds.validate().is_ok());
    }

    #[test]
    fn test_zero_ratio_rejected() {
        let mut thresholds = Thresholds::default();
        thresholds.nutrition.calorie_excess = Decimal::ZERO;
        assert!(thresholds.validate().is_err());
    }
}
