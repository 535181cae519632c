//! Daily calorie and macro targets
//!
//! # Method
//!
//! - **BMR**: Mifflin-St Jeor, `10 x kg + 6.25 x cm - 5 x age`, plus 5 for men
//!   and minus 161 for women
//! - **TDEE**: BMR x activity multiplier
//! - **Goal adjustment**: +10% for muscle gain, -20% for fat loss
//! - **Macros**: share of calories per goal, at 4 kcal/g for protein and carbs
//!   and 9 kcal/g for fat
//!
//! | Goal        | Protein | Carbs | Fats |
//! |-------------|---------|-------|------|
//! | Muscle      | 30%     | 45%   | 25%  |
//! | Fat loss    | 35%     | 35%   | 30%  |
//! | Maintenance | 25%     | 50%   | 25%  |
//!
//! Every intermediate value is rounded to whole units, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VitalisError};
use crate::models::{Goal, Sex, UserProfile};

/// Grams per day for each macro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
}

/// Full set of daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTargets {
    pub bmr: Decimal,
    pub tdee: Decimal,
    pub calories: Decimal,
    pub macros: MacroSplit,
}

fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Basal metabolic rate in kcal/day
pub fn calculate_bmr(weight_kg: Decimal, height_cm: Decimal, age: u16, sex: Sex) -> Decimal {
    let base = dec!(10) * weight_kg + dec!(6.25) * height_cm - dec!(5) * Decimal::from(age);
    let offset = match sex {
        Sex::Male => dec!(5),
        Sex::Female => dec!(-161),
    };
    round_whole(base + offset)
}

/// Total daily energy expenditure in kcal/day
pub fn calculate_tdee(bmr: Decimal, activity_level: Decimal) -> Decimal {
    round_whole(bmr * activity_level)
}

/// Calorie target after the goal surplus or deficit
pub fn goal_calories(tdee: Decimal, goal: Goal) -> Decimal {
    match goal {
        Goal::Muscle => round_whole(tdee * dec!(1.1)),
        Goal::FatLoss => round_whole(tdee * dec!(0.8)),
        Goal::Maintenance => tdee,
    }
}

pub fn calculate_macros(calories: Decimal, goal: Goal) -> MacroSplit {
    let (protein, carbs, fats) = match goal {
        Goal::Muscle => (dec!(0.30), dec!(0.45), dec!(0.25)),
        Goal::FatLoss => (dec!(0.35), dec!(0.35), dec!(0.30)),
        Goal::Maintenance => (dec!(0.25), dec!(0.50), dec!(0.25)),
    };

    MacroSplit {
        protein: round_whole(calories * protein / dec!(4)),
        carbs: round_whole(calories * carbs / dec!(4)),
        fats: round_whole(calories * fats / dec!(9)),
    }
}

/// Derive targets from a profile's biometrics
pub fn derive_targets(profile: &UserProfile) -> Result<DailyTargets> {
    validate_biometrics(profile)?;

    let bmr = calculate_bmr(profile.weight_kg, profile.height_cm, profile.age, profile.sex);
    let tdee = calculate_tdee(bmr, profile.activity_level);
    let calories = goal_calories(tdee, profile.goal);

    Ok(DailyTargets {
        bmr,
        tdee,
        calories,
        macros: calculate_macros(calories, profile.goal),
    })
}

fn validate_biometrics(profile: &UserProfile) -> Result<()> {
    if profile.age == 0 {
        return Err(VitalisError::Validation("age must be positive".to_string()));
    }
    if profile.weight_kg <= Decimal::ZERO {
        return Err(VitalisError::Validation(format!(
            "weight must be positive, got {}",
            profile.weight_kg
        )));
    }
    if profile.height_cm <= Decimal::ZERO {
        return Err(VitalisError::Validation(format!(
            "height must be positive, got {}",
            profile.height_cm
        )));
    }
    if profile.activity_level <= Decimal::ZERO {
        return Err(VitalisError::Validation(format!(
            "activity level must be positive, got {}",
            profile.activity_level
        )));
    }
    Ok(())
}

impl UserProfile {
    /// Overwrite the four daily targets with values derived from biometrics
    pub fn recalculate_targets(&mut self) -> Result<DailyTargets> {
        let targets = derive_targets(self)?;
        self.calorie_target = targets.calories;
        self.protein_target = targets.macros.protein;
        self.carbs_target = targets.macros.carbs;
        self.fats_target = targets.macros.fats;

        tracing::debug!(
            calories = %targets.calories,
            protein = %targets.macros.protein,
            "Recalculated daily targets"
        );
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(sex: Sex, goal: Goal) -> UserProfile {
        UserProfile {
            name: None,
            age: 28,
            sex,
            height_cm: dec!(178),
            weight_kg: dec!(75),
            goal,
            activity_level: dec!(1.55),
            calorie_target: Decimal::ZERO,
            protein_target: Decimal::ZERO,
            carbs_target: Decimal::ZERO,
            fats_target: Decimal::ZERO,
        }
    }

    #[test]
    fn test_bmr() {
        // 750 + 1112.5 - 140 + 5 = 1727.5
        assert_eq!(calculate_bmr(dec!(75), dec!(178), 28, Sex::Male), dec!(1728));
        // 600 + 1031.25 - 175 - 161 = 1295.25
        assert_eq!(calculate_bmr(dec!(60), dec!(165), 35, Sex::Female), dec!(1295));
    }

    #[test]
    fn test_muscle_targets() {
        let targets = derive_targets(&profile(Sex::Male, Goal::Muscle)).unwrap();
        assert_eq!(targets.bmr, dec!(1728));
        assert_eq!(targets.tdee, dec!(2678));
        assert_eq!(targets.calories, dec!(2946));
        assert_eq!(targets.macros.protein, dec!(221));
        assert_eq!(targets.macros.carbs, dec!(331));
        assert_eq!(targets.macros.fats, dec!(82));
    }

    #[test]
    fn test_fat_loss_and_maintenance_calories() {
        assert_eq!(goal_calories(dec!(2678), Goal::FatLoss), dec!(2142));
        assert_eq!(goal_calories(dec!(2678), Goal::Maintenance), dec!(2678));
    }

    #[test]
    fn test_macro_splits() {
        let split = calculate_macros(dec!(2000), Goal::Maintenance);
        assert_eq!(split.protein, dec!(125));
        assert_eq!(split.carbs, dec!(250));
        assert_eq!(split.fats, dec!(56));

        let split = calculate_macros(dec!(2000), Goal::FatLoss);
        assert_eq!(split.protein, dec!(175));
        assert_eq!(split.carbs, dec!(175));
        assert_eq!(split.fats, dec!(67));
    }

    #[test]
    fn test_recalculate_updates_profile() {
        let mut user = profile(Sex::Male, Goal::Muscle);
        user.recalculate_targets().unwrap();
        assert_eq!(user.calorie_target, dec!(2946));
        assert_eq!(user.protein_target, dec!(221));
    }

    #[test]
    fn test_invalid_biometrics_rejected() {
        let mut user = profile(Sex::Female, Goal::Maintenance);
        user.weight_kg = Decimal::ZERO;
        assert!(matches!(derive_targets(&user), Err(VitalisError::Validation(_))));

        let mut user = profile(Sex::Female, Goal::Maintenance);
        user.activity_level = dec!(-1);
        assert!(derive_targets(&user).is_err());
    }
}
