//! Rule-based insight engine and recovery score
//!
//! Rules are evaluated in the fixed order of [`Rule::ORDERED`]. A single insight
//! comes from the first matching rule; a bounded list accumulates matches in the
//! same order. When nothing matches a general "all systems nominal" tip is
//! returned instead.
//!
//! Nutrition rules compare today's intake against the profile targets. A day
//! without a nutrition log, or a profile with a non-positive target, simply fails
//! those rules.
//!
//! ```rust
//! use vitalis::insights::InsightEngine;
//! # use vitalis::models::*;
//! # use chrono::Utc;
//! # use rust_decimal_macros::dec;
//! # let context = AiContext {
//! #     user: UserProfile {
//! #         name: None, age: 30, sex: Sex::Female, height_cm: dec!(168), weight_kg: dec!(62),
//! #         goal: Goal::Maintenance, activity_level: dec!(1.55), calorie_target: dec!(2100),
//! #         protein_target: dec!(130), carbs_target: dec!(260), fats_target: dec!(58),
//! #     },
//! #     today_nutrition: None, today_workout: None, recent_workouts: vec![],
//! #     weekly_calories: vec![], body_status: BodyStatus::default(), as_of: Utc::now(),
//! # };
//! let engine = InsightEngine::new();
//! let evaluation = engine.evaluate(&context);
//! assert!(!evaluation.insights.is_empty());
//! assert!(evaluation.recovery_score <= 100);
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::history;
use crate::models::{AiContext, AiInsight, Goal, InsightCategory, InsightKind};
use crate::thresholds::Thresholds;

const FALLBACK_MESSAGE: &str = "All systems nominal. Keep up the consistency!";

/// Default number of insights returned by [`InsightEngine::evaluate`]
pub const DEFAULT_INSIGHT_LIMIT: usize = 3;

/// A single insight rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ProteinLow,
    CalorieDeficitSevere,
    CalorieExcess,
    ProteinOnTarget,
    ProgressiveOverload,
    Inactivity,
    AboveAverageVolume,
    Overtraining,
    TrainedLowProtein,
    TrainedAndFueled,
}

impl Rule {
    /// Evaluation order
    pub const ORDERED: [Rule; 10] = [
        Rule::ProteinLow,
        Rule::CalorieDeficitSevere,
        Rule::CalorieExcess,
        Rule::ProteinOnTarget,
        Rule::ProgressiveOverload,
        Rule::Inactivity,
        Rule::AboveAverageVolume,
        Rule::Overtraining,
        Rule::TrainedLowProtein,
        Rule::TrainedAndFueled,
    ];

    pub fn kind(&self) -> InsightKind {
        match self {
            Rule::ProteinLow
            | Rule::CalorieDeficitSevere
            | Rule::Overtraining
            | Rule::TrainedLowProtein => InsightKind::Warning,
            Rule::CalorieExcess | Rule::Inactivity => InsightKind::Tip,
            Rule::ProteinOnTarget
            | Rule::ProgressiveOverload
            | Rule::AboveAverageVolume
            | Rule::TrainedAndFueled => InsightKind::Achievement,
        }
    }

    pub fn category(&self) -> InsightCategory {
        match self {
            Rule::ProteinLow
            | Rule::CalorieDeficitSevere
            | Rule::CalorieExcess
            | Rule::ProteinOnTarget => InsightCategory::Nutrition,
            Rule::ProgressiveOverload | Rule::Inactivity | Rule::AboveAverageVolume => {
                InsightCategory::Workout
            }
            Rule::Overtraining => InsightCategory::Recovery,
            Rule::TrainedLowProtein | Rule::TrainedAndFueled => InsightCategory::Combined,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Rule::ProteinLow => {
                "Protein intake low. Consider adding a shake or lean protein source."
            }
            Rule::CalorieDeficitSevere => {
                "You're in a significant caloric deficit today. Don't forget to fuel properly."
            }
            Rule::CalorieExcess => {
                "Calorie target exceeded. Consider a lighter dinner or extra cardio."
            }
            Rule::ProteinOnTarget => "Protein intake on point! Great job hitting your macros.",
            Rule::ProgressiveOverload => {
                "Progressive overload achieved! Volume up from last week."
            }
            Rule::Inactivity => {
                "It's been 3+ days since your last workout. Time to hit the gym?"
            }
            Rule::AboveAverageVolume => "Great session! Your volume today exceeded your average.",
            Rule::Overtraining => {
                "5+ consecutive training days. Consider scheduling a rest day for recovery."
            }
            Rule::TrainedLowProtein => {
                "You trained today but protein is low. Prioritize protein in your next meal."
            }
            Rule::TrainedAndFueled => "Training + solid protein intake today. Gains loading...",
        }
    }

    /// Stable identifier used in logs and insight ids
    pub fn key(&self) -> &'static str {
        match self {
            Rule::ProteinLow => "protein_low",
            Rule::CalorieDeficitSevere => "calorie_deficit_severe",
            Rule::CalorieExcess => "calorie_excess",
            Rule::ProteinOnTarget => "protein_on_target",
            Rule::ProgressiveOverload => "progressive_overload",
            Rule::Inactivity => "inactivity",
            Rule::AboveAverageVolume => "above_average_volume",
            Rule::Overtraining => "overtraining",
            Rule::TrainedLowProtein => "trained_low_protein",
            Rule::TrainedAndFueled => "trained_and_fueled",
        }
    }

    /// Whether this rule's condition holds for the context
    pub fn matches(&self, ctx: &AiContext, thresholds: &Thresholds) -> bool {
        let n = &thresholds.nutrition;
        let w = &thresholds.workout;
        let user = &ctx.user;

        match self {
            Rule::ProteinLow => ctx.today_nutrition.as_ref().is_some_and(|day| {
                below(day.total_protein, user.protein_target, n.protein_low_ratio)
            }),
            Rule::CalorieDeficitSevere => ctx.today_nutrition.as_ref().is_some_and(|day| {
                below(day.total_calories, user.calorie_target, n.calorie_deficit_severe)
            }),
            Rule::CalorieExcess => ctx.today_nutrition.as_ref().is_some_and(|day| {
                above(day.total_calories, user.calorie_target, n.calorie_excess)
            }),
            Rule::ProteinOnTarget => ctx.today_nutrition.as_ref().is_some_and(|day| {
                within(
                    day.total_protein,
                    user.protein_target,
                    n.protein_target_min,
                    n.protein_target_max,
                )
            }),
            Rule::ProgressiveOverload => {
                if ctx.recent_workouts.len() < w.min_workouts_for_overload {
                    return false;
                }
                let volume = history::weekly_volume(
                    &ctx.recent_workouts,
                    ctx.as_of,
                    w.recent_window_days,
                    w.extended_window_days,
                );
                volume.this_week > volume.last_week * w.volume_increase_ratio
            }
            Rule::Inactivity => {
                match history::days_since_last_workout(&ctx.recent_workouts, ctx.as_of) {
                    Some(days) => days >= w.days_since_workout_warning,
                    None => true,
                }
            }
            Rule::AboveAverageVolume => ctx
                .today_workout
                .as_ref()
                .filter(|today| today.is_completed())
                .is_some_and(|today| {
                    today.total_volume
                        > history::average_volume(&ctx.recent_workouts)
                            * w.volume_above_average_ratio
                }),
            Rule::Overtraining => {
                consecutive_days(ctx, thresholds) >= w.consecutive_days_warning
            }
            Rule::TrainedLowProtein => {
                trained_today(ctx)
                    && ctx.today_nutrition.as_ref().is_some_and(|day| {
                        below(day.total_protein, user.protein_target, n.protein_very_low_ratio)
                    })
            }
            Rule::TrainedAndFueled => {
                trained_today(ctx)
                    && ctx.today_nutrition.as_ref().is_some_and(|day| {
                        at_least(day.total_protein, user.protein_target, n.protein_good_ratio)
                    })
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category(), self.key())
    }
}

/// Recovery score interpretation used for dashboard colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryBand {
    /// 80 and above
    Optimal,
    /// 50 to 79
    Moderate,
    /// Below 50
    Low,
}

impl RecoveryBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            RecoveryBand::Optimal
        } else if score >= 50 {
            RecoveryBand::Moderate
        } else {
            RecoveryBand::Low
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecoveryBand::Optimal => "Fully recovered, ready for hard training",
            RecoveryBand::Moderate => "Partially recovered, train with moderation",
            RecoveryBand::Low => "Under-recovered, prioritize rest and nutrition",
        }
    }
}

impl fmt::Display for RecoveryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryBand::Optimal => write!(f, "Optimal"),
            RecoveryBand::Moderate => write!(f, "Moderate"),
            RecoveryBand::Low => write!(f, "Low"),
        }
    }
}

/// Output of a full evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub insights: Vec<AiInsight>,
    pub recovery_score: u8,
    pub recovery_band: RecoveryBand,
}

/// Evaluates insight rules and the recovery score against an [`AiContext`]
///
/// The engine holds only configuration, so one instance can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct InsightEngine {
    thresholds: Thresholds,
    default_limit: usize,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    pub fn new() -> Self {
        Self {
            thresholds: Thresholds::default(),
            default_limit: DEFAULT_INSIGHT_LIMIT,
        }
    }

    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            default_limit: DEFAULT_INSIGHT_LIMIT,
        }
    }

    /// Change how many insights [`evaluate`](Self::evaluate) returns
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Insights (up to the configured limit) plus the recovery score
    pub fn evaluate(&self, ctx: &AiContext) -> Evaluation {
        let insights = self.generate_insights(ctx, self.default_limit);
        let recovery_score = self.calculate_recovery_score(ctx);

        tracing::debug!(
            as_of = %ctx.as_of,
            insights = insights.len(),
            recovery_score,
            "Evaluated insight context"
        );

        Evaluation {
            insights,
            recovery_score,
            recovery_band: RecoveryBand::from_score(recovery_score),
        }
    }

    /// Every rule whose condition holds, in evaluation order
    pub fn matching_rules(&self, ctx: &AiContext) -> Vec<Rule> {
        Rule::ORDERED
            .into_iter()
            .filter(|rule| rule.matches(ctx, &self.thresholds))
            .collect()
    }

    /// Insight from the first matching rule, or the fallback tip
    pub fn generate_insight(&self, ctx: &AiContext) -> AiInsight {
        Rule::ORDERED
            .into_iter()
            .find(|rule| rule.matches(ctx, &self.thresholds))
            .map(|rule| rule_insight(rule, ctx.as_of))
            .unwrap_or_else(|| fallback_insight(ctx.as_of))
    }

    /// Up to `limit` insights in rule order, or the single fallback tip
    ///
    /// Evaluation stops as soon as `limit` matches are collected. A `limit` of
    /// zero therefore collects nothing and yields the fallback.
    pub fn generate_insights(&self, ctx: &AiContext, limit: usize) -> Vec<AiInsight> {
        let mut insights = Vec::with_capacity(limit.min(Rule::ORDERED.len()));

        for rule in Rule::ORDERED {
            if insights.len() >= limit {
                break;
            }
            if rule.matches(ctx, &self.thresholds) {
                tracing::debug!(rule = %rule, "Insight rule matched");
                insights.push(rule_insight(rule, ctx.as_of));
            }
        }

        if insights.is_empty() {
            insights.push(fallback_insight(ctx.as_of));
        }

        insights
    }

    /// Score in 0-100 summarizing training load and nutrition adequacy
    pub fn calculate_recovery_score(&self, ctx: &AiContext) -> u8 {
        let n = &self.thresholds.nutrition;
        let w = &self.thresholds.workout;
        let p = &self.thresholds.recovery;
        let mut score = p.base_score;

        let consecutive = consecutive_days(ctx, &self.thresholds);
        if consecutive >= w.consecutive_days_warning {
            score = score.saturating_sub(p.consecutive_warning);
        } else if consecutive >= w.consecutive_days_moderate {
            score = score.saturating_sub(p.consecutive_moderate);
        }

        match &ctx.today_nutrition {
            Some(day) => {
                let protein_target = ctx.user.protein_target;
                if below(day.total_protein, protein_target, n.protein_critical_ratio) {
                    score = score.saturating_sub(p.protein_very_low);
                } else if below(day.total_protein, protein_target, n.protein_low_ratio) {
                    score = score.saturating_sub(p.protein_low);
                }

                if ctx.user.goal == Goal::Muscle
                    && below(day.total_calories, ctx.user.calorie_target, n.calorie_deficit_moderate)
                {
                    score = score.saturating_sub(p.calorie_deficit_muscle_goal);
                }
            }
            None => score = score.saturating_sub(p.no_nutrition_data),
        }

        score.clamp(0, 100) as u8
    }
}

fn consecutive_days(ctx: &AiContext, thresholds: &Thresholds) -> u32 {
    history::consecutive_training_days(
        &ctx.recent_workouts,
        ctx.as_of.date_naive(),
        thresholds.workout.max_consecutive_check_days,
    )
}

fn trained_today(ctx: &AiContext) -> bool {
    ctx.today_workout.as_ref().is_some_and(|w| w.is_completed())
}

// Ratio comparisons are done by scaling the target so they stay exact.
// A non-positive target has no meaningful ratio and fails every comparison.

fn below(value: Decimal, target: Decimal, ratio: Decimal) -> bool {
    target > Decimal::ZERO && value < target * ratio
}

fn above(value: Decimal, target: Decimal, ratio: Decimal) -> bool {
    target > Decimal::ZERO && value > target * ratio
}

fn at_least(value: Decimal, target: Decimal, ratio: Decimal) -> bool {
    target > Decimal::ZERO && value >= target * ratio
}

fn within(value: Decimal, target: Decimal, min: Decimal, max: Decimal) -> bool {
    target > Decimal::ZERO && value >= target * min && value <= target * max
}

fn insight_id(key: &str, as_of: DateTime<Utc>) -> Uuid {
    let name = format!("vitalis:{}:{}", key, as_of.to_rfc3339());
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}

fn rule_insight(rule: Rule, as_of: DateTime<Utc>) -> AiInsight {
    AiInsight {
        id: insight_id(rule.key(), as_of),
        kind: rule.kind(),
        message: rule.message().to_string(),
        category: rule.category(),
        created_at: as_of,
    }
}

fn fallback_insight(as_of: DateTime<Utc>) -> AiInsight {
    AiInsight {
        id: insight_id("general", as_of),
        kind: InsightKind::Tip,
        message: FALLBACK_MESSAGE.to_string(),
        category: InsightCategory::General,
        created_at: as_of,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BodyStatus, DailyNutrition, Sex, UserProfile, WorkoutRecord, WorkoutStatus,
    };
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 20, 0, 0).unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: Some("Alex".to_string()),
            age: 28,
            sex: Sex::Male,
            height_cm: dec!(178),
            weight_kg: dec!(75),
            goal: Goal::Maintenance,
            activity_level: dec!(1.55),
            calorie_target: dec!(2500),
            protein_target: dec!(150),
            carbs_target: dec!(281),
            fats_target: dec!(69),
        }
    }

    fn nutrition(calories: Decimal, protein: Decimal) -> DailyNutrition {
        DailyNutrition {
            date: as_of().date_naive(),
            total_calories: calories,
            total_protein: protein,
            total_carbs: dec!(200),
            total_fats: dec!(60),
        }
    }

    fn workout(days_ago: i64, volume: Decimal) -> WorkoutRecord {
        WorkoutRecord {
            id: format!("w-{}", days_ago),
            name: "Session".to_string(),
            performed_at: as_of() - Duration::days(days_ago) - Duration::hours(2),
            status: WorkoutStatus::Completed,
            total_volume: volume,
            exercises: Vec::new(),
        }
    }

    fn context() -> AiContext {
        AiContext {
            user: profile(),
            today_nutrition: None,
            today_workout: None,
            recent_workouts: Vec::new(),
            weekly_calories: Vec::new(),
            body_status: BodyStatus::default(),
            as_of: as_of(),
        }
    }

    /// Context that trips no rule: trained yesterday, calories on target,
    /// protein in the dead band between low and on-target.
    fn quiet_context() -> AiContext {
        let mut ctx = context();
        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(120)));
        ctx.recent_workouts = vec![workout(1, dec!(5000))];
        ctx
    }

    #[test]
    fn test_rule_metadata() {
        assert_eq!(Rule::ProteinLow.kind(), InsightKind::Warning);
        assert_eq!(Rule::Inactivity.kind(), InsightKind::Tip);
        assert_eq!(Rule::TrainedAndFueled.kind(), InsightKind::Achievement);
        assert_eq!(Rule::Overtraining.category(), InsightCategory::Recovery);
        assert_eq!(Rule::TrainedLowProtein.to_string(), "combined/trained_low_protein");
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let engine = InsightEngine::new();
        let ctx = quiet_context();
        assert!(engine.matching_rules(&ctx).is_empty());

        let insights = engine.generate_insights(&ctx, 3);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].category, InsightCategory::General);
        assert_eq!(insights[0].kind, InsightKind::Tip);
        assert_eq!(insights[0].message, FALLBACK_MESSAGE);

        let single = engine.generate_insight(&ctx);
        assert_eq!(single.category, InsightCategory::General);
    }

    #[test]
    fn test_protein_low_scenario() {
        let engine = InsightEngine::new();
        let mut ctx = quiet_context();
        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(90)));

        let insight = engine.generate_insight(&ctx);
        assert_eq!(insight.kind, InsightKind::Warning);
        assert_eq!(insight.category, InsightCategory::Nutrition);
        assert!(insight.message.starts_with("Protein intake low"));
    }

    #[test]
    fn test_protein_band_boundaries() {
        let engine = InsightEngine::new();
        let cases = [
            (dec!(0.699), true, false),
            (dec!(0.70), false, false),
            (dec!(0.90), false, true),
            (dec!(1.00), false, true),
            (dec!(1.10), false, true),
            (dec!(1.101), false, false),
        ];

        for (ratio, low, on_target) in cases {
            let mut ctx = quiet_context();
            ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(150) * ratio));
            let rules = engine.matching_rules(&ctx);
            assert_eq!(rules.contains(&Rule::ProteinLow), low, "ratio {}", ratio);
            assert_eq!(rules.contains(&Rule::ProteinOnTarget), on_target, "ratio {}", ratio);
        }
    }

    #[test]
    fn test_calorie_rules() {
        let engine = InsightEngine::new();

        let mut ctx = quiet_context();
        ctx.today_nutrition = Some(nutrition(dec!(1249), dec!(120)));
        assert_eq!(engine.matching_rules(&ctx), vec![Rule::CalorieDeficitSevere]);

        ctx.today_nutrition = Some(nutrition(dec!(1250), dec!(120)));
        assert!(engine.matching_rules(&ctx).is_empty());

        ctx.today_nutrition = Some(nutrition(dec!(2876), dec!(120)));
        assert_eq!(engine.matching_rules(&ctx), vec![Rule::CalorieExcess]);

        ctx.today_nutrition = Some(nutrition(dec!(2875), dec!(120)));
        assert!(engine.matching_rules(&ctx).is_empty());
    }

    #[test]
    fn test_zero_target_never_matches() {
        let engine = InsightEngine::new();
        let mut ctx = quiet_context();
        ctx.user.protein_target = Decimal::ZERO;
        ctx.user.calorie_target = Decimal::ZERO;
        ctx.today_nutrition = Some(nutrition(dec!(0), dec!(0)));
        assert!(engine.matching_rules(&ctx).is_empty());
    }

    #[test]
    fn test_inactivity() {
        let engine = InsightEngine::new();

        let mut ctx = quiet_context();
        ctx.recent_workouts = vec![workout(5, dec!(5000))];
        assert!(engine.matching_rules(&ctx).contains(&Rule::Inactivity));

        ctx.recent_workouts = vec![workout(2, dec!(5000))];
        assert!(!engine.matching_rules(&ctx).contains(&Rule::Inactivity));

        ctx.recent_workouts.clear();
        assert!(engine.matching_rules(&ctx).contains(&Rule::Inactivity));
    }

    #[test]
    fn test_progressive_overload() {
        let engine = InsightEngine::new();
        let mut ctx = quiet_context();
        ctx.recent_workouts = vec![workout(1, dec!(9000)), workout(9, dec!(8000))];
        assert!(engine.matching_rules(&ctx).contains(&Rule::ProgressiveOverload));

        ctx.recent_workouts = vec![workout(1, dec!(8400)), workout(9, dec!(8000))];
        assert!(!engine.matching_rules(&ctx).contains(&Rule::ProgressiveOverload));

        // A single workout is never enough history
        ctx.recent_workouts = vec![workout(1, dec!(9000))];
        assert!(!engine.matching_rules(&ctx).contains(&Rule::ProgressiveOverload));
    }

    #[test]
    fn test_above_average_volume_requires_completed_session() {
        let engine = InsightEngine::new();
        let mut ctx = quiet_context();
        ctx.recent_workouts = vec![workout(1, dec!(5000)), workout(3, dec!(5000))];

        let mut today = workout(0, dec!(5600));
        ctx.today_workout = Some(today.clone());
        assert!(engine.matching_rules(&ctx).contains(&Rule::AboveAverageVolume));

        today.status = WorkoutStatus::InProgress;
        ctx.today_workout = Some(today);
        assert!(!engine.matching_rules(&ctx).contains(&Rule::AboveAverageVolume));
    }

    #[test]
    fn test_overtraining_and_score() {
        let engine = InsightEngine::new();
        let mut ctx = context();
        ctx.recent_workouts = (0..6).map(|d| workout(d, dec!(4000))).collect();

        assert!(engine.matching_rules(&ctx).contains(&Rule::Overtraining));
        assert_eq!(engine.calculate_recovery_score(&ctx), 75);
    }

    #[test]
    fn test_combined_rules() {
        let engine = InsightEngine::new();
        let mut ctx = quiet_context();
        ctx.today_workout = Some(workout(0, dec!(100)));
        ctx.recent_workouts = vec![workout(0, dec!(5000)), workout(1, dec!(5000))];

        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(89)));
        let rules = engine.matching_rules(&ctx);
        assert!(rules.contains(&Rule::TrainedLowProtein));
        assert!(!rules.contains(&Rule::TrainedAndFueled));

        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(120)));
        let rules = engine.matching_rules(&ctx);
        assert!(rules.contains(&Rule::TrainedAndFueled));
        assert!(!rules.contains(&Rule::TrainedLowProtein));
    }

    #[test]
    fn test_limit_bounds_accumulation_in_order() {
        let engine = InsightEngine::new();
        let mut ctx = context();
        ctx.today_nutrition = Some(nutrition(dec!(1000), dec!(50)));

        let all = engine.matching_rules(&ctx);
        assert_eq!(
            all,
            vec![Rule::ProteinLow, Rule::CalorieDeficitSevere, Rule::Inactivity]
        );

        let two = engine.generate_insights(&ctx, 2);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].message, Rule::ProteinLow.message());
        assert_eq!(two[1].message, Rule::CalorieDeficitSevere.message());

        let zero = engine.generate_insights(&ctx, 0);
        assert_eq!(zero.len(), 1);
        assert_eq!(zero[0].category, InsightCategory::General);
    }

    #[test]
    fn test_recovery_score_penalties() {
        let engine = InsightEngine::new();

        let ctx = context();
        assert_eq!(engine.calculate_recovery_score(&ctx), 95);

        let mut ctx = context();
        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(74)));
        assert_eq!(engine.calculate_recovery_score(&ctx), 85);

        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(75)));
        assert_eq!(engine.calculate_recovery_score(&ctx), 90);

        ctx.today_nutrition = Some(nutrition(dec!(2500), dec!(105)));
        assert_eq!(engine.calculate_recovery_score(&ctx), 100);

        ctx.user.goal = Goal::Muscle;
        ctx.today_nutrition = Some(nutrition(dec!(1700), dec!(60)));
        assert_eq!(engine.calculate_recovery_score(&ctx), 75);

        ctx.recent_workouts = (0..3).map(|d| workout(d, dec!(4000))).collect();
        assert_eq!(engine.calculate_recovery_score(&ctx), 65);
    }

    #[test]
    fn test_recovery_score_clamps_with_harsh_penalties() {
        let mut thresholds = Thresholds::default();
        thresholds.recovery.no_nutrition_data = 250;
        let engine = InsightEngine::with_thresholds(thresholds);
        assert_eq!(engine.calculate_recovery_score(&context()), 0);
    }

    #[test]
    fn test_recovery_score_survives_extreme_penalties() {
        let mut thresholds = Thresholds::default();
        thresholds.recovery.no_nutrition_data = i32::MIN;
        let engine = InsightEngine::with_thresholds(thresholds.clone());
        assert_eq!(engine.calculate_recovery_score(&context()), 100);

        thresholds.recovery.base_score = i32::MIN;
        thresholds.recovery.no_nutrition_data = i32::MAX;
        let engine = InsightEngine::with_thresholds(thresholds);
        assert_eq!(engine.calculate_recovery_score(&context()), 0);
    }

    #[test]
    fn test_recovery_bands() {
        assert_eq!(RecoveryBand::from_score(100), RecoveryBand::Optimal);
        assert_eq!(RecoveryBand::from_score(80), RecoveryBand::Optimal);
        assert_eq!(RecoveryBand::from_score(79), RecoveryBand::Moderate);
        assert_eq!(RecoveryBand::from_score(50), RecoveryBand::Moderate);
        assert_eq!(RecoveryBand::from_score(49), RecoveryBand::Low);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let engine = InsightEngine::new().with_limit(5);
        let mut ctx = context();
        ctx.today_nutrition = Some(nutrition(dec!(3000), dec!(150)));

        let first = engine.evaluate(&ctx);
        let second = engine.evaluate(&ctx);
        assert_eq!(first, second);
        assert!(first.insights.iter().all(|i| i.created_at == as_of()));
    }
}
