use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Biological sex used by the BMR formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Training goal driving calorie and macro targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Muscle,
    FatLoss,
    Maintenance,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Muscle => write!(f, "Muscle"),
            Goal::FatLoss => write!(f, "Fat Loss"),
            Goal::Maintenance => write!(f, "Maintenance"),
        }
    }
}

/// Biometric and goal snapshot of the user
///
/// Targets are daily values. They are normally derived from the biometrics
/// (see [`crate::targets`]) but the engines only ever read them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,

    /// Age in years
    pub age: u16,

    pub sex: Sex,

    /// Height in centimeters
    pub height_cm: Decimal,

    /// Weight in kilograms
    pub weight_kg: Decimal,

    pub goal: Goal,

    /// Activity multiplier applied to BMR (1.2 sedentary .. 1.9 very active)
    pub activity_level: Decimal,

    /// Daily energy target in kcal
    pub calorie_target: Decimal,

    /// Daily protein target in grams
    pub protein_target: Decimal,

    /// Daily carbohydrate target in grams
    pub carbs_target: Decimal,

    /// Daily fat target in grams
    pub fats_target: Decimal,
}

/// Totals logged for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyNutrition {
    pub date: NaiveDate,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fats: Decimal,
}

/// Lifecycle of a workout session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
    Planned,
    InProgress,
    Completed,
}

/// Tag on a logged set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    #[default]
    Normal,
    Warmup,
    Drop,
    Failure,
}

/// A single logged set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Load in kilograms
    pub weight: Decimal,
    pub reps: u32,
    pub completed: bool,
    #[serde(default, alias = "type")]
    pub set_type: SetType,
}

impl WorkoutSet {
    /// Warmups and unfinished sets never count toward volume or set totals
    pub fn is_working_set(&self) -> bool {
        self.completed && self.set_type != SetType::Warmup
    }

    /// Weight x reps
    pub fn volume(&self) -> Decimal {
        self.weight * Decimal::from(self.reps)
    }
}

/// One exercise performed inside a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Catalog identifier of the exercise
    pub exercise_id: String,

    /// Display name as logged
    pub exercise_name: String,

    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

impl ExerciseEntry {
    pub fn working_sets(&self) -> impl Iterator<Item = &WorkoutSet> {
        self.sets.iter().filter(|s| s.is_working_set())
    }

    /// Volume over completed non-warmup sets
    pub fn volume(&self) -> Decimal {
        self.working_sets().map(WorkoutSet::volume).sum()
    }

    /// Heaviest completed non-warmup set, if any
    pub fn max_weight(&self) -> Option<Decimal> {
        self.working_sets().map(|s| s.weight).max()
    }
}

/// A training session, completed or in progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub name: String,

    /// When the session took place
    pub performed_at: DateTime<Utc>,

    pub status: WorkoutStatus,

    /// Sum of weight x reps over completed, non-warmup sets
    #[serde(default)]
    pub total_volume: Decimal,

    #[serde(default)]
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutRecord {
    pub fn is_completed(&self) -> bool {
        self.status == WorkoutStatus::Completed
    }

    /// Calendar day of the session (UTC)
    pub fn date(&self) -> NaiveDate {
        self.performed_at.date_naive()
    }

    /// Recompute volume from the logged sets
    pub fn compute_volume(&self) -> Decimal {
        self.exercises.iter().map(ExerciseEntry::volume).sum()
    }

    /// Overwrite `total_volume` with the value computed from the sets
    pub fn refresh_volume(&mut self) {
        self.total_volume = self.compute_volume();
    }

    /// Number of completed non-warmup sets across all exercises
    pub fn completed_set_count(&self) -> usize {
        self.exercises.iter().map(|e| e.working_sets().count()).sum()
    }
}

/// Fine-grained muscle tag carried by catalog entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    UpperBack,
    MiddleBack,
    LowerBack,
    Shoulders,
    Biceps,
    Triceps,
    Quads,
    Hamstrings,
    Glutes,
    Calves,
    Core,
    Cardio,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 13] = [
        MuscleGroup::Chest,
        MuscleGroup::UpperBack,
        MuscleGroup::MiddleBack,
        MuscleGroup::LowerBack,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Triceps,
        MuscleGroup::Quads,
        MuscleGroup::Hamstrings,
        MuscleGroup::Glutes,
        MuscleGroup::Calves,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
    ];

    /// Coarse body region this muscle group is visualized under
    pub fn region(&self) -> BodyRegion {
        match self {
            MuscleGroup::Chest
            | MuscleGroup::UpperBack
            | MuscleGroup::MiddleBack
            | MuscleGroup::Shoulders
            | MuscleGroup::Biceps
            | MuscleGroup::Triceps => BodyRegion::UpperBody,
            MuscleGroup::Core | MuscleGroup::LowerBack => BodyRegion::Core,
            MuscleGroup::Quads
            | MuscleGroup::Hamstrings
            | MuscleGroup::Glutes
            | MuscleGroup::Calves => BodyRegion::LowerBody,
            MuscleGroup::Cardio => BodyRegion::Cardio,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::UpperBack => "upper_back",
            MuscleGroup::MiddleBack => "middle_back",
            MuscleGroup::LowerBack => "lower_back",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Core => "core",
            MuscleGroup::Cardio => "cardio",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MuscleGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        MuscleGroup::ALL
            .into_iter()
            .find(|g| g.as_str() == normalized)
            .ok_or_else(|| format!("Invalid muscle group: {}", s))
    }
}

/// Equipment needed for a catalog exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Cable,
    Machine,
    Bodyweight,
    Other,
}

/// Maps an exercise identity to its muscle group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseCatalogEntry {
    pub id: String,
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Equipment,
}

/// The four regions shown on the body visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    UpperBody,
    Core,
    LowerBody,
    Cardio,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 4] = [
        BodyRegion::UpperBody,
        BodyRegion::Core,
        BodyRegion::LowerBody,
        BodyRegion::Cardio,
    ];
}

impl fmt::Display for BodyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyRegion::UpperBody => write!(f, "Upper Body"),
            BodyRegion::Core => write!(f, "Core"),
            BodyRegion::LowerBody => write!(f, "Lower Body"),
            BodyRegion::Cardio => write!(f, "Cardio"),
        }
    }
}

/// Fatigue state of a body region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MuscleStatus {
    #[default]
    Fresh,
    Fatigued,
    Recovering,
    /// Region selected as today's focus
    Target,
}

impl fmt::Display for MuscleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MuscleStatus::Fresh => write!(f, "Fresh"),
            MuscleStatus::Fatigued => write!(f, "Fatigued"),
            MuscleStatus::Recovering => write!(f, "Recovering"),
            MuscleStatus::Target => write!(f, "Target"),
        }
    }
}

/// Per-region fatigue map consumed by the body visualization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyStatus {
    pub upper_body: MuscleStatus,
    pub core: MuscleStatus,
    pub lower_body: MuscleStatus,
    pub cardio: MuscleStatus,
}

impl BodyStatus {
    pub fn get(&self, region: BodyRegion) -> MuscleStatus {
        match region {
            BodyRegion::UpperBody => self.upper_body,
            BodyRegion::Core => self.core,
            BodyRegion::LowerBody => self.lower_body,
            BodyRegion::Cardio => self.cardio,
        }
    }

    pub fn set(&mut self, region: BodyRegion, status: MuscleStatus) {
        match region {
            BodyRegion::UpperBody => self.upper_body = status,
            BodyRegion::Core => self.core = status,
            BodyRegion::LowerBody => self.lower_body = status,
            BodyRegion::Cardio => self.cardio = status,
        }
    }

    pub fn is_all_fresh(&self) -> bool {
        BodyRegion::ALL
            .iter()
            .all(|r| self.get(*r) == MuscleStatus::Fresh)
    }
}

/// Insight severity/flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Tip,
    Warning,
    Achievement,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightKind::Tip => write!(f, "Tip"),
            InsightKind::Warning => write!(f, "Warning"),
            InsightKind::Achievement => write!(f, "Achievement"),
        }
    }
}

/// Area of the rule that produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Nutrition,
    Workout,
    Recovery,
    Combined,
    General,
}

impl InsightCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightCategory::Nutrition => "nutrition",
            InsightCategory::Workout => "workout",
            InsightCategory::Recovery => "recovery",
            InsightCategory::Combined => "combined",
            InsightCategory::General => "general",
        }
    }
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insight generated for display; never persisted by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsight {
    /// Stable for a given rule and evaluation instant
    pub id: Uuid,
    pub kind: InsightKind,
    pub message: String,
    pub category: InsightCategory,
    pub created_at: DateTime<Utc>,
}

/// Read-only snapshot the insight engine evaluates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiContext {
    pub user: UserProfile,

    /// Today's totals; `None` when nothing has been logged yet
    #[serde(default)]
    pub today_nutrition: Option<DailyNutrition>,

    #[serde(default)]
    pub today_workout: Option<WorkoutRecord>,

    /// Completed workouts, newest first
    #[serde(default)]
    pub recent_workouts: Vec<WorkoutRecord>,

    /// Calories per day for the trailing week, oldest first
    #[serde(default)]
    pub weekly_calories: Vec<Decimal>,

    #[serde(default)]
    pub body_status: BodyStatus,

    /// Instant the evaluation is performed for
    pub as_of: DateTime<Utc>,
}

impl AiContext {
    /// Mean of the weekly calorie series, `None` when empty
    pub fn weekly_average_calories(&self) -> Option<Decimal> {
        if self.weekly_calories.is_empty() {
            return None;
        }
        let total: Decimal = self.weekly_calories.iter().sum();
        Some(total / Decimal::from(self.weekly_calories.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn set(weight: Decimal, reps: u32, completed: bool, set_type: SetType) -> WorkoutSet {
        WorkoutSet { weight, reps, completed, set_type }
    }

    #[test]
    fn test_volume_excludes_warmups_and_incomplete_sets() {
        let mut workout = WorkoutRecord {
            id: "w1".to_string(),
            name: "Push Day".to_string(),
            performed_at: Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
            status: WorkoutStatus::Completed,
            total_volume: Decimal::ZERO,
            exercises: vec![ExerciseEntry {
                exercise_id: "ex-1".to_string(),
                exercise_name: "Flat Bench Press".to_string(),
                sets: vec![
                    set(dec!(40), 10, true, SetType::Warmup),
                    set(dec!(80), 8, true, SetType::Normal),
                    set(dec!(80), 6, true, SetType::Failure),
                    set(dec!(60), 10, true, SetType::Drop),
                    set(dec!(90), 5, false, SetType::Normal),
                ],
            }],
        };

        workout.refresh_volume();
        assert_eq!(workout.total_volume, dec!(1720));
        assert_eq!(workout.completed_set_count(), 3);
        assert_eq!(workout.exercises[0].max_weight(), Some(dec!(80)));
    }

    #[test]
    fn test_muscle_group_regions() {
        assert_eq!(MuscleGroup::Chest.region(), BodyRegion::UpperBody);
        assert_eq!(MuscleGroup::LowerBack.region(), BodyRegion::Core);
        assert_eq!(MuscleGroup::Calves.region(), BodyRegion::LowerBody);
        assert_eq!(MuscleGroup::Cardio.region(), BodyRegion::Cardio);

        let upper = MuscleGroup::ALL
            .iter()
            .filter(|g| g.region() == BodyRegion::UpperBody)
            .count();
        assert_eq!(upper, 6);
    }

    #[test]
    fn test_muscle_group_parsing() {
        assert_eq!("upper_back".parse::<MuscleGroup>().unwrap(), MuscleGroup::UpperBack);
        assert_eq!("Middle Back".parse::<MuscleGroup>().unwrap(), MuscleGroup::MiddleBack);
        assert!("forearms".parse::<MuscleGroup>().is_err());
    }

    #[test]
    fn test_body_status_defaults_and_access() {
        let mut status = BodyStatus::default();
        assert!(status.is_all_fresh());

        status.set(BodyRegion::Core, MuscleStatus::Recovering);
        assert_eq!(status.get(BodyRegion::Core), MuscleStatus::Recovering);
        assert!(!status.is_all_fresh());
    }

    #[test]
    fn test_set_type_accepts_type_alias() {
        let json = r#"{"weight": "100", "reps": 5, "completed": true, "type": "warmup"}"#;
        let parsed: WorkoutSet = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.set_type, SetType::Warmup);
        assert!(!parsed.is_working_set());

        let json = r#"{"weight": "100", "reps": 5, "completed": true}"#;
        let parsed: WorkoutSet = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.set_type, SetType::Normal);
    }
}
