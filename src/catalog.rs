//! Exercise catalog mapping exercise identities to muscle groups
//!
//! Lookups go by catalog id first and fall back to a case-insensitive match on
//! the exercise name, so sessions logged against renamed or imported ids still
//! resolve. Entries that resolve nowhere are simply absent: the fatigue model
//! treats them as having no effect.

use std::collections::HashMap;

use crate::error::{InputError, Result};
use crate::models::{Equipment, ExerciseCatalogEntry, ExerciseEntry, MuscleGroup};

/// Indexed exercise catalog
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    entries: Vec<ExerciseCatalogEntry>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ExerciseCatalog {
    /// Build a catalog from caller-supplied entries
    ///
    /// When two entries share an id or name the first one wins.
    pub fn new(entries: Vec<ExerciseCatalogEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut by_name = HashMap::with_capacity(entries.len());

        for entry in entries {
            if by_id.contains_key(&entry.id) {
                tracing::warn!(id = %entry.id, "Duplicate exercise id in catalog, keeping first");
                continue;
            }
            let idx = kept.len();
            by_id.insert(entry.id.clone(), idx);
            by_name.entry(normalize(&entry.name)).or_insert(idx);
            kept.push(entry);
        }

        Self {
            entries: kept,
            by_id,
            by_name,
        }
    }

    /// The default exercise library shipped with the application
    pub fn builtin() -> Self {
        let entries = BUILTIN_EXERCISES
            .iter()
            .map(|(id, name, muscle_group, equipment)| ExerciseCatalogEntry {
                id: (*id).to_string(),
                name: (*name).to_string(),
                muscle_group: *muscle_group,
                equipment: *equipment,
            })
            .collect();
        Self::new(entries)
    }

    /// Parse a JSON array of catalog entries
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<ExerciseCatalogEntry> =
            serde_json::from_str(json).map_err(|e| InputError::Malformed {
                document: "catalog".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self::new(entries))
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseCatalogEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ExerciseCatalogEntry> {
        self.by_name.get(&normalize(name)).map(|&idx| &self.entries[idx])
    }

    /// Resolve a logged exercise to its catalog entry
    pub fn resolve(&self, exercise: &ExerciseEntry) -> Option<&ExerciseCatalogEntry> {
        self.get(&exercise.exercise_id)
            .or_else(|| self.find_by_name(&exercise.exercise_name))
    }

    /// Muscle group of a logged exercise, if it resolves
    pub fn muscle_group_of(&self, exercise: &ExerciseEntry) -> Option<MuscleGroup> {
        self.resolve(exercise).map(|e| e.muscle_group)
    }

    pub fn by_muscle_group(&self, group: MuscleGroup) -> impl Iterator<Item = &ExerciseCatalogEntry> {
        self.entries.iter().filter(move |e| e.muscle_group == group)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExerciseCatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

const BUILTIN_EXERCISES: &[(&str, &str, MuscleGroup, Equipment)] = &[
    ("ex-1", "Flat Bench Press", MuscleGroup::Chest, Equipment::Barbell),
    ("ex-2", "Incline Bench Press", MuscleGroup::Chest, Equipment::Barbell),
    ("ex-3", "Decline Bench Press", MuscleGroup::Chest, Equipment::Barbell),
    ("ex-4", "Dumbbell Chest Press", MuscleGroup::Chest, Equipment::Dumbbell),
    ("ex-5", "Incline Dumbbell Press", MuscleGroup::Chest, Equipment::Dumbbell),
    ("ex-6", "Dumbbell Flyes", MuscleGroup::Chest, Equipment::Dumbbell),
    ("ex-7", "Cable Crossover", MuscleGroup::Chest, Equipment::Cable),
    ("ex-8", "Pec Deck Machine", MuscleGroup::Chest, Equipment::Machine),
    ("ex-9", "Push-ups", MuscleGroup::Chest, Equipment::Bodyweight),
    ("ex-10", "Chest Dips", MuscleGroup::Chest, Equipment::Bodyweight),
    ("ex-11", "Face Pulls", MuscleGroup::UpperBack, Equipment::Cable),
    ("ex-12", "Rear Delt Flyes", MuscleGroup::UpperBack, Equipment::Dumbbell),
    ("ex-13", "Barbell Shrugs", MuscleGroup::UpperBack, Equipment::Barbell),
    ("ex-14", "Dumbbell Shrugs", MuscleGroup::UpperBack, Equipment::Dumbbell),
    ("ex-15", "Cable Shrugs", MuscleGroup::UpperBack, Equipment::Cable),
    ("ex-16", "Reverse Pec Deck", MuscleGroup::UpperBack, Equipment::Machine),
    ("ex-17", "High Rope Face Pull", MuscleGroup::UpperBack, Equipment::Cable),
    ("ex-18", "Band Pull-Aparts", MuscleGroup::UpperBack, Equipment::Other),
    ("ex-19", "Prone Y-Raises", MuscleGroup::UpperBack, Equipment::Dumbbell),
    ("ex-20", "Lat Pulldown", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-21", "Wide Grip Lat Pulldown", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-22", "Close Grip Lat Pulldown", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-23", "Seated Cable Row", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-24", "Single-Arm Cable Row", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-25", "T-Bar Row", MuscleGroup::MiddleBack, Equipment::Barbell),
    ("ex-26", "Bent Over Barbell Row", MuscleGroup::MiddleBack, Equipment::Barbell),
    ("ex-27", "Dumbbell Row", MuscleGroup::MiddleBack, Equipment::Dumbbell),
    ("ex-28", "Chest Supported Row", MuscleGroup::MiddleBack, Equipment::Dumbbell),
    ("ex-29", "Pull-ups", MuscleGroup::MiddleBack, Equipment::Bodyweight),
    ("ex-30", "Chin-ups", MuscleGroup::MiddleBack, Equipment::Bodyweight),
    ("ex-31", "Straight Arm Pulldown", MuscleGroup::MiddleBack, Equipment::Cable),
    ("ex-32", "Conventional Deadlift", MuscleGroup::LowerBack, Equipment::Barbell),
    ("ex-33", "Sumo Deadlift", MuscleGroup::LowerBack, Equipment::Barbell),
    ("ex-34", "Deficit Deadlift", MuscleGroup::LowerBack, Equipment::Barbell),
    ("ex-35", "Trap Bar Deadlift", MuscleGroup::LowerBack, Equipment::Barbell),
    ("ex-36", "Good Mornings", MuscleGroup::LowerBack, Equipment::Barbell),
    ("ex-37", "Back Extensions", MuscleGroup::LowerBack, Equipment::Bodyweight),
    ("ex-38", "Hyperextensions", MuscleGroup::LowerBack, Equipment::Machine),
    ("ex-39", "Reverse Hyperextensions", MuscleGroup::LowerBack, Equipment::Machine),
    ("ex-40", "Overhead Press", MuscleGroup::Shoulders, Equipment::Barbell),
    ("ex-41", "Seated Dumbbell Press", MuscleGroup::Shoulders, Equipment::Dumbbell),
    ("ex-42", "Arnold Press", MuscleGroup::Shoulders, Equipment::Dumbbell),
    ("ex-43", "Lateral Raises", MuscleGroup::Shoulders, Equipment::Dumbbell),
    ("ex-44", "Cable Lateral Raises", MuscleGroup::Shoulders, Equipment::Cable),
    ("ex-45", "Front Raises", MuscleGroup::Shoulders, Equipment::Dumbbell),
    ("ex-46", "Upright Row", MuscleGroup::Shoulders, Equipment::Barbell),
    ("ex-47", "Machine Shoulder Press", MuscleGroup::Shoulders, Equipment::Machine),
    ("ex-48", "Behind Neck Press", MuscleGroup::Shoulders, Equipment::Barbell),
    ("ex-49", "Lu Raises", MuscleGroup::Shoulders, Equipment::Dumbbell),
    ("ex-50", "Landmine Press", MuscleGroup::Shoulders, Equipment::Barbell),
    ("ex-51", "Barbell Curl", MuscleGroup::Biceps, Equipment::Barbell),
    ("ex-52", "EZ Bar Curl", MuscleGroup::Biceps, Equipment::Barbell),
    ("ex-53", "Preacher Curl", MuscleGroup::Biceps, Equipment::Barbell),
    ("ex-54", "Dumbbell Curl", MuscleGroup::Biceps, Equipment::Dumbbell),
    ("ex-55", "Hammer Curl", MuscleGroup::Biceps, Equipment::Dumbbell),
    ("ex-56", "Incline Dumbbell Curl", MuscleGroup::Biceps, Equipment::Dumbbell),
    ("ex-57", "Cable Curl", MuscleGroup::Biceps, Equipment::Cable),
    ("ex-58", "Concentration Curl", MuscleGroup::Biceps, Equipment::Dumbbell),
    ("ex-59", "Spider Curl", MuscleGroup::Biceps, Equipment::Dumbbell),
    ("ex-60", "Tricep Pushdown", MuscleGroup::Triceps, Equipment::Cable),
    ("ex-61", "Rope Pushdown", MuscleGroup::Triceps, Equipment::Cable),
    ("ex-62", "Overhead Tricep Extension", MuscleGroup::Triceps, Equipment::Cable),
    ("ex-63", "Skull Crushers", MuscleGroup::Triceps, Equipment::Barbell),
    ("ex-64", "Close Grip Bench Press", MuscleGroup::Triceps, Equipment::Barbell),
    ("ex-65", "Tricep Dips", MuscleGroup::Triceps, Equipment::Bodyweight),
    ("ex-66", "Diamond Push-ups", MuscleGroup::Triceps, Equipment::Bodyweight),
    ("ex-67", "Cable Kickbacks", MuscleGroup::Triceps, Equipment::Cable),
    ("ex-68", "Single Arm Pushdown", MuscleGroup::Triceps, Equipment::Cable),
    ("ex-69", "Back Squat", MuscleGroup::Quads, Equipment::Barbell),
    ("ex-70", "Front Squat", MuscleGroup::Quads, Equipment::Barbell),
    ("ex-71", "Hack Squat", MuscleGroup::Quads, Equipment::Machine),
    ("ex-72", "Leg Press", MuscleGroup::Quads, Equipment::Machine),
    ("ex-73", "Leg Extension", MuscleGroup::Quads, Equipment::Machine),
    ("ex-74", "Goblet Squat", MuscleGroup::Quads, Equipment::Dumbbell),
    ("ex-75", "Bulgarian Split Squat", MuscleGroup::Quads, Equipment::Dumbbell),
    ("ex-76", "Walking Lunges", MuscleGroup::Quads, Equipment::Dumbbell),
    ("ex-77", "Sissy Squat", MuscleGroup::Quads, Equipment::Bodyweight),
    ("ex-78", "Lying Leg Curl", MuscleGroup::Hamstrings, Equipment::Machine),
    ("ex-79", "Seated Leg Curl", MuscleGroup::Hamstrings, Equipment::Machine),
    ("ex-80", "Nordic Curl", MuscleGroup::Hamstrings, Equipment::Bodyweight),
    ("ex-81", "Romanian Deadlift", MuscleGroup::Hamstrings, Equipment::Barbell),
    ("ex-82", "Stiff Leg Deadlift", MuscleGroup::Hamstrings, Equipment::Barbell),
    ("ex-83", "Single Leg Romanian Deadlift", MuscleGroup::Hamstrings, Equipment::Dumbbell),
    ("ex-84", "Glute Ham Raise", MuscleGroup::Hamstrings, Equipment::Machine),
    ("ex-85", "Hip Thrust", MuscleGroup::Glutes, Equipment::Barbell),
    ("ex-86", "Barbell Hip Thrust", MuscleGroup::Glutes, Equipment::Barbell),
    ("ex-87", "Single Leg Hip Thrust", MuscleGroup::Glutes, Equipment::Bodyweight),
    ("ex-88", "Glute Kickback Machine", MuscleGroup::Glutes, Equipment::Machine),
    ("ex-89", "Cable Glute Kickback", MuscleGroup::Glutes, Equipment::Cable),
    ("ex-90", "Glute Bridge", MuscleGroup::Glutes, Equipment::Bodyweight),
    ("ex-91", "Sumo Squat", MuscleGroup::Glutes, Equipment::Dumbbell),
    ("ex-92", "Step-ups", MuscleGroup::Glutes, Equipment::Dumbbell),
    ("ex-93", "Standing Calf Raise", MuscleGroup::Calves, Equipment::Machine),
    ("ex-94", "Seated Calf Raise", MuscleGroup::Calves, Equipment::Machine),
    ("ex-95", "Donkey Calf Raise", MuscleGroup::Calves, Equipment::Machine),
    ("ex-96", "Single Leg Calf Raise", MuscleGroup::Calves, Equipment::Bodyweight),
    ("ex-97", "Leg Press Calf Raise", MuscleGroup::Calves, Equipment::Machine),
    ("ex-98", "Smith Machine Calf Raise", MuscleGroup::Calves, Equipment::Machine),
    ("ex-99", "Plank", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-100", "Side Plank", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-101", "Hanging Leg Raise", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-102", "Cable Crunch", MuscleGroup::Core, Equipment::Cable),
    ("ex-103", "Ab Wheel Rollout", MuscleGroup::Core, Equipment::Other),
    ("ex-104", "Bicycle Crunch", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-105", "Dead Bug", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-106", "Pallof Press", MuscleGroup::Core, Equipment::Cable),
    ("ex-107", "Woodchoppers", MuscleGroup::Core, Equipment::Cable),
    ("ex-108", "Decline Sit-ups", MuscleGroup::Core, Equipment::Bodyweight),
    ("ex-109", "Treadmill Running", MuscleGroup::Cardio, Equipment::Machine),
    ("ex-110", "Stationary Bike", MuscleGroup::Cardio, Equipment::Machine),
    ("ex-111", "Elliptical", MuscleGroup::Cardio, Equipment::Machine),
    ("ex-112", "Rowing Machine", MuscleGroup::Cardio, Equipment::Machine),
    ("ex-113", "Jump Rope", MuscleGroup::Cardio, Equipment::Other),
    ("ex-114", "Stair Climber", MuscleGroup::Cardio, Equipment::Machine),
];
