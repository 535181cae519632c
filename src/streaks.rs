//! Consistency grid for the dashboard streak view

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of days shown by default
pub const DEFAULT_GRID_DAYS: u32 = 14;

/// One cell of the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDay {
    pub date: NaiveDate,
    pub has_workout: bool,
    pub has_nutrition: bool,
    /// 0 nothing, 1 nutrition only, 2 workout only, 3 both
    pub activity_level: u8,
}

impl StreakDay {
    fn new(date: NaiveDate, has_workout: bool, has_nutrition: bool) -> Self {
        let activity_level = match (has_workout, has_nutrition) {
            (true, true) => 3,
            (true, false) => 2,
            (false, true) => 1,
            (false, false) => 0,
        };
        Self {
            date,
            has_workout,
            has_nutrition,
            activity_level,
        }
    }
}

/// The last `days` days ending at `today`, oldest first
///
/// Days before the earliest representable date are left out.
pub fn consistency_grid(
    workout_days: &[NaiveDate],
    nutrition_days: &[NaiveDate],
    today: NaiveDate,
    days: u32,
) -> Vec<StreakDay> {
    let workouts: HashSet<&NaiveDate> = workout_days.iter().collect();
    let nutrition: HashSet<&NaiveDate> = nutrition_days.iter().collect();

    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| StreakDay::new(date, workouts.contains(&date), nutrition.contains(&date)))
        .collect()
}

/// Days in a row, ending today, with at least one logged activity
pub fn current_streak(grid: &[StreakDay]) -> usize {
    grid.iter()
        .rev()
        .take_while(|day| day.activity_level > 0)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn test_grid_levels_and_order() {
        let grid = consistency_grid(&[day(15), day(13)], &[day(15), day(14)], day(15), 4);

        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0].date, day(12));
        assert_eq!(grid[3].date, day(15));

        let levels: Vec<u8> = grid.iter().map(|d| d.activity_level).collect();
        assert_eq!(levels, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_current_streak() {
        let grid = consistency_grid(&[day(15), day(13)], &[day(14)], day(15), DEFAULT_GRID_DAYS);
        assert_eq!(grid.len(), 14);
        assert_eq!(current_streak(&grid), 3);

        let grid = consistency_grid(&[], &[], day(15), DEFAULT_GRID_DAYS);
        assert_eq!(current_streak(&grid), 0);
    }

    #[test]
    fn test_grid_stops_at_earliest_date() {
        let grid = consistency_grid(&[NaiveDate::MIN], &[], NaiveDate::MIN, 3);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].activity_level, 2);
    }
}
