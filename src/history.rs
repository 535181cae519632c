//! Training-history aggregates shared by the insight rules and the recovery score

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::models::WorkoutRecord;

/// Volume split into the trailing week and the week before it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyVolume {
    pub this_week: Decimal,
    pub last_week: Decimal,
}

/// True when the workout happened no more than `days` days before `now`
///
/// Workouts dated after `now` count as inside every window.
pub fn is_within_days(workout: &WorkoutRecord, now: DateTime<Utc>, days: i64) -> bool {
    now - workout.performed_at <= saturating_days(days)
}

/// `Duration::days` clamped to the representable range
pub fn saturating_days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(if days < 0 { Duration::MIN } else { Duration::MAX })
}

/// `Duration::hours` clamped to the representable range
pub fn saturating_hours(hours: i64) -> Duration {
    Duration::try_hours(hours).unwrap_or(if hours < 0 { Duration::MIN } else { Duration::MAX })
}

/// Whole days since the most recent workout, `None` when there is no history
pub fn days_since_last_workout(workouts: &[WorkoutRecord], now: DateTime<Utc>) -> Option<i64> {
    workouts
        .iter()
        .map(|w| w.performed_at)
        .max()
        .map(|latest| (now - latest).num_days())
}

/// Mean session volume, zero for an empty history
pub fn average_volume(workouts: &[WorkoutRecord]) -> Decimal {
    if workouts.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = workouts.iter().map(|w| w.total_volume).sum();
    total / Decimal::from(workouts.len())
}

/// Volume of the last `recent_days` against the `extended_days` window before it
pub fn weekly_volume(
    workouts: &[WorkoutRecord],
    now: DateTime<Utc>,
    recent_days: i64,
    extended_days: i64,
) -> WeeklyVolume {
    let mut volume = WeeklyVolume {
        this_week: Decimal::ZERO,
        last_week: Decimal::ZERO,
    };

    for workout in workouts {
        if is_within_days(workout, now, recent_days) {
            volume.this_week += workout.total_volume;
        } else if is_within_days(workout, now, extended_days) {
            volume.last_week += workout.total_volume;
        }
    }

    volume
}

/// Consecutive calendar days with a workout, counting back from `today`
///
/// The scan stops at the first day without a workout or after `max_days` days.
pub fn consecutive_training_days(workouts: &[WorkoutRecord], today: NaiveDate, max_days: u32) -> u32 {
    let training_days: HashSet<NaiveDate> = workouts.iter().map(WorkoutRecord::date).collect();

    let mut consecutive = 0;
    for offset in 0..max_days {
        let Some(day) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            break;
        };
        if !training_days.contains(&day) {
            break;
        }
        consecutive += 1;
    }
    consecutive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutStatus;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn workout(hours_ago: i64, volume: Decimal) -> WorkoutRecord {
        WorkoutRecord {
            id: format!("w-{}", hours_ago),
            name: "Session".to_string(),
            performed_at: now() - Duration::hours(hours_ago),
            status: WorkoutStatus::Completed,
            total_volume: volume,
            exercises: Vec::new(),
        }
    }

    #[test]
    fn test_days_since_last_workout() {
        assert_eq!(days_since_last_workout(&[], now()), None);

        let history = vec![workout(5 * 24 + 3, dec!(100)), workout(9 * 24, dec!(100))];
        assert_eq!(days_since_last_workout(&history, now()), Some(5));
    }

    #[test]
    fn test_days_since_uses_latest_regardless_of_order() {
        let history = vec![workout(9 * 24, dec!(100)), workout(30, dec!(100))];
        assert_eq!(days_since_last_workout(&history, now()), Some(1));
    }

    #[test]
    fn test_average_volume() {
        assert_eq!(average_volume(&[]), Decimal::ZERO);
        let history = vec![workout(24, dec!(1000)), workout(48, dec!(2000))];
        assert_eq!(average_volume(&history), dec!(1500));
    }

    #[test]
    fn test_weekly_volume_windows() {
        let history = vec![
            workout(24, dec!(5000)),
            workout(6 * 24, dec!(4000)),
            workout(7 * 24, dec!(100)),
            workout(10 * 24, dec!(8000)),
            workout(14 * 24, dec!(50)),
            workout(20 * 24, dec!(9999)),
        ];
        let volume = weekly_volume(&history, now(), 7, 14);
        assert_eq!(volume.this_week, dec!(9100));
        assert_eq!(volume.last_week, dec!(8050));
    }

    #[test]
    fn test_windows_saturate_instead_of_panicking() {
        let history = vec![workout(24, dec!(5000)), workout(400 * 24, dec!(8000))];
        let volume = weekly_volume(&history, now(), 7, i64::MAX);
        assert_eq!(volume.this_week, dec!(5000));
        assert_eq!(volume.last_week, dec!(8000));

        assert_eq!(saturating_hours(i64::MIN), Duration::MIN);
        assert_eq!(saturating_days(3), Duration::days(3));
    }

    #[test]
    fn test_consecutive_days_stops_at_gap() {
        let today = now().date_naive();
        let history = vec![
            workout(0, dec!(1)),
            workout(24, dec!(1)),
            workout(48, dec!(1)),
            workout(4 * 24, dec!(1)),
        ];
        assert_eq!(consecutive_training_days(&history, today, 14), 3);
    }

    #[test]
    fn test_consecutive_days_requires_today() {
        let today = now().date_naive();
        let history = vec![workout(24, dec!(1)), workout(48, dec!(1))];
        assert_eq!(consecutive_training_days(&history, today, 14), 0);
    }

    #[test]
    fn test_consecutive_days_capped() {
        let today = now().date_naive();
        let history: Vec<_> = (0..20).map(|d| workout(d * 24, dec!(1))).collect();
        assert_eq!(consecutive_training_days(&history, today, 14), 14);
    }
}
