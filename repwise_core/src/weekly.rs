//! Weekly activity series: average intensity per weekday.
//!
//! Workouts are bucketed by the local day-of-week of their creation time
//! using the fixed 0=Sunday indexing of the platform date APIs, then the
//! series is rotated so the presentation order is Monday first.

use crate::classify::rate_mean;
use crate::{Intensity, WorkoutRecord};
use chrono::{Datelike, Local};

pub const DAYS_PER_WEEK: usize = 7;

/// Labels matching the Monday-first presentation order.
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] =
    ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One week of derived activity.
#[derive(Clone, Debug, PartialEq)]
pub struct WeeklyActivity {
    /// Average intensity score per day, Monday first, one decimal place.
    /// Days without workouts are 0.
    pub daily_scores: [f64; DAYS_PER_WEEK],
    /// Number of days with at least one workout.
    pub days_active: usize,
    /// Rating over the active days, or None for an empty week.
    pub rating: Option<Intensity>,
}

/// Build the weekly series from workouts spanning one calendar week
/// (Sunday through Saturday, local time). The caller supplies the
/// already-filtered snapshot.
pub fn weekly_activity(workouts: &[WorkoutRecord]) -> WeeklyActivity {
    // Collect scores into Sunday-indexed buckets
    let mut buckets: [Vec<f64>; DAYS_PER_WEEK] = std::array::from_fn(|_| Vec::new());
    for workout in workouts {
        let day = workout
            .created_at
            .with_timezone(&Local)
            .weekday()
            .num_days_from_sunday() as usize;
        buckets[day].push(workout.intensity.score());
    }

    let mut sunday_first = [0.0_f64; DAYS_PER_WEEK];
    for (day, scores) in buckets.iter().enumerate() {
        if !scores.is_empty() {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            sunday_first[day] = round_one_decimal(mean);
        }
    }

    let daily_scores = rotate_to_monday_first(sunday_first);
    let days_active = daily_scores.iter().filter(|&&score| score > 0.0).count();
    let rating = if days_active == 0 {
        None
    } else {
        let active_mean = daily_scores.iter().sum::<f64>() / days_active as f64;
        Some(rate_mean(active_mean))
    };

    WeeklyActivity {
        daily_scores,
        days_active,
        rating,
    }
}

/// Shift a Sunday-first series left by one so index 0 is Monday and
/// Sunday's value moves to the end.
pub fn rotate_to_monday_first(series: [f64; DAYS_PER_WEEK]) -> [f64; DAYS_PER_WEEK] {
    let mut rotated = series;
    rotated.rotate_left(1);
    rotated
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
