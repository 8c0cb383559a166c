//! Summary statistics over workout history.

use crate::classify::rate_mean;
use crate::{ExerciseSet, Intensity, WorkoutRecord};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;

/// Aggregate statistics for an arbitrary workout list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryStats {
    /// Distinct local calendar days with at least one workout.
    pub days_active: usize,
    /// Rating of the mean score across all workouts, None when empty.
    pub avg_intensity: Option<Intensity>,
}

pub fn history_stats(workouts: &[WorkoutRecord]) -> HistoryStats {
    if workouts.is_empty() {
        return HistoryStats {
            days_active: 0,
            avg_intensity: None,
        };
    }

    let total: f64 = workouts.iter().map(|w| w.intensity.score()).sum();
    let days: HashSet<NaiveDate> = workouts
        .iter()
        .map(|w| w.created_at.with_timezone(&Local).date_naive())
        .collect();

    HistoryStats {
        days_active: days.len(),
        avg_intensity: Some(rate_mean(total / workouts.len() as f64)),
    }
}

/// One point on the recent-performance chart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerformancePoint {
    pub date: NaiveDate,
    pub score: f64,
    pub intensity: Intensity,
}

/// Chart points for the most recent `limit` workouts.
///
/// `workouts` is expected newest first (as the history loader returns);
/// the points come back oldest first for left-to-right plotting.
pub fn performance_series(workouts: &[WorkoutRecord], limit: usize) -> Vec<PerformancePoint> {
    let mut points: Vec<PerformancePoint> = workouts
        .iter()
        .take(limit)
        .map(|w| PerformancePoint {
            date: w.created_at.with_timezone(&Local).date_naive(),
            score: w.intensity.score(),
            intensity: w.intensity,
        })
        .collect();
    points.reverse();
    points
}

/// A workout's sets for one exercise, with the volume total.
#[derive(Clone, Debug)]
pub struct ExerciseSummary {
    pub exercise_name: String,
    pub sets: Vec<ExerciseSet>,
    pub total_volume: f64,
}

/// Group flat set rows by exercise, preserving first-appearance order.
pub fn group_sets(sets: &[ExerciseSet]) -> Vec<ExerciseSummary> {
    let mut groups: Vec<ExerciseSummary> = Vec::new();

    for set in sets {
        match groups
            .iter_mut()
            .find(|group| group.exercise_name == set.exercise_name)
        {
            Some(group) => {
                group.total_volume += set.volume();
                group.sets.push(set.clone());
            }
            None => groups.push(ExerciseSummary {
                exercise_name: set.exercise_name.clone(),
                total_volume: set.volume(),
                sets: vec![set.clone()],
            }),
        }
    }

    groups
}
