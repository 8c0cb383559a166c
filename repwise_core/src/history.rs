//! Workout and meal history loading with a rolling day window.
//!
//! History is merged from the active WAL and the archived CSV so a
//! rollup never makes records invisible. Loaders return snapshots sorted
//! newest first; the snapshot filters below slice them per view.

use crate::csv_rollup::{MealCsvRow, WorkoutCsvRow};
use crate::{
    exercise_key, ExerciseSet, LoggedWorkout, MealRecord, Result, SetInput, WorkoutRecord,
};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, Utc};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use uuid::Uuid;

/// Load workouts from the last N days from both WAL and CSV
///
/// Returns workouts sorted by creation time (newest first), deduplicated
/// by id across the two sources.
pub fn load_recent_workouts(
    wal_path: &Path,
    csv_path: &Path,
    days: i64,
) -> Result<Vec<LoggedWorkout>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut workouts = Vec::new();
    let mut seen_ids = HashSet::new();

    // WAL first (most recent)
    if wal_path.exists() {
        let wal_workouts: Vec<LoggedWorkout> = crate::wal::read_records(wal_path)?;
        for workout in wal_workouts {
            if workout.record.created_at >= cutoff {
                seen_ids.insert(workout.record.id);
                workouts.push(workout);
            }
        }
        tracing::debug!("Loaded {} workouts from WAL", workouts.len());
    }

    // Archived CSV
    if csv_path.exists() {
        let mut csv_count = 0;
        for workout in load_workouts_from_csv(csv_path)? {
            if workout.record.created_at >= cutoff && !seen_ids.contains(&workout.record.id) {
                seen_ids.insert(workout.record.id);
                workouts.push(workout);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} workouts from CSV", csv_count);
    }

    workouts.sort_by(|a, b| b.record.created_at.cmp(&a.record.created_at));

    tracing::info!(
        "Loaded {} total workouts from last {} days",
        workouts.len(),
        days
    );

    Ok(workouts)
}

/// Load meals from the last N days from both WAL and CSV
///
/// Returns meals sorted by creation time (newest first), deduplicated by
/// id across the two sources.
pub fn load_recent_meals(wal_path: &Path, csv_path: &Path, days: i64) -> Result<Vec<MealRecord>> {
    let cutoff = Utc::now() - Duration::days(days);
    let mut meals = Vec::new();
    let mut seen_ids = HashSet::new();

    if wal_path.exists() {
        let wal_meals: Vec<MealRecord> = crate::wal::read_records(wal_path)?;
        for meal in wal_meals {
            if meal.created_at >= cutoff {
                seen_ids.insert(meal.id);
                meals.push(meal);
            }
        }
    }

    if csv_path.exists() {
        for meal in load_meals_from_csv(csv_path)? {
            if meal.created_at >= cutoff && !seen_ids.contains(&meal.id) {
                seen_ids.insert(meal.id);
                meals.push(meal);
            }
        }
    }

    meals.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    tracing::info!("Loaded {} total meals from last {} days", meals.len(), days);

    Ok(meals)
}

/// The most recent prior set rows for one exercise, newest first.
///
/// This is the classifier's history input: at most `limit` individual
/// sets, drawn from `workouts` (which must already be newest first).
pub fn recent_exercise_sets(
    workouts: &[LoggedWorkout],
    exercise: &str,
    limit: usize,
) -> Vec<SetInput> {
    let key = exercise_key(exercise);
    let mut sets = Vec::new();

    for workout in workouts {
        // Later sets in a workout are the more recent ones
        for set in workout.sets.iter().rev() {
            if exercise_key(&set.exercise_name) == key {
                sets.push(SetInput::new(set.weight, set.reps));
                if sets.len() == limit {
                    return sets;
                }
            }
        }
    }

    sets
}

/// Workout headers that fall on the given local calendar day.
pub fn workouts_on_day(workouts: &[WorkoutRecord], day: NaiveDate) -> Vec<WorkoutRecord> {
    workouts
        .iter()
        .filter(|w| local_date(w.created_at) == day)
        .cloned()
        .collect()
}

/// Workout headers in the Sunday-to-Saturday week containing `day`.
pub fn workouts_in_week(workouts: &[WorkoutRecord], day: NaiveDate) -> Vec<WorkoutRecord> {
    let start = day - Duration::days(i64::from(day.weekday().num_days_from_sunday()));
    let end = start + Duration::days(7);

    workouts
        .iter()
        .filter(|w| {
            let date = local_date(w.created_at);
            date >= start && date < end
        })
        .cloned()
        .collect()
}

/// Meals that fall on the given local calendar day.
pub fn meals_on_day(meals: &[MealRecord], day: NaiveDate) -> Vec<MealRecord> {
    meals
        .iter()
        .filter(|m| local_date(m.created_at) == day)
        .cloned()
        .collect()
}

fn local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// Reassemble workouts from the flattened set rows in the CSV archive
fn load_workouts_from_csv(path: &Path) -> Result<Vec<LoggedWorkout>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut grouped: HashMap<Uuid, LoggedWorkout> = HashMap::new();
    for result in reader.deserialize::<WorkoutCsvRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Failed to deserialize workout CSV row: {}", e);
                continue;
            }
        };

        match parse_workout_row(row) {
            Ok((record, set)) => {
                grouped
                    .entry(record.id)
                    .or_insert_with(|| LoggedWorkout {
                        record,
                        sets: Vec::new(),
                    })
                    .sets
                    .push(set);
            }
            Err(e) => {
                tracing::warn!("Failed to parse workout CSV row: {}", e);
            }
        }
    }

    Ok(grouped.into_values().collect())
}

fn parse_workout_row(row: WorkoutCsvRow) -> Result<(WorkoutRecord, ExerciseSet)> {
    let workout_id = parse_uuid(&row.workout_id)?;
    let user_id = parse_uuid(&row.user_id)?;
    let created_at = parse_timestamp(&row.created_at)?;

    let record = WorkoutRecord {
        id: workout_id,
        user_id,
        name: row.workout_name,
        intensity: row.workout_intensity,
        created_at,
    };
    let set = ExerciseSet {
        workout_id,
        exercise_name: row.exercise_name,
        set_number: row.set_number,
        weight: row.weight,
        reps: row.reps,
        intensity: row.set_intensity,
    };

    Ok((record, set))
}

fn load_meals_from_csv(path: &Path) -> Result<Vec<MealRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut meals = Vec::new();
    for result in reader.deserialize::<MealCsvRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Failed to deserialize meal CSV row: {}", e);
                continue;
            }
        };

        match parse_meal_row(row) {
            Ok(meal) => meals.push(meal),
            Err(e) => {
                tracing::warn!("Failed to parse meal CSV row: {}", e);
            }
        }
    }

    Ok(meals)
}

fn parse_meal_row(row: MealCsvRow) -> Result<MealRecord> {
    Ok(MealRecord {
        id: parse_uuid(&row.id)?,
        user_id: parse_uuid(&row.user_id)?,
        meal_name: row.meal_name,
        calories: row.calories,
        protein: row.protein,
        carbs: row.carbs,
        fats: row.fats,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| crate::Error::State(format!("Invalid UUID: {}", e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| crate::Error::State(format!("Invalid date: {}", e)))
}
