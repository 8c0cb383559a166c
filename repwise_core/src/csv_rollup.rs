//! CSV archival for the workout and meal journals.
//!
//! Rollup appends WAL records to long-term CSV files and archives the WAL
//! atomically so no record can be lost or duplicated mid-rollup.

use crate::{Intensity, LoggedWorkout, MealRecord, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// A set row in the workout CSV. Workout-level fields repeat on every
/// row so each row is self-contained and the file stays greppable.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WorkoutCsvRow {
    pub workout_id: String,
    pub user_id: String,
    pub workout_name: String,
    pub workout_intensity: Intensity,
    pub exercise_name: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    pub set_intensity: Intensity,
    pub created_at: String,
}

impl WorkoutCsvRow {
    fn from_workout(workout: &LoggedWorkout) -> Vec<WorkoutCsvRow> {
        workout
            .sets
            .iter()
            .map(|set| WorkoutCsvRow {
                workout_id: workout.record.id.to_string(),
                user_id: workout.record.user_id.to_string(),
                workout_name: workout.record.name.clone(),
                workout_intensity: workout.record.intensity,
                exercise_name: set.exercise_name.clone(),
                set_number: set.set_number,
                weight: set.weight,
                reps: set.reps,
                set_intensity: set.intensity,
                created_at: workout.record.created_at.to_rfc3339(),
            })
            .collect()
    }
}

/// A row in the meal CSV
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MealCsvRow {
    pub id: String,
    pub user_id: String,
    pub meal_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: String,
}

impl From<&MealRecord> for MealCsvRow {
    fn from(meal: &MealRecord) -> Self {
        MealCsvRow {
            id: meal.id.to_string(),
            user_id: meal.user_id.to_string(),
            meal_name: meal.meal_name.clone(),
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fats: meal.fats,
            created_at: meal.created_at.to_rfc3339(),
        }
    }
}

/// Roll up the workout WAL into CSV and archive the WAL
///
/// Returns the number of workouts processed. The CSV is fsynced before
/// the WAL is renamed to `.processed`, so a crash between the two steps
/// duplicates rather than loses records, and the archived WAL remains
/// available for manual recovery.
pub fn rollup_workouts(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let workouts: Vec<LoggedWorkout> = crate::wal::read_records(wal_path)?;

    if workouts.is_empty() {
        tracing::info!("No workouts in WAL to roll up");
        return Ok(0);
    }

    let rows: Vec<WorkoutCsvRow> = workouts.iter().flat_map(WorkoutCsvRow::from_workout).collect();
    append_rows(csv_path, rows)?;
    archive_wal(wal_path)?;

    tracing::info!("Rolled up {} workouts to {:?}", workouts.len(), csv_path);
    Ok(workouts.len())
}

/// Roll up the meal WAL into CSV and archive the WAL
pub fn rollup_meals(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let meals: Vec<MealRecord> = crate::wal::read_records(wal_path)?;

    if meals.is_empty() {
        tracing::info!("No meals in WAL to roll up");
        return Ok(0);
    }

    let rows: Vec<MealCsvRow> = meals.iter().map(MealCsvRow::from).collect();
    append_rows(csv_path, rows)?;
    archive_wal(wal_path)?;

    tracing::info!("Rolled up {} meals to {:?}", meals.len(), csv_path);
    Ok(meals.len())
}

/// Append rows to a CSV file, writing headers only when the file is new
fn append_rows<T: Serialize>(csv_path: &Path, rows: Vec<T>) -> Result<()> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    // Headers only on the first write; checked after opening to avoid an
    // extra stat() syscall
    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    Ok(())
}

/// Archive a WAL by renaming it to `.processed`
fn archive_wal(wal_path: &Path) -> Result<PathBuf> {
    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;
    tracing::info!("Archived WAL to {:?}", processed_path);
    Ok(processed_path)
}

/// Clean up old processed WAL files
///
/// Removes all `.processed` files in the given directory.
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if let Some(extension) = path.extension() {
            if extension == "processed" {
                std::fs::remove_file(&path)?;
                tracing::debug!("Removed processed WAL: {:?}", path);
                count += 1;
            }
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
