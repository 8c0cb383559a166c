//! Append-only JSONL journals for logged workouts and meals.
//!
//! Records are appended as one JSON document per line with file locking
//! so concurrent CLI invocations cannot interleave writes. The reader is
//! line-tolerant: a corrupt entry is skipped, not fatal.

use crate::Result;
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// JSONL sink with exclusive file locking.
///
/// The sink is generic over the record type; the workout and meal
/// journals share the implementation.
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append one record as a JSON line
    pub fn append<T: Serialize>(&mut self, record: &T) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // Acquire exclusive lock
        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended record to {:?}", self.path);
        Ok(())
    }
}

/// Read all records from a JSONL file
///
/// Unparseable lines are logged and skipped so one corrupt entry cannot
/// take down the whole journal.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Shared lock for reading
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse record at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Intensity, MealRecord};
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_meal(name: &str) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            meal_name: name.into(),
            calories: 650.0,
            protein: 45.0,
            carbs: 60.0,
            fats: 20.0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_and_read_single_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("meals.wal");

        let meal = create_test_meal("Chicken Bowl");
        let meal_id = meal.id;

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&meal).unwrap();

        let meals: Vec<MealRecord> = read_records(&wal_path).unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, meal_id);
    }

    #[test]
    fn test_append_multiple_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("meals.wal");

        let mut sink = JsonlSink::new(&wal_path);
        for i in 0..5 {
            sink.append(&create_test_meal(&format!("Meal {}", i))).unwrap();
        }

        let meals: Vec<MealRecord> = read_records(&wal_path).unwrap();
        assert_eq!(meals.len(), 5);
    }

    #[test]
    fn test_read_nonexistent_wal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("nonexistent.wal");

        let meals: Vec<MealRecord> = read_records(&wal_path).unwrap();
        assert!(meals.is_empty());
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("meals.wal");

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&create_test_meal("Good Meal")).unwrap();

        // Inject a corrupt line between valid ones
        {
            use std::io::Write as _;
            let mut file = OpenOptions::new().append(true).open(&wal_path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        sink.append(&create_test_meal("Another Meal")).unwrap();

        let meals: Vec<MealRecord> = read_records(&wal_path).unwrap();
        assert_eq!(meals.len(), 2);
    }

    #[test]
    fn test_sink_works_for_workouts_too() {
        use crate::{LoggedWorkout, WorkoutRecord};

        let temp_dir = tempfile::tempdir().unwrap();
        let wal_path = temp_dir.path().join("workouts.wal");

        let record = WorkoutRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Push Day".into(),
            intensity: Intensity::Good,
            created_at: Utc::now(),
        };
        let workout = LoggedWorkout {
            record,
            sets: vec![],
        };

        let mut sink = JsonlSink::new(&wal_path);
        sink.append(&workout).unwrap();

        let workouts: Vec<LoggedWorkout> = read_records(&wal_path).unwrap();
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].record.name, "Push Day");
    }
}
