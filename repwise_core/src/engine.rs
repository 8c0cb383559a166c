//! Workout assembly: rate each exercise against the user's history and
//! build the records to persist.
//!
//! This is the engine's write path. Everything here is pure; the caller
//! supplies a stable snapshot of history in [`WorkoutContext`] and decides
//! what to do with the returned records.

use crate::classify::{classify_exercise, classify_workout};
use crate::{
    exercise_key, Error, ExerciseEntry, ExerciseSet, Intensity, LoggedWorkout, PersonalBests,
    Result, SetInput, WorkoutRecord,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Fallback name for a workout logged without one.
pub const DEFAULT_WORKOUT_NAME: &str = "Workout";

/// History snapshot for rating a new workout.
#[derive(Clone, Debug)]
pub struct WorkoutContext {
    pub user_id: Uuid,
    pub now: DateTime<Utc>,
    /// Prior sets per normalized exercise key, newest first, already
    /// trimmed to the classification window (at most 5 per exercise).
    pub recent_sets: HashMap<String, Vec<SetInput>>,
    pub personal_bests: PersonalBests,
}

/// Rate and assemble a workout from its exercises.
///
/// Each exercise is classified against its own recent history and
/// personal best; the workout rating is the aggregate. Set rows are
/// numbered 1-based per exercise and inherit the exercise's rating. No
/// records are produced unless every exercise validates.
pub fn log_workout(
    name: &str,
    exercises: &[ExerciseEntry],
    ctx: &WorkoutContext,
) -> Result<LoggedWorkout> {
    if exercises.is_empty() {
        return Err(Error::InvalidArgument(
            "a workout needs at least one exercise".into(),
        ));
    }

    let mut ratings: Vec<Intensity> = Vec::with_capacity(exercises.len());
    for entry in exercises {
        if entry.sets.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "exercise '{}' has no sets",
                entry.name
            )));
        }

        let key = exercise_key(&entry.name);
        let recent = ctx
            .recent_sets
            .get(&key)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let rating = classify_exercise(&entry.sets, recent, ctx.personal_bests.get(&entry.name))?;

        tracing::debug!("Rated exercise '{}' as {}", entry.name, rating);
        ratings.push(rating);
    }

    let workout_intensity = classify_workout(&ratings)?;
    let workout_id = Uuid::new_v4();

    let trimmed = name.trim();
    let record = WorkoutRecord {
        id: workout_id,
        user_id: ctx.user_id,
        name: if trimmed.is_empty() {
            DEFAULT_WORKOUT_NAME.to_string()
        } else {
            trimmed.to_string()
        },
        intensity: workout_intensity,
        created_at: ctx.now,
    };

    let mut sets = Vec::new();
    for (entry, rating) in exercises.iter().zip(&ratings) {
        for (index, set) in entry.sets.iter().enumerate() {
            sets.push(ExerciseSet {
                workout_id,
                exercise_name: entry.name.clone(),
                set_number: index as u32 + 1,
                weight: set.weight,
                reps: set.reps,
                intensity: *rating,
            });
        }
    }

    tracing::info!(
        "Assembled workout '{}' ({} exercises, rated {})",
        record.name,
        exercises.len(),
        workout_intensity
    );

    Ok(LoggedWorkout { record, sets })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> WorkoutContext {
        WorkoutContext {
            user_id: Uuid::new_v4(),
            now: Utc::now(),
            recent_sets: HashMap::new(),
            personal_bests: PersonalBests::default(),
        }
    }

    fn entry(name: &str, sets: &[(f64, u32)]) -> ExerciseEntry {
        ExerciseEntry {
            name: name.into(),
            sets: sets
                .iter()
                .map(|&(weight, reps)| SetInput::new(weight, reps))
                .collect(),
        }
    }

    #[test]
    fn test_first_workout_rates_good() {
        let ctx = context();
        let workout = log_workout(
            "Push Day",
            &[entry("Bench Press", &[(100.0, 5), (95.0, 8)])],
            &ctx,
        )
        .unwrap();

        assert_eq!(workout.record.name, "Push Day");
        assert_eq!(workout.record.intensity, Intensity::Good);
        assert_eq!(workout.record.user_id, ctx.user_id);
        assert_eq!(workout.sets.len(), 2);
    }

    #[test]
    fn test_set_numbers_restart_per_exercise() {
        let workout = log_workout(
            "Full Body",
            &[
                entry("Bench Press", &[(100.0, 5), (95.0, 8)]),
                entry("Squat", &[(140.0, 5)]),
            ],
            &context(),
        )
        .unwrap();

        let numbers: Vec<(String, u32)> = workout
            .sets
            .iter()
            .map(|s| (s.exercise_name.clone(), s.set_number))
            .collect();
        assert_eq!(
            numbers,
            vec![
                ("Bench Press".to_string(), 1),
                ("Bench Press".to_string(), 2),
                ("Squat".to_string(), 1),
            ]
        );
        for set in &workout.sets {
            assert_eq!(set.workout_id, workout.record.id);
        }
    }

    #[test]
    fn test_sets_inherit_exercise_rating() {
        let mut ctx = context();
        // Strong recent history drags the squat rating down
        ctx.recent_sets.insert(
            "squat".into(),
            vec![SetInput::new(180.0, 5), SetInput::new(180.0, 5)],
        );

        let workout = log_workout(
            "Legs",
            &[
                entry("Squat", &[(140.0, 5)]),
                entry("Leg Press", &[(200.0, 10)]),
            ],
            &ctx,
        )
        .unwrap();

        let squat_sets: Vec<_> = workout
            .sets
            .iter()
            .filter(|s| s.exercise_name == "Squat")
            .collect();
        // 140 is below 90% of the 180 average
        assert!(squat_sets.iter().all(|s| s.intensity == Intensity::Bad));

        // First-time leg press defaults to Good; workout mean (1+3)/2 = 2
        assert_eq!(workout.record.intensity, Intensity::Average);
    }

    #[test]
    fn test_blank_name_defaults() {
        let workout = log_workout("   ", &[entry("Row", &[(60.0, 10)])], &context()).unwrap();
        assert_eq!(workout.record.name, DEFAULT_WORKOUT_NAME);
    }

    #[test]
    fn test_rejects_empty_inputs() {
        assert!(log_workout("W", &[], &context()).is_err());
        assert!(log_workout("W", &[entry("Bench Press", &[])], &context()).is_err());
    }

    #[test]
    fn test_no_records_on_invalid_exercise() {
        // Second exercise is malformed; nothing should be produced
        let result = log_workout(
            "W",
            &[
                entry("Bench Press", &[(100.0, 5)]),
                entry("Squat", &[(-140.0, 5)]),
            ],
            &context(),
        );
        assert!(result.is_err());
    }
}
