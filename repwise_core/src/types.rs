//! Core domain types for the Repwise fitness tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Intensity ratings for exercises and workouts
//! - Workout, set, and meal records
//! - Personal bests and per-user state

use crate::nutrition::GoalAchievements;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Intensity
// ============================================================================

/// Ordinal performance rating for an exercise or a whole workout.
///
/// The variant order is meaningful: `Bad < Average < Good < Superb`, and
/// every averaging rule in the engine works over the matching numeric
/// scores (see [`Intensity::score`]).
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Bad,
    Average,
    Good,
    Superb,
}

impl Intensity {
    /// Numeric score used for averaging: Bad=1 through Superb=4.
    pub fn score(self) -> f64 {
        match self {
            Intensity::Bad => 1.0,
            Intensity::Average => 2.0,
            Intensity::Good => 3.0,
            Intensity::Superb => 4.0,
        }
    }

    /// All levels in ascending order.
    pub fn all() -> [Intensity; 4] {
        [
            Intensity::Bad,
            Intensity::Average,
            Intensity::Good,
            Intensity::Superb,
        ]
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intensity::Bad => "Bad",
            Intensity::Average => "Average",
            Intensity::Good => "Good",
            Intensity::Superb => "Superb",
        };
        f.write_str(label)
    }
}

// ============================================================================
// Sets and Exercises
// ============================================================================

/// A single weight/reps pair, as entered by the user.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetInput {
    pub weight: f64,
    pub reps: u32,
}

impl SetInput {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }

    /// Volume (weight x reps), the performance comparator for a set.
    pub fn volume(self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// One exercise being logged: its name plus the sets just performed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: Vec<SetInput>,
}

// ============================================================================
// Stored Records
// ============================================================================

/// A stored workout header.
///
/// `intensity` is assigned once when the workout is logged and treated as
/// immutable input by every aggregation afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub intensity: Intensity,
    pub created_at: DateTime<Utc>,
}

/// One stored set row, flattened per exercise.
///
/// Set numbers are 1-based and unique per exercise within a workout. The
/// intensity is the owning exercise's rating, not the workout's.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub workout_id: Uuid,
    pub exercise_name: String,
    pub set_number: u32,
    pub weight: f64,
    pub reps: u32,
    pub intensity: Intensity,
}

impl ExerciseSet {
    /// Volume (weight x reps) for this set.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// A workout together with its set rows. This is the unit the WAL journals.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedWorkout {
    pub record: WorkoutRecord,
    pub sets: Vec<ExerciseSet>,
}

/// A stored meal with its nutrition breakdown (grams for the macros).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Personal Bests
// ============================================================================

/// Best recorded weight/reps pair for a single exercise.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct PersonalBest {
    pub weight: f64,
    pub reps: u32,
}

impl PersonalBest {
    /// Volume (weight x reps) of the best recorded performance.
    pub fn volume(self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// Normalized lookup key for an exercise name: lowercased, with whitespace
/// runs collapsed to single underscores ("Bench Press" -> "bench_press").
pub fn exercise_key(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Personal bests keyed by normalized exercise name.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersonalBests(HashMap<String, PersonalBest>);

impl PersonalBests {
    /// Look up the personal best for an exercise by display name.
    pub fn get(&self, exercise: &str) -> Option<PersonalBest> {
        self.0.get(&exercise_key(exercise)).copied()
    }

    /// Record a performance, keeping whichever entry has the higher volume.
    ///
    /// Returns true when the stored entry changed.
    pub fn record(&mut self, exercise: &str, best: PersonalBest) -> bool {
        let key = exercise_key(exercise);
        match self.0.get(&key) {
            Some(existing) if existing.volume() >= best.volume() => false,
            _ => {
                self.0.insert(key, best);
                true
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over (normalized key, best) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &PersonalBest)> {
        self.0.iter()
    }
}

// ============================================================================
// User State
// ============================================================================

/// Per-user persistent state across CLI invocations.
///
/// Derived goals are optional overrides; when unset the configured
/// defaults apply.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default = "Uuid::new_v4")]
    pub user_id: Uuid,

    #[serde(default)]
    pub personal_bests: PersonalBests,

    #[serde(default)]
    pub achievements: GoalAchievements,

    #[serde(default)]
    pub calorie_goal: Option<f64>,

    #[serde(default)]
    pub distance_goal_km: Option<f64>,
}

impl Default for UserState {
    fn default() -> Self {
        Self {
            user_id: Uuid::new_v4(),
            personal_bests: PersonalBests::default(),
            achievements: GoalAchievements::default(),
            calorie_goal: None,
            distance_goal_km: None,
        }
    }
}
