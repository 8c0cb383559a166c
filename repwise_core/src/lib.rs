#![forbid(unsafe_code)]

//! Core domain model and metrics engine for the Repwise fitness tracker.
//!
//! This crate provides:
//! - Domain types (workouts, sets, meals, personal bests)
//! - Intensity classification and aggregation
//! - Weekly activity, nutrition, and step/distance metrics
//! - Persistence (WAL, CSV archive, user state)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod classify;
pub mod weekly;
pub mod nutrition;
pub mod steps;
pub mod profile;
pub mod stats;
pub mod engine;
pub mod wal;
pub mod csv_rollup;
pub mod history;
pub mod state;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use classify::{classify_exercise, classify_workout, rate_mean};
pub use weekly::{weekly_activity, WeeklyActivity, WEEKDAY_LABELS};
pub use nutrition::{
    daily_totals, evaluate_goals, parse_estimate, EstimateOutcome, GoalAchievements, GoalFlags,
    MealEstimate, NutritionGoals, NutritionTotals,
};
pub use steps::{distance_km, distance_progress, DistanceProgress};
pub use profile::{calorie_goal, distance_goal_km, Objective};
pub use stats::{group_sets, history_stats, performance_series, HistoryStats};
pub use engine::{log_workout, WorkoutContext};
pub use wal::JsonlSink;
pub use history::{
    load_recent_meals, load_recent_workouts, meals_on_day, recent_exercise_sets, workouts_in_week,
    workouts_on_day,
};
