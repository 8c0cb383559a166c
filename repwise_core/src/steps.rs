//! Step-count to distance estimation.
//!
//! Two independent estimates (stride length, steps-per-kilometre) are
//! averaged; neither is accurate alone for arbitrary walkers.

use crate::{Error, Result};

/// Average stride length in metres.
pub const STRIDE_LENGTH_M: f64 = 0.762;

/// Average steps per kilometre.
pub const STEPS_PER_KM: f64 = 1312.0;

/// Default daily distance goal in kilometres.
pub const DEFAULT_DISTANCE_GOAL_KM: f64 = 5.0;

/// Estimated walking distance in kilometres, rounded to two decimals.
pub fn distance_km(steps: u32) -> f64 {
    let steps = f64::from(steps);
    let by_stride = steps * STRIDE_LENGTH_M / 1000.0;
    let by_step_rate = steps / STEPS_PER_KM;
    round_two_decimals((by_stride + by_step_rate) / 2.0)
}

/// Progress toward a distance goal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceProgress {
    /// Completed fraction, clamped to 1.
    pub ratio: f64,
    /// Display percentage, rounded to the nearest integer.
    pub percent: u32,
}

/// Progress of `distance_km` against `goal_km`. The goal must be positive.
pub fn distance_progress(distance_km: f64, goal_km: f64) -> Result<DistanceProgress> {
    if !goal_km.is_finite() || goal_km <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "distance goal must be positive, got {goal_km}"
        )));
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "distance must be non-negative, got {distance_km}"
        )));
    }

    let ratio = (distance_km / goal_km).min(1.0);
    Ok(DistanceProgress {
        ratio,
        percent: (ratio * 100.0).round() as u32,
    })
}

fn round_two_decimals(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
