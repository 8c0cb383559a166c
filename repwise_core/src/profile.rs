//! Derived calorie and distance goals from body measurements.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Training objective used when deriving the calorie goal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Gain,
    Lose,
}

/// Accepted measurement ranges (centimetres / kilograms).
pub const MIN_HEIGHT_CM: f64 = 100.0;
pub const MAX_HEIGHT_CM: f64 = 250.0;
pub const MIN_WEIGHT_KG: f64 = 30.0;
pub const MAX_WEIGHT_KG: f64 = 250.0;

// Profile capture has no age field; the BMR assumes a fixed age.
const ASSUMED_AGE_YEARS: f64 = 25.0;
const ACTIVITY_FACTOR: f64 = 1.375; // moderate exercise
const OBJECTIVE_ADJUSTMENT_KCAL: f64 = 500.0;

const MIN_DISTANCE_GOAL_KM: f64 = 3.0;
const DISTANCE_KM_PER_KG: f64 = 0.033;

/// Daily calorie goal from Mifflin-St Jeor BMR, scaled by the moderate
/// activity factor and shifted by the training objective.
pub fn calorie_goal(weight_kg: f64, height_cm: f64, objective: Objective) -> Result<u32> {
    validate_weight(weight_kg)?;
    validate_height(height_cm)?;

    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * ASSUMED_AGE_YEARS + 5.0;
    let tdee = bmr * ACTIVITY_FACTOR;
    let goal = match objective {
        Objective::Gain => tdee + OBJECTIVE_ADJUSTMENT_KCAL,
        Objective::Lose => tdee - OBJECTIVE_ADJUSTMENT_KCAL,
    };

    Ok(goal.round() as u32)
}

/// Daily walking distance goal in kilometres, scaled to body weight with
/// a 3 km floor. Rounded to one decimal place.
pub fn distance_goal_km(weight_kg: f64) -> Result<f64> {
    validate_weight(weight_kg)?;

    let scaled = (weight_kg * DISTANCE_KM_PER_KG * 10.0).round() / 10.0;
    Ok(scaled.max(MIN_DISTANCE_GOAL_KM))
}

fn validate_height(height_cm: f64) -> Result<()> {
    if !height_cm.is_finite() || !(MIN_HEIGHT_CM..=MAX_HEIGHT_CM).contains(&height_cm) {
        return Err(Error::InvalidArgument(format!(
            "height must be between {MIN_HEIGHT_CM} and {MAX_HEIGHT_CM} cm, got {height_cm}"
        )));
    }
    Ok(())
}

fn validate_weight(weight_kg: f64) -> Result<()> {
    if !weight_kg.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&weight_kg) {
        return Err(Error::InvalidArgument(format!(
            "weight must be between {MIN_WEIGHT_KG} and {MAX_WEIGHT_KG} kg, got {weight_kg}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_goal_gain() {
        // BMR = 800 + 1125 - 125 + 5 = 1805; TDEE = 2481.875; +500
        assert_eq!(calorie_goal(80.0, 180.0, Objective::Gain).unwrap(), 2982);
    }

    #[test]
    fn test_calorie_goal_lose() {
        assert_eq!(calorie_goal(80.0, 180.0, Objective::Lose).unwrap(), 1982);
    }

    #[test]
    fn test_calorie_goal_bounds() {
        assert!(calorie_goal(80.0, 90.0, Objective::Gain).is_err());
        assert!(calorie_goal(20.0, 180.0, Objective::Gain).is_err());
        assert!(calorie_goal(f64::NAN, 180.0, Objective::Gain).is_err());
    }

    #[test]
    fn test_distance_goal_floor() {
        // 80 kg scales to 2.6 km, below the floor
        assert_eq!(distance_goal_km(80.0).unwrap(), 3.0);
    }

    #[test]
    fn test_distance_goal_scales_with_weight() {
        // 120 kg scales to 3.96, rounded to 4.0
        assert_eq!(distance_goal_km(120.0).unwrap(), 4.0);
    }
}
