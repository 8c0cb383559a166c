//! Daily nutrition aggregation and goal tracking.
//!
//! Meals are summed per calendar day and compared against fixed macro
//! goals plus a configurable calorie goal. Achievement flags persist
//! between invocations and roll over at local midnight.

use crate::{Error, MealRecord, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed daily macro goals, in grams.
pub const PROTEIN_GOAL_G: f64 = 150.0;
pub const CARBS_GOAL_G: f64 = 250.0;
pub const FATS_GOAL_G: f64 = 65.0;

/// Default calorie goal when the user has not derived one.
pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;

/// Sentinel the image-analysis collaborator returns for non-food images.
pub const NO_FOOD_SENTINEL: &str = "No Food in Image";

/// Summed nutrition values for one calendar day.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Daily targets the totals are evaluated against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for NutritionGoals {
    fn default() -> Self {
        Self {
            calories: DEFAULT_CALORIE_GOAL,
            protein: PROTEIN_GOAL_G,
            carbs: CARBS_GOAL_G,
            fats: FATS_GOAL_G,
        }
    }
}

/// Per-nutrient "goal achieved" flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalFlags {
    pub calories: bool,
    pub protein: bool,
    pub carbs: bool,
    pub fats: bool,
}

/// Sum calories and macros across the supplied meals.
///
/// An empty day is a valid zero total; negative or non-finite values are
/// rejected.
pub fn daily_totals(meals: &[MealRecord]) -> Result<NutritionTotals> {
    let mut totals = NutritionTotals::default();

    for meal in meals {
        for (field, value) in [
            ("calories", meal.calories),
            ("protein", meal.protein),
            ("carbs", meal.carbs),
            ("fats", meal.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "meal '{}': {} must be a non-negative number, got {}",
                    meal.meal_name, field, value
                )));
            }
        }

        totals.calories += meal.calories;
        totals.protein += meal.protein;
        totals.carbs += meal.carbs;
        totals.fats += meal.fats;
    }

    Ok(totals)
}

/// Compare totals against goals; each nutrient is achieved at >= its goal.
pub fn evaluate_goals(totals: NutritionTotals, goals: NutritionGoals) -> GoalFlags {
    GoalFlags {
        calories: totals.calories >= goals.calories,
        protein: totals.protein >= goals.protein,
        carbs: totals.carbs >= goals.carbs,
        fats: totals.fats >= goals.fats,
    }
}

/// Persisted achievement flags with the local day they were last evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalAchievements {
    #[serde(default)]
    pub flags: GoalFlags,

    #[serde(default)]
    pub last_checked: Option<NaiveDate>,
}

impl GoalAchievements {
    /// Discard flags recorded on an earlier day. Returns true when a
    /// rollover happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        let stale = self.last_checked.is_some_and(|day| day < today);
        if stale {
            self.flags = GoalFlags::default();
            self.last_checked = Some(today);
        }
        stale
    }

    /// Re-evaluate the flags for `today`'s totals. Flags carried over from
    /// a previous day are discarded first.
    pub fn refresh(&mut self, today: NaiveDate, totals: NutritionTotals, goals: NutritionGoals) {
        self.roll_over(today);
        self.flags = evaluate_goals(totals, goals);
        self.last_checked = Some(today);
    }
}

// ============================================================================
// Image-analysis estimates
// ============================================================================

/// Structured nutrition estimate produced by the image-analysis
/// collaborator for a photographed meal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MealEstimate {
    pub meal_name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Outcome of analyzing a meal photo.
#[derive(Clone, Debug, PartialEq)]
pub enum EstimateOutcome {
    Meal(MealEstimate),
    NoFood,
}

/// Parse the collaborator's response text.
///
/// Accepts a bare JSON object, or JSON embedded in surrounding prose (the
/// model does not always honour the JSON-only instruction), and recognises
/// the no-food sentinel.
pub fn parse_estimate(text: &str) -> Result<EstimateOutcome> {
    if text.contains(NO_FOOD_SENTINEL) {
        return Ok(EstimateOutcome::NoFood);
    }

    if let Ok(estimate) = serde_json::from_str::<MealEstimate>(text) {
        return Ok(EstimateOutcome::Meal(estimate));
    }

    // Salvage a JSON object wrapped in prose
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => {
            let estimate = serde_json::from_str::<MealEstimate>(&text[start..=end])?;
            Ok(EstimateOutcome::Meal(estimate))
        }
        _ => Err(Error::InvalidArgument(
            "no nutrition estimate found in response".into(),
        )),
    }
}

impl MealEstimate {
    /// Validate the estimate and turn it into a persistable meal record.
    pub fn into_record(self, user_id: Uuid, now: DateTime<Utc>) -> Result<MealRecord> {
        for (field, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "estimate for '{}': {} must be a non-negative number",
                    self.meal_name, field
                )));
            }
        }

        Ok(MealRecord {
            id: Uuid::new_v4(),
            user_id,
            meal_name: self.meal_name,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            created_at: now,
        })
    }
}
