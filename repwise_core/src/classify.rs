//! Intensity classification for exercises and workouts.
//!
//! Two rating paths feed the rest of the engine:
//! - A new exercise is rated against the user's recent performances of the
//!   same exercise, falling back to the personal best, falling back to a
//!   first-time default.
//! - Multiple exercise ratings are averaged into a workout rating.
//!
//! All threshold constants live here; the mean-score thresholds in
//! [`rate_mean`] are shared by workout-level, weekly, and history ratings.

use crate::{Error, Intensity, PersonalBest, Result, SetInput};

/// Personal-best tiers: both weight and reps must clear the ratio.
pub const PB_SUPERB_RATIO: f64 = 0.90;
pub const PB_GOOD_RATIO: f64 = 0.80;
pub const PB_AVERAGE_RATIO: f64 = 0.70;

/// Recent-average tiers, applied to weight alone.
pub const RECENT_GOOD_RATIO: f64 = 0.95;
pub const RECENT_AVERAGE_RATIO: f64 = 0.90;

/// Mean-score thresholds for mapping an average back to a level.
const MEAN_SUPERB: f64 = 3.5;
const MEAN_GOOD: f64 = 2.5;
const MEAN_AVERAGE: f64 = 1.5;

/// Map a mean intensity score back to a level.
///
/// Inverse of [`Intensity::score`] under averaging: the mean of N copies
/// of a level maps back to that level.
pub fn rate_mean(mean_score: f64) -> Intensity {
    if mean_score >= MEAN_SUPERB {
        Intensity::Superb
    } else if mean_score >= MEAN_GOOD {
        Intensity::Good
    } else if mean_score >= MEAN_AVERAGE {
        Intensity::Average
    } else {
        Intensity::Bad
    }
}

/// Rate a newly performed exercise.
///
/// `current_sets` are the sets just performed (at least one required).
/// `recent_sets` are up to the five most recent prior performances of the
/// same exercise, newest first; when empty, `personal_best` is the
/// baseline, and with no history at all the rating defaults to Good.
pub fn classify_exercise(
    current_sets: &[SetInput],
    recent_sets: &[SetInput],
    personal_best: Option<PersonalBest>,
) -> Result<Intensity> {
    if current_sets.is_empty() {
        return Err(Error::InvalidArgument(
            "at least one set is required to rate an exercise".into(),
        ));
    }
    validate_sets(current_sets)?;
    validate_sets(recent_sets)?;
    if let Some(best) = personal_best {
        validate_best(best)?;
    }

    let current = best_set(current_sets);

    if recent_sets.is_empty() {
        return Ok(match personal_best {
            Some(best) => rate_against_best(current, best),
            // First time performing this exercise
            None => Intensity::Good,
        });
    }

    Ok(rate_against_recent(current, recent_average(recent_sets)))
}

/// Rate a whole workout from its exercise ratings.
///
/// The caller must supply at least one exercise.
pub fn classify_workout(intensities: &[Intensity]) -> Result<Intensity> {
    if intensities.is_empty() {
        return Err(Error::InvalidArgument(
            "a workout needs at least one rated exercise".into(),
        ));
    }

    let total: f64 = intensities.iter().map(|level| level.score()).sum();
    Ok(rate_mean(total / intensities.len() as f64))
}

/// The set with the highest volume; earlier sets win ties.
fn best_set(sets: &[SetInput]) -> SetInput {
    let mut best = sets[0];
    for &set in &sets[1..] {
        if set.volume() > best.volume() {
            best = set;
        }
    }
    best
}

/// Average of recent performances: real-valued mean weight, rep mean
/// rounded half-up to a whole count.
struct RecentAverage {
    weight: f64,
    reps: u32,
}

fn recent_average(sets: &[SetInput]) -> RecentAverage {
    let n = sets.len() as f64;
    let weight = sets.iter().map(|set| set.weight).sum::<f64>() / n;
    let reps = (sets.iter().map(|set| f64::from(set.reps)).sum::<f64>() / n).round() as u32;
    RecentAverage { weight, reps }
}

fn rate_against_best(current: SetInput, best: PersonalBest) -> Intensity {
    let clears = |ratio: f64| {
        current.weight >= best.weight * ratio
            && f64::from(current.reps) >= f64::from(best.reps) * ratio
    };

    if clears(PB_SUPERB_RATIO) {
        Intensity::Superb
    } else if clears(PB_GOOD_RATIO) {
        Intensity::Good
    } else if clears(PB_AVERAGE_RATIO) {
        Intensity::Average
    } else {
        Intensity::Bad
    }
}

fn rate_against_recent(current: SetInput, avg: RecentAverage) -> Intensity {
    if current.weight > avg.weight && current.reps >= avg.reps {
        Intensity::Superb
    } else if current.weight >= avg.weight * RECENT_GOOD_RATIO {
        Intensity::Good
    } else if current.weight >= avg.weight * RECENT_AVERAGE_RATIO {
        Intensity::Average
    } else {
        Intensity::Bad
    }
}

fn validate_sets(sets: &[SetInput]) -> Result<()> {
    for set in sets {
        if !set.weight.is_finite() || set.weight <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "set weight must be a positive finite number, got {}",
                set.weight
            )));
        }
        if set.reps == 0 {
            return Err(Error::InvalidArgument(
                "set reps must be at least 1".into(),
            ));
        }
    }
    Ok(())
}

fn validate_best(best: PersonalBest) -> Result<()> {
    if !best.weight.is_finite() || best.weight <= 0.0 || best.reps == 0 {
        return Err(Error::InvalidArgument(format!(
            "personal best must have positive weight and reps, got {}x{}",
            best.weight, best.reps
        )));
    }
    Ok(())
}
