use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use repwise_core::*;
use std::collections::HashMap;
use std::path::PathBuf;

/// History window supplied to the classifier and the views.
const HISTORY_WINDOW_DAYS: i64 = 90;

/// Prior performances considered when rating an exercise.
const CLASSIFIER_SET_LIMIT: usize = 5;

/// Workouts shown on the performance chart.
const CHART_WORKOUT_LIMIT: usize = 7;

#[derive(Parser)]
#[command(name = "repwise")]
#[command(about = "Workout and nutrition tracking with derived intensity metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout and rate it against your history
    Log {
        /// Workout name (defaults to "Workout")
        #[arg(long)]
        name: Option<String>,

        /// Exercise with its sets: "NAME:WEIGHTxREPS,WEIGHTxREPS,..."
        #[arg(long = "exercise", required = true)]
        exercises: Vec<String>,
    },

    /// Log a meal and check today's nutrition goals
    Meal {
        /// Meal name (defaults to "Meal")
        #[arg(long)]
        name: Option<String>,

        #[arg(long, default_value_t = 0.0)]
        calories: f64,

        /// Protein in grams
        #[arg(long, default_value_t = 0.0)]
        protein: f64,

        /// Carbohydrates in grams
        #[arg(long, default_value_t = 0.0)]
        carbs: f64,

        /// Fats in grams
        #[arg(long, default_value_t = 0.0)]
        fats: f64,

        /// Read a nutrition estimate JSON (from the photo analyzer)
        /// instead of explicit values
        #[arg(long, conflicts_with_all = ["calories", "protein", "carbs", "fats"])]
        from_json: Option<PathBuf>,
    },

    /// Show today's workouts, recent performance, and nutrition (default)
    Today,

    /// Show this week's activity by day
    Week,

    /// Estimate walking distance from a step count
    Steps {
        /// Steps taken today
        steps: u32,
    },

    /// Set body measurements, derive goals, and record personal bests
    Profile {
        /// Height in centimetres
        #[arg(long)]
        height: Option<f64>,

        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,

        /// Training objective: gain or lose
        #[arg(long)]
        objective: Option<String>,

        /// Personal best: "EXERCISE=WEIGHTxREPS" (repeatable)
        #[arg(long = "pb")]
        pbs: Vec<String>,
    },

    /// Roll up WAL records to CSV
    Rollup {
        /// Clean up processed WAL files after rollup
        #[arg(long)]
        cleanup: bool,
    },
}

/// File layout under the data directory.
struct Paths {
    wal_dir: PathBuf,
    workout_wal: PathBuf,
    meal_wal: PathBuf,
    workouts_csv: PathBuf,
    meals_csv: PathBuf,
    state: PathBuf,
}

impl Paths {
    fn new(data_dir: &PathBuf) -> Self {
        let wal_dir = data_dir.join("wal");
        Self {
            workout_wal: wal_dir.join("workouts.wal"),
            meal_wal: wal_dir.join("meals.wal"),
            workouts_csv: data_dir.join("workouts.csv"),
            meals_csv: data_dir.join("meals.csv"),
            state: wal_dir.join("state.json"),
            wal_dir,
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging
    repwise_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Log { name, exercises }) => cmd_log(&data_dir, name, &exercises),
        Some(Commands::Meal {
            name,
            calories,
            protein,
            carbs,
            fats,
            from_json,
        }) => cmd_meal(&data_dir, name, calories, protein, carbs, fats, from_json, &config),
        Some(Commands::Today) => cmd_today(&data_dir, &config),
        Some(Commands::Week) => cmd_week(&data_dir),
        Some(Commands::Steps { steps }) => cmd_steps(&data_dir, steps, &config),
        Some(Commands::Profile {
            height,
            weight,
            objective,
            pbs,
        }) => cmd_profile(&data_dir, height, weight, objective, &pbs),
        Some(Commands::Rollup { cleanup }) => cmd_rollup(&data_dir, cleanup),
        None => cmd_today(&data_dir, &config),
    }
}

fn cmd_log(data_dir: &PathBuf, name: Option<String>, exercise_specs: &[String]) -> Result<()> {
    let paths = Paths::new(data_dir);
    std::fs::create_dir_all(&paths.wal_dir)?;

    let entries = exercise_specs
        .iter()
        .map(|spec| parse_exercise(spec))
        .collect::<Result<Vec<_>>>()?;

    let state = UserState::load(&paths.state)?;
    let history = load_recent_workouts(&paths.workout_wal, &paths.workouts_csv, HISTORY_WINDOW_DAYS)?;

    // Snapshot the classification inputs per exercise
    let mut recent_sets = HashMap::new();
    for entry in &entries {
        recent_sets.insert(
            exercise_key(&entry.name),
            recent_exercise_sets(&history, &entry.name, CLASSIFIER_SET_LIMIT),
        );
    }

    let ctx = WorkoutContext {
        user_id: state.user_id,
        now: Utc::now(),
        recent_sets,
        personal_bests: state.personal_bests.clone(),
    };

    let workout = log_workout(name.as_deref().unwrap_or(""), &entries, &ctx)?;

    let mut sink = JsonlSink::new(&paths.workout_wal);
    sink.append(&workout)?;

    // Persist state so the user id stays stable from the first run
    state.save(&paths.state)?;

    display_workout(&workout);
    println!("\n✓ Workout logged!");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_meal(
    data_dir: &PathBuf,
    name: Option<String>,
    calories: f64,
    protein: f64,
    carbs: f64,
    fats: f64,
    from_json: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let paths = Paths::new(data_dir);
    std::fs::create_dir_all(&paths.wal_dir)?;

    let estimate = match from_json {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            match parse_estimate(&text)? {
                EstimateOutcome::Meal(estimate) => estimate,
                EstimateOutcome::NoFood => {
                    println!("No food detected in the analyzed image - nothing logged.");
                    return Ok(());
                }
            }
        }
        None => MealEstimate {
            meal_name: name.unwrap_or_else(|| "Meal".into()),
            calories,
            protein,
            carbs,
            fats,
        },
    };

    let mut state = UserState::load(&paths.state)?;
    let meal = estimate.into_record(state.user_id, Utc::now())?;
    let meal_name = meal.meal_name.clone();

    let mut sink = JsonlSink::new(&paths.meal_wal);
    sink.append(&meal)?;

    // Re-evaluate today's goals with the new meal included
    let today = Local::now().date_naive();
    let meals = load_recent_meals(&paths.meal_wal, &paths.meals_csv, 1)?;
    let totals = daily_totals(&meals_on_day(&meals, today))?;
    let goals = config.goals.nutrition(state.calorie_goal);
    state.achievements.refresh(today, totals, goals);
    state.save(&paths.state)?;

    println!("✓ Logged meal '{}'", meal_name);
    display_nutrition(totals, goals, state.achievements.flags);

    Ok(())
}

fn cmd_today(data_dir: &PathBuf, config: &Config) -> Result<()> {
    let paths = Paths::new(data_dir);
    let today = Local::now().date_naive();

    let workouts = load_recent_workouts(&paths.workout_wal, &paths.workouts_csv, HISTORY_WINDOW_DAYS)?;
    let headers: Vec<WorkoutRecord> = workouts.iter().map(|w| w.record.clone()).collect();
    let todays = workouts_on_day(&headers, today);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  TODAY                                  │");
    println!("╰─────────────────────────────────────────╯");

    if todays.is_empty() {
        println!("\n  No workouts logged today");
    } else {
        println!();
        for workout in &todays {
            println!("  {} ({})", workout.name, workout.intensity);
        }
    }

    let points = performance_series(&headers, CHART_WORKOUT_LIMIT);
    if !points.is_empty() {
        println!("\n  Recent performance:");
        for point in &points {
            println!(
                "  {}  {:<4} {}",
                point.date.format("%b %d"),
                bar(point.score),
                point.intensity
            );
        }
    }

    let state = UserState::load(&paths.state)?;
    let meals = load_recent_meals(&paths.meal_wal, &paths.meals_csv, 1)?;
    let totals = daily_totals(&meals_on_day(&meals, today))?;
    let goals = config.goals.nutrition(state.calorie_goal);
    display_nutrition(totals, goals, evaluate_goals(totals, goals));

    Ok(())
}

fn cmd_week(data_dir: &PathBuf) -> Result<()> {
    let paths = Paths::new(data_dir);
    let today = Local::now().date_naive();

    let workouts = load_recent_workouts(&paths.workout_wal, &paths.workouts_csv, HISTORY_WINDOW_DAYS)?;
    let headers: Vec<WorkoutRecord> = workouts.iter().map(|w| w.record.clone()).collect();
    let week = weekly_activity(&workouts_in_week(&headers, today));

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  THIS WEEK                              │");
    println!("╰─────────────────────────────────────────╯");
    println!();

    for (label, score) in WEEKDAY_LABELS.iter().zip(week.daily_scores.iter()) {
        println!("  {}  {:<4} {:.1}", label, bar(*score), score);
    }

    println!();
    println!("  Days active:      {}", week.days_active);
    match week.rating {
        Some(rating) => println!("  Weekly intensity: {}", rating),
        None => println!("  Weekly intensity: No workouts"),
    }

    Ok(())
}

fn cmd_steps(data_dir: &PathBuf, steps: u32, config: &Config) -> Result<()> {
    let paths = Paths::new(data_dir);
    let state = UserState::load(&paths.state)?;

    let distance = distance_km(steps);
    let goal = state.distance_goal_km.unwrap_or(config.goals.distance_km);
    let progress = distance_progress(distance, goal)?;

    println!("\n  {} steps ≈ {:.2} km", steps, distance);
    println!("  Goal: {:.1} km ({}% complete)", goal, progress.percent);

    Ok(())
}

fn cmd_profile(
    data_dir: &PathBuf,
    height: Option<f64>,
    weight: Option<f64>,
    objective: Option<String>,
    pb_specs: &[String],
) -> Result<()> {
    let paths = Paths::new(data_dir);
    std::fs::create_dir_all(&paths.wal_dir)?;

    let mut state = UserState::load(&paths.state)?;
    let mut changed = false;

    if let (Some(height_cm), Some(weight_kg)) = (height, weight) {
        let objective = match objective.as_deref().map(str::to_lowercase).as_deref() {
            Some("gain") => Objective::Gain,
            Some("lose") => Objective::Lose,
            Some(other) => {
                return Err(Error::InvalidArgument(format!(
                    "objective must be 'gain' or 'lose', got '{}'",
                    other
                )))
            }
            None => {
                return Err(Error::InvalidArgument(
                    "an objective (gain or lose) is required to derive goals".into(),
                ))
            }
        };

        let calories = calorie_goal(weight_kg, height_cm, objective)?;
        let distance = distance_goal_km(weight_kg)?;
        state.calorie_goal = Some(f64::from(calories));
        state.distance_goal_km = Some(distance);
        changed = true;

        println!("✓ Derived daily goals:");
        println!("  Calories: {} kcal", calories);
        println!("  Distance: {:.1} km", distance);
    } else if height.is_some() || weight.is_some() {
        return Err(Error::InvalidArgument(
            "both --height and --weight are required to derive goals".into(),
        ));
    }

    for spec in pb_specs {
        let (exercise, best) = parse_pb(spec)?;
        if state.personal_bests.record(&exercise, best) {
            println!("✓ Personal best for {}: {}x{}", exercise, best.weight, best.reps);
        } else {
            println!("  Kept existing personal best for {}", exercise);
        }
        changed = true;
    }

    if changed {
        state.save(&paths.state)?;
    } else {
        // No updates requested - show the current profile
        match state.calorie_goal {
            Some(goal) => println!("  Calorie goal:  {} kcal", goal),
            None => println!("  Calorie goal:  not set"),
        }
        match state.distance_goal_km {
            Some(goal) => println!("  Distance goal: {:.1} km", goal),
            None => println!("  Distance goal: not set"),
        }
        if state.personal_bests.is_empty() {
            println!("  No personal bests recorded");
        } else {
            let mut bests: Vec<_> = state.personal_bests.iter().collect();
            bests.sort_by(|a, b| a.0.cmp(b.0));
            for (exercise, best) in bests {
                println!("  PB {}: {}x{}", exercise, best.weight, best.reps);
            }
        }
    }

    Ok(())
}

fn cmd_rollup(data_dir: &PathBuf, cleanup: bool) -> Result<()> {
    let paths = Paths::new(data_dir);

    let workout_count = csv_rollup::rollup_workouts(&paths.workout_wal, &paths.workouts_csv)?;
    let meal_count = csv_rollup::rollup_meals(&paths.meal_wal, &paths.meals_csv)?;

    println!("✓ Rolled up {} workouts and {} meals to CSV", workout_count, meal_count);
    println!("  Workouts: {}", paths.workouts_csv.display());
    println!("  Meals:    {}", paths.meals_csv.display());

    if cleanup {
        let cleaned = csv_rollup::cleanup_processed_wals(&paths.wal_dir)?;
        if cleaned > 0 {
            println!("✓ Cleaned up {} processed WAL files", cleaned);
        }
    }

    Ok(())
}

/// Parse "NAME:WEIGHTxREPS,WEIGHTxREPS,..." into an exercise entry
fn parse_exercise(spec: &str) -> Result<ExerciseEntry> {
    let (name, sets_spec) = spec.split_once(':').ok_or_else(|| {
        Error::InvalidArgument(format!(
            "exercise '{}' must look like \"Bench Press:100x5,95x8\"",
            spec
        ))
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("exercise name is empty".into()));
    }

    let sets = sets_spec
        .split(',')
        .map(parse_set)
        .collect::<Result<Vec<_>>>()?;

    Ok(ExerciseEntry {
        name: name.to_string(),
        sets,
    })
}

/// Parse "WEIGHTxREPS" into a set
fn parse_set(spec: &str) -> Result<SetInput> {
    let lower = spec.trim().to_lowercase();
    let (weight, reps) = lower.split_once('x').ok_or_else(|| {
        Error::InvalidArgument(format!("set '{}' must look like WEIGHTxREPS, e.g. 100x5", spec))
    })?;

    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid weight in set '{}'", spec)))?;
    let reps: u32 = reps
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid reps in set '{}'", spec)))?;

    Ok(SetInput::new(weight, reps))
}

/// Parse "EXERCISE=WEIGHTxREPS" into a personal best
fn parse_pb(spec: &str) -> Result<(String, PersonalBest)> {
    let (exercise, set_spec) = spec.split_once('=').ok_or_else(|| {
        Error::InvalidArgument(format!(
            "personal best '{}' must look like \"bench press=100x5\"",
            spec
        ))
    })?;

    let exercise = exercise.trim();
    if exercise.is_empty() {
        return Err(Error::InvalidArgument("personal best exercise name is empty".into()));
    }

    let set = parse_set(set_spec)?;
    Ok((
        exercise.to_string(),
        PersonalBest {
            weight: set.weight,
            reps: set.reps,
        },
    ))
}

fn display_workout(workout: &LoggedWorkout) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {} WORKOUT", workout.record.intensity.to_string().to_uppercase());
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  {}", workout.record.name);
    println!();

    for group in group_sets(&workout.sets) {
        let rating = group.sets[0].intensity;
        println!(
            "  → {}: {} ({} sets, volume {:.0} kg)",
            group.exercise_name,
            rating,
            group.sets.len(),
            group.total_volume
        );
        for set in &group.sets {
            println!("      set {}: {}x{}", set.set_number, set.weight, set.reps);
        }
    }
}

fn display_nutrition(totals: NutritionTotals, goals: NutritionGoals, flags: GoalFlags) {
    println!("\n  Nutrition today:");
    println!(
        "  {} Calories {:.0} / {:.0} kcal",
        tick(flags.calories),
        totals.calories,
        goals.calories
    );
    println!(
        "  {} Protein  {:.0} / {:.0} g",
        tick(flags.protein),
        totals.protein,
        goals.protein
    );
    println!(
        "  {} Carbs    {:.0} / {:.0} g",
        tick(flags.carbs),
        totals.carbs,
        goals.carbs
    );
    println!(
        "  {} Fats     {:.0} / {:.0} g",
        tick(flags.fats),
        totals.fats,
        goals.fats
    );
}

fn tick(achieved: bool) -> &'static str {
    if achieved {
        "✓"
    } else {
        "·"
    }
}

/// Bar for a 0-4 intensity score
fn bar(score: f64) -> String {
    "█".repeat(score.round() as usize)
}
