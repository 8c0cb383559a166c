//! Integration tests for the repwise binary.
//!
//! These tests verify end-to-end behavior including:
//! - Workout logging and rating against history
//! - Meal logging and nutrition goal evaluation
//! - CSV rollup operations
//! - Profile-derived goals and personal bests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
///
/// The config dir is pointed at the (empty) temp dir so a developer's
/// own config cannot leak into assertions.
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repwise"));
    cmd.env("XDG_CONFIG_HOME", dir.path());
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Workout and nutrition tracking",
        ));
}

#[test]
fn test_log_workout_creates_wal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--name")
        .arg("Push Day")
        .arg("--exercise")
        .arg("Bench Press:100x5,95x8")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logged"));

    let wal_path = data_dir.join("wal/workouts.wal");
    let wal_content = fs::read_to_string(&wal_path).expect("Failed to read WAL");
    assert!(wal_content.contains("Bench Press"));
    assert!(wal_content.contains("Push Day"));
}

#[test]
fn test_first_time_exercise_rates_good() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Deadlift:180x5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Good"));
}

#[test]
fn test_improvement_over_history_rates_superb() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Squat:140x5")
        .assert()
        .success();

    // Heavier than the recorded average at matching reps
    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Squat:145x5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Superb"));
}

#[test]
fn test_personal_best_baseline_rating() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("profile")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--pb")
        .arg("Bench Press=100x10")
        .assert()
        .success()
        .stdout(predicate::str::contains("Personal best"));

    // 95x9 clears 90% of the best on both axes
    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Bench Press:95x9")
        .assert()
        .success()
        .stdout(predicate::str::contains("Superb"));
}

#[test]
fn test_meal_updates_nutrition_goals() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("meal")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--name")
        .arg("Big Lunch")
        .arg("--calories")
        .arg("2100")
        .arg("--protein")
        .arg("140")
        .arg("--carbs")
        .arg("260")
        .arg("--fats")
        .arg("60")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged meal 'Big Lunch'"))
        // Calorie goal (2000) achieved, protein goal (150 g) not
        .stdout(predicate::str::contains("✓ Calories 2100 / 2000"))
        .stdout(predicate::str::contains("· Protein  140 / 150"));
}

#[test]
fn test_meal_from_json_no_food() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let estimate_path = data_dir.join("estimate.txt");
    fs::write(&estimate_path, "No Food in Image").unwrap();

    cli(&temp_dir)
        .arg("meal")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--from-json")
        .arg(&estimate_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No food detected"));

    assert!(!data_dir.join("wal/meals.wal").exists());
}

#[test]
fn test_meal_from_json_estimate() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let estimate_path = data_dir.join("estimate.json");
    fs::write(
        &estimate_path,
        r#"{"meal_name": "Chicken Bowl", "calories": 650, "protein": 45, "carbs": 60, "fats": 20}"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("meal")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--from-json")
        .arg(&estimate_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged meal 'Chicken Bowl'"));
}

#[test]
fn test_today_without_workouts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("today")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged today"));
}

#[test]
fn test_week_reflects_logged_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("week")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts"));

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Row:60x10")
        .assert()
        .success();

    cli(&temp_dir)
        .arg("week")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Days active:      1"))
        .stdout(predicate::str::contains("Weekly intensity: Good"));
}

#[test]
fn test_steps_distance_and_progress() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("steps")
        .arg("1312")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("1.00 km"))
        // Default 5 km goal
        .stdout(predicate::str::contains("20% complete"));
}

#[test]
fn test_profile_derives_goals() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("profile")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--height")
        .arg("180")
        .arg("--weight")
        .arg("80")
        .arg("--objective")
        .arg("gain")
        .assert()
        .success()
        .stdout(predicate::str::contains("2982 kcal"))
        .stdout(predicate::str::contains("3.0 km"));
}

#[test]
fn test_rollup_archives_wals() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Bench Press:100x5")
        .assert()
        .success();

    cli(&temp_dir)
        .arg("meal")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--calories")
        .arg("500")
        .assert()
        .success();

    cli(&temp_dir)
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 1 workouts and 1 meals"));

    assert!(data_dir.join("workouts.csv").exists());
    assert!(data_dir.join("meals.csv").exists());
    assert!(!data_dir.join("wal/workouts.wal").exists());
    assert!(data_dir.join("wal/workouts.wal.processed").exists());

    // History is still visible after rollup
    cli(&temp_dir)
        .arg("today")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout (Good)"))
        .stdout(predicate::str::contains("500 / 2000"));

    cli(&temp_dir)
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned up 2 processed WAL files"));
}

#[test]
fn test_invalid_exercise_spec_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("no sets here")
        .assert()
        .failure();

    cli(&temp_dir)
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--exercise")
        .arg("Bench Press:100x0")
        .assert()
        .failure();
}
