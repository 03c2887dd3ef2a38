//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - Split and plan display
//! - Session logging and same-date overwrite
//! - Preference changes flowing into logged sessions
//! - Stats, history and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI isolated from the real config, signed in as `tester`
fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftlog"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"))
        .arg("--user")
        .arg("tester");
    cmd
}

fn read_json(path: &std::path::Path) -> Value {
    let content = fs::read_to_string(path).expect("read document");
    serde_json::from_str(&content).expect("parse document")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Strength training plan and progress tracker",
        ));
}

#[test]
fn test_requires_signed_in_user() {
    let temp_dir = setup_test_dir();
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
        .env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"))
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_first_run_seeds_plans_and_stats() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .arg("plans")
        .assert()
        .success()
        .stdout(predicate::str::contains("ppl-classic"))
        .stdout(predicate::str::contains("upper-lower"));

    let data = temp_dir.path().join("data");
    assert!(data.join("predefined_plans/ppl-classic.json").exists());
    assert!(data.join("users/tester/stats.json").exists());
}

#[test]
fn test_split_for_three_days() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["split", "--days", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 1: Push"))
        .stdout(predicate::str::contains("Day 2: Pull"))
        .stdout(predicate::str::contains("Day 3: Legs"));
}

#[test]
fn test_unsupported_availability_uses_fallback() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["split", "--days", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4-day split"));
}

#[test]
fn test_saved_availability_drives_split() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir).args(["availability", "5"]).assert().success();
    cli(&temp_dir)
        .arg("split")
        .assert()
        .success()
        .stdout(predicate::str::contains("5-day split"))
        .stdout(predicate::str::contains("Day 5: Lower"));

    let profile = read_json(&temp_dir.path().join("data/users/tester/profile.json"));
    assert_eq!(profile["weekly_availability"], 5);
}

#[test]
fn test_log_session_awards_xp_and_personal_best() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args([
            "log", "--plan", "ppl-classic", "--day", "push", "--date", "2024-01-01",
            "--body-weight", "80", "--set", "1:105x5@1", "--set", "1:100x6@1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session logged! +150 XP"))
        .stdout(predicate::str::contains("New personal best"));

    cli(&temp_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench press: 105"))
        .stdout(predicate::str::contains("Workouts completed: 1"));

    let entry = read_json(&temp_dir.path().join("data/users/tester/progress/2024-01-01.json"));
    assert_eq!(entry["logged_exercises"][0]["name"], "Barbell Bench Press");
    assert_eq!(entry["logged_exercises"][0]["logged_sets"][0]["weight"], 105.0);
}

#[test]
fn test_equal_weight_gives_base_xp_only() {
    let temp_dir = setup_test_dir();
    for date in ["2024-01-01", "2024-01-03"] {
        cli(&temp_dir)
            .args(["log", "--plan", "ppl-classic", "--day", "1", "--date", date, "--set", "1:105x5"])
            .assert()
            .success();
    }

    let stats = read_json(&temp_dir.path().join("data/users/tester/stats.json"));
    assert_eq!(stats["experience"], 250);
    assert_eq!(stats["workouts_completed"], 2);
    assert_eq!(stats["personal_bests"]["bench_press"], 105.0);
}

#[test]
fn test_same_date_overwrites_entry() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "push", "--date", "2024-01-01", "--set", "1:80x5"])
        .assert()
        .success();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "legs", "--date", "2024-01-01", "--set", "1:120x5"])
        .assert()
        .success();

    let progress_dir = temp_dir.path().join("data/users/tester/progress");
    let files: Vec<_> = fs::read_dir(&progress_dir).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(files.len(), 1);

    let entry = read_json(&progress_dir.join("2024-01-01.json"));
    assert_eq!(entry["selected_plan_day_id"], "legs");
    assert_eq!(entry["logged_exercises"][0]["name"], "Back Squat");
}

#[test]
fn test_log_without_date_is_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "push", "--set", "1:80x5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no session date given"));

    assert!(!temp_dir.path().join("data/users/tester/progress").exists());
}

#[test]
fn test_log_without_plan_is_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--date", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no training plan selected"));
}

#[test]
fn test_preference_flows_into_session() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["prefer", "Horizontal Push", "Dumbbell Bench Press"])
        .assert()
        .success();

    cli(&temp_dir)
        .args(["plan", "--days", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Dumbbell Bench Press]"));

    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "push", "--date", "2024-02-01", "--set", "1:40x10"])
        .assert()
        .success();

    let entry = read_json(&temp_dir.path().join("data/users/tester/progress/2024-02-01.json"));
    assert_eq!(entry["logged_exercises"][0]["name"], "Dumbbell Bench Press");

    // The stats write after the session still carries the preference
    let stats = read_json(&temp_dir.path().join("data/users/tester/stats.json"));
    assert_eq!(
        stats["exercise_preferences"]["Horizontal Push"],
        "Dumbbell Bench Press"
    );
}

#[test]
fn test_invalid_preference_rejected() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["prefer", "Horizontal Push", "Back Squat"])
        .assert()
        .failure();
}

#[test]
fn test_generated_split_can_be_logged() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "split-3", "--day", "3", "--date", "2024-03-01", "--set", "1:100x5"])
        .assert()
        .success();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("3-day split / Day 3: Legs"))
        .stdout(predicate::str::contains("Back Squat"));
}

#[test]
fn test_template_copies_previous_session() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "pull", "--date", "2024-01-01", "--set", "1:140x5"])
        .assert()
        .success();
    cli(&temp_dir)
        .args(["log", "--template", "2024-01-01", "--date", "2024-01-02", "--set", "1:150x5"])
        .assert()
        .success();

    let entry = read_json(&temp_dir.path().join("data/users/tester/progress/2024-01-02.json"));
    assert_eq!(entry["selected_plan_day_id"], "pull");
    assert_eq!(entry["logged_exercises"][0]["name"], "Conventional Deadlift");
    assert_eq!(entry["logged_exercises"][0]["logged_sets"][0]["weight"], 150.0);
}

#[test]
fn test_history_newest_first() {
    let temp_dir = setup_test_dir();
    for date in ["2024-01-05", "2024-01-01", "2024-01-03"] {
        cli(&temp_dir)
            .args(["log", "--plan", "ppl-classic", "--day", "push", "--date", date])
            .assert()
            .success();
    }

    let output = cli(&temp_dir).arg("history").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let first = stdout.find("2024-01-05").unwrap();
    let middle = stdout.find("2024-01-03").unwrap();
    let last = stdout.find("2024-01-01").unwrap();
    assert!(first < middle && middle < last);
}

#[test]
fn test_export_creates_csv() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "push", "--date", "2024-01-01", "--set", "1:80x5"])
        .assert()
        .success();

    let csv_path = temp_dir.path().join("history.csv");
    cli(&temp_dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("date,body_weight"));
    assert!(csv.contains("Barbell Bench Press"));
}
