//! Corruption recovery tests for the liftlog binary.
//!
//! These tests verify the system can handle:
//! - Corrupted stats documents
//! - Corrupted ledger entries
//! - Stray files in the data directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftlog"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"))
        .arg("--user")
        .arg("tester");
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_stats_file() {
    let temp_dir = setup_test_dir();
    let user_dir = temp_dir.path().join("data/users/tester");
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("stats.json"), "{ invalid json }}}}").unwrap();

    cli(&temp_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1"));

    let contents = fs::read_to_string(user_dir.join("stats.json")).unwrap();
    assert_eq!(contents, "{ invalid json }}}}");
}

#[test]
fn test_mistyped_stats_file_kept_on_read() {
    let temp_dir = setup_test_dir();
    let user_dir = temp_dir.path().join("data/users/tester");
    fs::create_dir_all(&user_dir).unwrap();
    let stored = r#"{"experience": 2500, "workouts_completed": 40, "streak_days": "3"}"#;
    fs::write(user_dir.join("stats.json"), stored).unwrap();

    cli(&temp_dir)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Level 1"));

    let contents = fs::read_to_string(user_dir.join("stats.json")).unwrap();
    assert_eq!(contents, stored);
}

#[test]
fn test_corrupted_entry_skipped_in_history() {
    let temp_dir = setup_test_dir();
    cli(&temp_dir)
        .args(["log", "--plan", "ppl-classic", "--day", "push", "--date", "2024-01-01", "--set", "1:80x5"])
        .assert()
        .success();

    let progress_dir = temp_dir.path().join("data/users/tester/progress");
    fs::write(progress_dir.join("2024-01-02.json"), "{ \"date\": ").unwrap();
    fs::write(progress_dir.join("notes.txt"), "not a document").unwrap();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01"))
        .stdout(predicate::str::contains("2024-01-02").not());
}

#[test]
fn test_entry_with_retired_plan_still_listed() {
    let temp_dir = setup_test_dir();
    let progress_dir = temp_dir.path().join("data/users/tester/progress");
    fs::create_dir_all(&progress_dir).unwrap();
    fs::write(
        progress_dir.join("2023-06-01.json"),
        r#"{
            "date": "2023-06-01",
            "body_weight": 79.0,
            "selected_plan_id": "bro-split",
            "selected_plan_day_id": "arms",
            "logged_exercises": [
                {"name": "Preacher Curl", "sets": 3, "reps": 10,
                 "logged_sets": [{"weight": 30.0, "reps": 10, "rir": 1}]}
            ]
        }"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan no longer available"))
        .stdout(predicate::str::contains("Preacher Curl"));
}
