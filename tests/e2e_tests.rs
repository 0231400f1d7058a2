//! End-to-end tests for the `tomato` binary.

use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

fn tomato() -> Command {
    Command::cargo_bin("tomato").unwrap()
}

#[test]
fn test_help() {
    tomato()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pomodoro timer"))
        .stdout(predicate::str::contains("--work"))
        .stdout(predicate::str::contains("--cycles"));
}

#[test]
fn test_version() {
    tomato()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tomato"));
}

#[test]
fn test_zero_work_duration_rejected() {
    tomato()
        .args(["--work", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("work duration must be positive"));
}

#[test]
fn test_zero_rest_duration_rejected() {
    tomato()
        .args(["--rest", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rest duration must be positive"));
}

#[test]
fn test_zero_cycles_rejected() {
    tomato()
        .args(["--cycles", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle count must be at least 1"));
}

#[test]
fn test_short_run_completes() {
    // 0.02 minutes rounds to a 1-second degenerate phase per side.
    tomato()
        .args(["-w", "0.02", "-r", "0.02", "-c", "1"])
        .timeout(Duration::from_secs(15))
        .assert()
        .success()
        .stdout(predicate::str::contains("Pomodoro session complete."));
}

#[test]
fn test_short_run_with_notifications() {
    tomato()
        .args(["-w", "0.02", "-r", "0.02", "-c", "1", "--notify"])
        .timeout(Duration::from_secs(15))
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting Work: cycle 1"))
        .stdout(predicate::str::contains("Work complete"));
}

#[test]
fn test_json_mode_emits_event_stream() {
    let assert = tomato()
        .args(["-w", "0.02", "-r", "0.02", "-c", "2", "--json"])
        .timeout(Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"event\":\"phase_start\""))
        .stdout(predicate::str::contains("\"event\":\"phase_end\""))
        .stdout(predicate::str::contains("\"event\":\"timer_complete\""));

    // Every line of JSON output parses on its own.
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for line in stdout.lines().filter(|l| !l.is_empty()) {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value.get("event").is_some(), "line missing event: {}", line);
        assert!(value.get("cycle").is_some(), "line missing cycle: {}", line);
    }
}

#[test]
fn test_json_mode_no_trailing_rest() {
    let assert = tomato()
        .args(["-w", "0.02", "-r", "0.02", "-c", "1", "--json"])
        .timeout(Duration::from_secs(15))
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!stdout.contains("\"phase\":\"rest\""), "{}", stdout);
}

#[test]
fn test_completions_bash() {
    tomato()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tomato"));
}
