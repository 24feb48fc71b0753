//! CLI end-to-end tests against a throwaway database.

use std::path::Path;
use std::process::Command;

const TODAY: &str = "2024-01-15";

/// Runs the binary with an isolated config and database, pinned to `TODAY`
/// so results do not depend on the host clock.
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_on(dir, TODAY, args)
}

fn run_cli_on(dir: &Path, today: &str, args: &[&str]) -> (i32, String, String) {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        let log_dir = dir.join("logs");
        std::fs::write(
            &config_path,
            format!("log_level = \"info\"\nlog_dir = {:?}\n", log_dir.to_str().unwrap()),
        )
        .unwrap();
    }

    let output = Command::new(env!("CARGO_BIN_EXE_habitkit"))
        .arg("--config")
        .arg(&config_path)
        .arg("--db")
        .arg(dir.join("habits.sqlite3"))
        .arg("--today")
        .arg(today)
        .args(args)
        .output()
        .expect("failed to execute habitkit");

    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn created_id(stdout: &str) -> String {
    stdout
        .trim()
        .strip_prefix("Habit created: ")
        .expect("create output")
        .to_string()
}

#[test]
fn add_check_in_and_list_json() {
    let dir = tempfile::tempdir().unwrap();

    let (code, stdout, _) = run_cli(dir.path(), &["add", "Read", "--color", "rose"]);
    assert_eq!(code, 0);
    let id = created_id(&stdout);

    let (code, stdout, _) = run_cli(dir.path(), &["check-in", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("streak=1"));

    let (code, stdout, _) = run_cli(dir.path(), &["check-in", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("total=1"));

    let (code, stdout, _) = run_cli(dir.path(), &["list", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let habits = parsed.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["name"], "Read");
    assert_eq!(habits[0]["color"], "rose");
    assert_eq!(habits[0]["streak"], 1);
}

#[test]
fn undo_resets_todays_streak() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["add", "Run"]);
    let id = created_id(&stdout);

    run_cli(dir.path(), &["check-in", &id]);
    let (code, stdout, _) = run_cli(dir.path(), &["undo", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("streak=0"));
    assert!(stdout.contains("total=0"));
}

#[test]
fn unknown_or_malformed_id_fails() {
    let dir = tempfile::tempdir().unwrap();

    let (code, _, stderr) = run_cli(dir.path(), &["show", "not-a-uuid"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid habit id"));

    let (code, _, stderr) = run_cli(
        dir.path(),
        &["delete", "00000000-0000-0000-0000-000000000000"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("habit not found"));
}

#[test]
fn stats_json_reports_totals() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli(dir.path(), &["add", "Meditate"]);
    let id = created_id(&stdout);
    run_cli(dir.path(), &["add", "Stretch"]);
    run_cli(dir.path(), &["check-in", &id]);

    let (code, stdout, _) = run_cli(dir.path(), &["stats", "--json"]);
    assert_eq!(code, 0);
    let stats: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(stats["total_habits"], 2);
    assert_eq!(stats["total_check_ins"], 1);
    assert_eq!(stats["completion_rate_today"], 50);
    assert_eq!(stats["week_activity"].as_array().unwrap().len(), 7);
}

#[test]
fn check_ins_on_consecutive_days_build_a_streak() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stdout, _) = run_cli_on(dir.path(), "2024-01-10", &["add", "Floss"]);
    let id = created_id(&stdout);

    for date in ["2024-01-10", "2024-01-11", "2024-01-12", "2024-01-14"] {
        let (code, _, _) = run_cli_on(dir.path(), date, &["check-in", &id]);
        assert_eq!(code, 0);
    }

    let (code, stdout, _) = run_cli_on(dir.path(), "2024-01-14", &["show", &id]);
    assert_eq!(code, 0);
    assert!(stdout.contains("streak:      1"));
    assert!(stdout.contains("longest:     3"));
    assert!(stdout.contains("check-ins:   4 (13% of 30 days)"));
    assert!(stdout.contains("last:        2024-01-14"));

    // A day without a check-in drops the current streak to zero.
    let (_, stdout, _) = run_cli_on(dir.path(), "2024-01-15", &["show", &id, "--json"]);
    let view: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(view["streak"], 0);
    assert_eq!(view["longest_streak"], 3);
    assert_eq!(view["checked_in_today"], false);
}

#[test]
fn malformed_today_override_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli_on(dir.path(), "15/01/2024", &["list"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid --today date"));
}
