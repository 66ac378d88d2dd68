// ABOUTME: Integration tests for the cfkit CLI commands.
// ABOUTME: Validates --help output, init behavior, and config errors.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cfkit_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("cfkit"))
}

#[test]
fn help_shows_commands() {
    cfkit_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("orgs"))
        .stdout(predicate::str::contains("push"));
}

#[test]
fn init_creates_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("cfkit.yml");

    cfkit_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--target", "https://api.example.com", "--app", "shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote cfkit.yml"));

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("target: https://api.example.com"));
    assert!(content.contains("name: shop"));
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let temp_dir = tempfile::tempdir().unwrap();
    fs::write(temp_dir.path().join("cfkit.yml"), "existing: config").unwrap();

    cfkit_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn commands_without_config_fail_clearly() {
    let temp_dir = tempfile::tempdir().unwrap();

    cfkit_cmd()
        .current_dir(temp_dir.path())
        .arg("orgs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn json_mode_reports_errors_as_json() {
    let temp_dir = tempfile::tempdir().unwrap();

    cfkit_cmd()
        .current_dir(temp_dir.path())
        .args(["--json", "orgs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"event\":\"error\""));
}

#[test]
fn push_rejects_unknown_strategy() {
    cfkit_cmd()
        .args(["push", "--strategy", "blue-green"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown deploy strategy"));
}
