// Integration tests for the podtrust CLI.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes and stdout/stderr output.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a Command for the podtrust binary.
fn podtrust() -> Command {
    let mut cmd = Command::cargo_bin("podtrust").expect("binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("PODTRUST_ANALYSIS_KEY");
    cmd
}

#[test]
fn cli_version_flag() {
    podtrust()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("podtrust"));
}

#[test]
fn cli_help_flag() {
    podtrust()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("skill verification"));
}

#[test]
fn match_requires_user_and_pods() {
    podtrust()
        .arg("match")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    podtrust()
        .args(["-q", "-v", "aggregate", "--contributions", "x.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn aggregate_rejects_pod_and_user_together() {
    podtrust()
        .args([
            "aggregate",
            "--contributions",
            "x.json",
            "--pod",
            "p1",
            "--user",
            "u1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn normalize_manual_split_needs_both_percentages() {
    podtrust()
        .args(["normalize", "--file", "notes.txt", "--ai", "40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn missing_input_file_exits_with_code_2() {
    podtrust()
        .args([
            "match",
            "--user",
            "/nonexistent/user.json",
            "--pods",
            "/nonexistent/pods.json",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path does not exist"));
}
