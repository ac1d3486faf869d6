//! End-to-end tests for the palaver binary
//!
//! Exercises the offline `check` command and the exit-code contract:
//! 0 when the scenario passes, 1 when it fails.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_check_passes_offline() {
    Command::cargo_bin("palaver")
        .unwrap()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"))
        .stdout(predicate::str::contains("context maintained"));
}

#[test]
fn test_run_with_forgetful_script_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
backend:
  type: scripted
  scripted:
    replies:
      - "Nice to meet you."
      - "No idea what you do."
      - "I don't recall your name."
"#,
    )
    .unwrap();

    Command::cargo_bin("palaver")
        .unwrap()
        .args(["--config", config_path.to_str().unwrap(), "run"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_run_with_unknown_backend_override_fails_validation() {
    Command::cargo_bin("palaver")
        .unwrap()
        .args(["--config", "/nonexistent/config.yaml", "run", "--backend", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend type"));
}
