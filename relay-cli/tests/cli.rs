//! End-to-end tests for the `relay` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn relay() -> Command {
    let mut cmd = Command::cargo_bin("relay").unwrap();
    cmd.env_remove("RELAY_SERVER")
        .env_remove("RELAY_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_action_is_a_usage_error() {
    relay()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--upload"));
}

#[test]
fn two_actions_conflict() {
    relay()
        .args(["--list", "--hash", "file.txt"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn hash_prints_sha256() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, "hello").unwrap();

    relay()
        .arg("--hash")
        .arg(&path)
        .assert()
        .success()
        .stdout("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824\n");
}

#[test]
fn hash_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    relay()
        .arg("--hash")
        .arg(dir.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to hash"));
}

#[test]
fn list_against_unreachable_server_fails() {
    relay()
        .args(["--server", "http://127.0.0.1:1", "--list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list files"));
}

#[test]
fn verbose_logs_to_stderr() {
    relay()
        .args(["-v", "--server", "http://127.0.0.1:1", "--list"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Using relay http://127.0.0.1:1"));
}

#[test]
fn help_lists_actions() {
    relay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--download"))
        .stdout(predicate::str::contains("--list"));
}
