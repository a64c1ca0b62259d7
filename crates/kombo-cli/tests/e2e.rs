//! End-to-end tests for the kombo binary.
//!
//! These only exercise paths that fail before any tool is invoked, so they
//! never touch rustup, cargo or the network. Tool lookup is starved by
//! clearing `PATH` where a run needs to get past validation.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_flags() {
    Command::cargo_bin("kombo")
        .expect("Failed to find kombo binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--no-serve"))
        .stdout(predicate::str::contains("--assets"));
}

#[test]
fn test_missing_manifest_fails() {
    let temp = TempDir::new().unwrap();

    Command::cargo_bin("kombo")
        .expect("Failed to find kombo binary")
        .args(["--no-serve", "--project-dir"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cargo.toml"))
        .stderr(predicate::str::contains("hint"));

    assert!(!temp.path().join("web").exists(), "nothing may be staged");
}

#[test]
fn test_overlapping_staging_dir_fails() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").unwrap();

    Command::cargo_bin("kombo")
        .expect("Failed to find kombo binary")
        .args(["--no-serve", "--out-dir", "data", "--project-dir"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps"));
}

#[test]
fn test_invalid_port_fails() {
    Command::cargo_bin("kombo")
        .expect("Failed to find kombo binary")
        .args(["--port", "99999"])
        .assert()
        .failure();
}

#[test]
fn test_missing_toolchain_fails_provision_step() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Cargo.toml"), "[workspace]\n").unwrap();
    fs::create_dir_all(temp.path().join("data")).unwrap();

    Command::cargo_bin("kombo")
        .expect("Failed to find kombo binary")
        .args(["--no-serve", "--project-dir"])
        .arg(temp.path())
        .env("PATH", "")
        .env("CARGO_HOME", temp.path().join("cargo-home"))
        .env_remove("KOMBO_WASM_BINDGEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provision step failed"))
        .stderr(predicate::str::contains("rustup not found"))
        .stderr(predicate::str::contains("hint"));

    assert!(!temp.path().join("web").exists(), "nothing may be staged");
}
