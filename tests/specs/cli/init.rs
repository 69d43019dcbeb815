// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `fieldkit init` and `fieldkit status`.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn fieldkit(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("fieldkit");
    cmd.env("FIELDKIT_STATE_DIR", state.path())
        .env_remove("FIELDKIT_API_URL")
        .env_remove("FIELDKIT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn init(state: &TempDir) -> assert_cmd::assert::Assert {
    fieldkit(state)
        .args(["init", "--api-url", "http://127.0.0.1:9", "--operator", "op-7"])
        .assert()
}

#[test]
fn init_writes_config_and_data_dir() {
    let state = TempDir::new().unwrap();

    init(&state)
        .success()
        .stdout(predicate::str::contains("Initialized fieldkit at"))
        .stdout(predicate::str::contains("Operator: op-7"));

    let config = std::fs::read_to_string(state.path().join("config.toml")).unwrap();
    assert!(config.contains("operator_id = \"op-7\""));
    assert!(config.contains("http://127.0.0.1:9"));
    assert!(state.path().join("data").is_dir());
}

#[test]
fn init_twice_fails_without_force() {
    let state = TempDir::new().unwrap();
    init(&state).success();

    init(&state)
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_force_overwrites_operator() {
    let state = TempDir::new().unwrap();
    init(&state).success();

    fieldkit(&state)
        .args([
            "init",
            "--api-url",
            "http://127.0.0.1:9",
            "--operator",
            "op-8",
            "--force",
        ])
        .assert()
        .success();

    fieldkit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Operator: op-8"));
}

#[parameterized(
    no_scheme = { "api.example.com" },
    ftp = { "ftp://api.example.com" },
    bare_scheme = { "https://" },
)]
fn init_rejects_bad_url(url: &str) {
    let state = TempDir::new().unwrap();
    fieldkit(&state)
        .args(["init", "--api-url", url, "--operator", "op-7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL"));
    assert!(!state.path().join("config.toml").exists());
}

#[test]
fn init_rejects_blank_operator() {
    let state = TempDir::new().unwrap();
    fieldkit(&state)
        .args(["init", "--api-url", "http://127.0.0.1:9", "--operator", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn status_before_init_fails() {
    let state = TempDir::new().unwrap();
    fieldkit(&state)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn status_on_fresh_state() {
    let state = TempDir::new().unwrap();
    init(&state).success();

    fieldkit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending sync: 0"))
        .stdout(predicate::str::contains("Dead letters: 0"))
        .stdout(predicate::str::contains("Cached tickets: 0"))
        .stdout(predicate::str::contains("Last sync: never"));
}

#[test]
fn status_json_is_camel_case() {
    let state = TempDir::new().unwrap();
    init(&state).success();

    let output = fieldkit(&state)
        .args(["status", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pendingSyncCount"], 0);
    assert_eq!(json["cachedTickets"], 0);
    assert!(json["lastSync"].is_null());
}
