// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `fieldkit queue`, `fieldkit drain` and offline queueing.
//!
//! The API URL points at the discard port so every request fails to
//! connect and lands in the queue.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fieldkit(state: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("fieldkit");
    cmd.env("FIELDKIT_STATE_DIR", state.path())
        .env_remove("FIELDKIT_API_URL")
        .env_remove("FIELDKIT_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn init_temp() -> TempDir {
    let state = TempDir::new().unwrap();
    fieldkit(&state)
        .args(["init", "--api-url", "http://127.0.0.1:9", "--operator", "op-7"])
        .assert()
        .success();
    state
}

fn request_vacation(state: &TempDir, from: &str, to: &str) {
    fieldkit(state)
        .args(["vacation", "request", "--from", from, "--to", to])
        .assert()
        .success()
        .stdout(predicate::str::contains("queued"));
}

#[test]
fn empty_queue_lists_nothing() {
    let state = init_temp();
    fieldkit(&state)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending jobs"));

    fieldkit(&state)
        .args(["queue", "dead"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dead-lettered jobs"));
}

#[test]
fn queued_requests_list_in_submission_order() {
    let state = init_temp();
    request_vacation(&state, "2026-07-01", "2026-07-03");
    request_vacation(&state, "2026-08-10", "2026-08-12");

    let output = fieldkit(&state)
        .args(["queue", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let jobs: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0]["kind"], "CreateVacationRequest");
    assert_eq!(jobs[0]["payload"]["startDate"], "2026-07-01");
    assert_eq!(jobs[1]["payload"]["startDate"], "2026-08-10");

    fieldkit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending sync: 2"));
}

#[test]
fn queue_survives_between_invocations_as_json_array() {
    let state = init_temp();
    request_vacation(&state, "2026-07-01", "2026-07-03");

    let dir = state.path().join("data");
    let raw = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| std::fs::read_to_string(e.path()).unwrap_or_default())
        .find(|content| content.contains("CreateVacationRequest"))
        .expect("queue file");
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(parsed.is_array());
}

#[test]
fn drain_while_server_unreachable_keeps_jobs() {
    let state = init_temp();
    request_vacation(&state, "2026-07-01", "2026-07-03");

    fieldkit(&state)
        .arg("drain")
        .assert()
        .success()
        .stdout(predicate::str::contains("Replayed 0 job(s)"))
        .stdout(predicate::str::contains("Remaining: 1"));

    fieldkit(&state)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending sync: 1"));
}

#[test]
fn clear_drops_pending_jobs() {
    let state = init_temp();
    request_vacation(&state, "2026-07-01", "2026-07-03");

    fieldkit(&state)
        .args(["queue", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 1 pending job(s)"));

    fieldkit(&state)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending jobs"));
}
