// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `fieldkit vacation`, `fieldkit tickets` and `fieldkit corrective`
//! against an unreachable server.

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

fn init_temp() -> TempDir {
    let state = TempDir::new().unwrap();
    fieldkit(&state)
        .args(["init", "--api-url", "http://127.0.0.1:9", "--operator", "op-7"])
        .assert()
        .success();
    state
}

#[test]
fn request_is_queued_and_listed_as_pending() {
    let state = init_temp();
    fieldkit(&state)
        .args([
            "vacation", "request", "--from", "2026-07-01", "--to", "2026-07-05", "-r", "trip",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(5 day(s)), queued"));

    fieldkit(&state)
        .args(["vacation", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2026-07-01 .. 2026-07-05"))
        .stdout(predicate::str::contains("[pending] [pending]"))
        .stdout(predicate::str::contains("trip"));
}

#[test]
fn list_json_carries_sync_status() {
    let state = init_temp();
    fieldkit(&state)
        .args(["vacation", "request", "--from", "2026-07-01", "--to", "2026-07-01"])
        .assert()
        .success();

    let output = fieldkit(&state)
        .args(["vacation", "list", "-o", "json"])
        .output()
        .unwrap();
    let requests: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["syncStatus"], "pending");
    assert_eq!(requests[0]["operatorId"], "op-7");
    assert!(requests[0].get("serverId").is_none());
}

#[test]
fn empty_list() {
    let state = init_temp();
    fieldkit(&state)
        .args(["vacation", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No vacation requests"));
}

#[test]
fn inverted_dates_are_rejected_before_queueing() {
    let state = init_temp();
    fieldkit(&state)
        .args(["vacation", "request", "--from", "2026-07-05", "--to", "2026-07-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date range"));

    fieldkit(&state)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending jobs"));
}

#[parameterized(
    slashes = { "2026/07/01" },
    words = { "next-monday" },
    impossible = { "2026-02-30" },
)]
fn malformed_date_is_rejected(from: &str) {
    let state = init_temp();
    fieldkit(&state)
        .args(["vacation", "request", "--from", from, "--to", "2026-07-05"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn status_change_of_unsynced_request_fails() {
    let state = init_temp();
    fieldkit(&state)
        .args(["vacation", "request", "--from", "2026-07-01", "--to", "2026-07-02"])
        .assert()
        .success();

    let output = fieldkit(&state)
        .args(["vacation", "list", "-o", "json"])
        .output()
        .unwrap();
    let requests: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    let id = requests[0]["localId"].as_str().unwrap().to_string();

    fieldkit(&state)
        .args(["vacation", "cancel", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has not reached the server yet"));
}

#[test]
fn tickets_empty_cache() {
    let state = init_temp();
    fieldkit(&state)
        .arg("tickets")
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached tickets"));
}

#[test]
fn tickets_reject_unknown_status() {
    let state = init_temp();
    fieldkit(&state)
        .args(["tickets", "-s", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ticket status"));
}

#[test]
fn corrective_for_uncached_ticket_fails() {
    let state = init_temp();
    fieldkit(&state)
        .args(["corrective", "t-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ticket not found: t-404"));
}
