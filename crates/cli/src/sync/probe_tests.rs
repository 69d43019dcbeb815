// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::sync::test_helpers::MockRemote;
use super::*;

#[tokio::test(start_paused = true)]
async fn test_probe_reports_only_changes() {
    let remote = MockRemote::new();
    let (tx, mut rx) = mpsc::channel(8);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run_probe(
        remote.clone(),
        Duration::from_secs(15),
        tx,
        cancel.clone(),
    ));

    assert_eq!(rx.recv().await, Some(NetworkState::online()));

    // Still online after several polls: nothing new.
    tokio::time::sleep(Duration::from_secs(40)).await;
    assert!(rx.try_recv().is_err());

    remote.set_offline(true);
    assert_eq!(rx.recv().await, Some(NetworkState::offline()));

    remote.set_offline(false);
    assert_eq!(rx.recv().await, Some(NetworkState::online()));

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_probe_stops_when_receiver_closes() {
    let remote = MockRemote::new();
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    run_probe(remote, Duration::from_secs(15), tx, CancellationToken::new()).await;
}
