// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reachability probe for hosts without platform network events.
//!
//! Polls the remote health endpoint and reports a [`NetworkState`] whenever
//! reachability changes. Any HTTP answer, including an error status, counts
//! as reachable.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::connectivity::NetworkState;
use super::remote::{Remote, RemoteError};

/// Polls `remote` every `interval` until cancelled or the receiver closes.
pub async fn run_probe(
    remote: Arc<dyn Remote>,
    interval: Duration,
    network_tx: mpsc::Sender<NetworkState>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval.max(Duration::from_secs(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last: Option<bool> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = remote.health() => result,
        };
        let reachable = match result {
            Ok(()) | Err(RemoteError::Status { .. }) => true,
            Err(e) => {
                tracing::debug!(error = %e, "health probe failed");
                false
            }
        };

        if last == Some(reachable) {
            continue;
        }
        last = Some(reachable);
        let state = if reachable {
            NetworkState::online()
        } else {
            NetworkState::offline()
        };
        if network_tx.send(state).await.is_err() {
            break;
        }
    }
    tracing::debug!("health probe stopped");
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
