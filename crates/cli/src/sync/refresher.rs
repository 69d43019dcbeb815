// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic pull of assigned tickets into the read cache.
//!
//! Pulls run every refresh interval while the app is active, plus once on
//! activation when the cache is older than one interval. A failed pull
//! leaves the cache exactly as it was.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use fk_core::{Clock, Projection, Ticket};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::connectivity::SharedNetworkState;
use super::error::SyncResult;
use super::remote::Remote;
use crate::storage::KvStore;

/// Default time between periodic pulls.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Storage key of the ticket cache snapshot.
pub const TICKETS_KEY: &str = "tickets_cache";

/// The ticket read cache shared between the refresher and readers.
pub type SharedProjection = Arc<RwLock<Projection<Ticket>>>;

/// Pulls remote tickets into the shared projection.
pub struct PullRefresher {
    remote: Arc<dyn Remote>,
    cache: SharedProjection,
    clock: Arc<dyn Clock>,
    store: Arc<dyn KvStore>,
    network: Arc<SharedNetworkState>,
    operator_id: String,
    interval: Duration,
}

impl PullRefresher {
    pub fn new(
        remote: Arc<dyn Remote>,
        cache: SharedProjection,
        clock: Arc<dyn Clock>,
        store: Arc<dyn KvStore>,
        network: Arc<SharedNetworkState>,
        operator_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        PullRefresher {
            remote,
            cache,
            clock,
            store,
            network,
            operator_id: operator_id.into(),
            interval: interval.max(Duration::from_secs(1)),
        }
    }

    /// Fetches all tickets and replaces the cache, newest first.
    ///
    /// Returns the number of cached tickets. On error the cache and its
    /// last-sync time are untouched.
    pub async fn pull(&self) -> SyncResult<usize> {
        let mut tickets = match self.remote.list_tickets(&self.operator_id).await {
            Ok(tickets) => tickets,
            Err(e) => {
                tracing::warn!(error = %e, "ticket pull failed, keeping cached tickets");
                return Err(e.into());
            }
        };
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let (count, snapshot) = {
            let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
            cache.replace_all(tickets, self.clock.now());
            (cache.len(), serde_json::to_string(&*cache))
        };

        match snapshot {
            Ok(json) => {
                if let Err(e) = self.store.set(TICKETS_KEY, json).await {
                    tracing::warn!(error = %e, "failed to persist ticket cache");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize ticket cache"),
        }

        tracing::info!(tickets = count, "pulled tickets");
        Ok(count)
    }

    /// Returns true if the cache was never synced or is older than one interval.
    pub fn is_stale(&self) -> bool {
        let last = self
            .cache
            .read()
            .ok()
            .and_then(|c| c.last_sync());
        match last {
            None => true,
            Some(last) => {
                let max_age = chrono::Duration::from_std(self.interval)
                    .unwrap_or_else(|_| chrono::Duration::days(365));
                self.clock.now() - last >= max_age
            }
        }
    }

    async fn pull_if_online(&self) {
        if self.network.is_offline() {
            tracing::debug!("skipping ticket pull while offline");
            return;
        }
        // Errors are logged by pull.
        let _ = self.pull().await;
    }

    /// Runs periodic pulls while `active` is true, until cancelled.
    pub async fn run(&self, mut active: watch::Receiver<bool>, cancel: CancellationToken) {
        loop {
            // Paused: wait for activation.
            loop {
                let is_active = *active.borrow_and_update();
                if is_active {
                    break;
                }
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    changed = active.changed() => if changed.is_err() { return },
                }
            }

            if self.is_stale() {
                self.pull_if_online().await;
            }

            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = ticker.tick() => self.pull_if_online().await,
                    changed = active.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        let is_active = *active.borrow_and_update();
                        if !is_active {
                            tracing::debug!("periodic pulls paused");
                            break;
                        }
                    }
                }
            }
        }
    }
}

/// Loads the persisted ticket snapshot; empty when absent or unreadable.
pub async fn load_snapshot(store: &dyn KvStore) -> Projection<Ticket> {
    match store.get(TICKETS_KEY).await {
        Ok(Some(raw)) => match serde_json::from_str::<Projection<Ticket>>(&raw) {
            Ok(projection) if projection.is_consistent() => projection,
            Ok(_) => {
                tracing::warn!("discarding inconsistent ticket snapshot");
                Projection::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable ticket snapshot");
                Projection::new()
            }
        },
        Ok(None) => Projection::new(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read ticket snapshot");
            Projection::new()
        }
    }
}

#[cfg(test)]
#[path = "refresher_tests.rs"]
mod tests;
