// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: owns the queue, caches and background loops.
//!
//! All collaborators are injected at construction, so tests run the whole
//! engine against a [`crate::storage::MemoryStore`] and a mock remote.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use fk_core::{Clock, JobKind, QueuedJob, SyncStatus, Ticket, TicketQuery};
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::Result;
use crate::services::{CorrectiveService, VacationBook, VacationService};
use crate::storage::KvStore;
use crate::sync::{
    load_snapshot, AppState, ConnectivityObserver, DrainReport, Drainer, JobAck, NetworkState,
    OfflineQueue, PullRefresher, Remote, SharedNetworkState, SharedProjection, SyncError,
    SyncResult, Trigger,
};

/// Tunables the engine needs from configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub operator_id: String,
    pub refresh_interval: Duration,
    pub drain_interval: Duration,
    pub max_attempts: u32,
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        EngineOptions {
            operator_id: config.operator_id.clone(),
            refresh_interval: config.sync.refresh_interval(),
            drain_interval: config.sync.drain_interval(),
            max_attempts: config.sync.max_attempts,
        }
    }
}

/// Point-in-time view for status displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSnapshot {
    pub pending_sync_count: usize,
    pub dead_letter_count: usize,
    pub cached_tickets: usize,
    pub last_sync: Option<DateTime<Utc>>,
    pub network: &'static str,
    /// False while the latest queue write has not reached storage.
    pub queue_durable: bool,
}

pub struct SyncEngine {
    options: EngineOptions,
    remote: Arc<dyn Remote>,
    clock: Arc<dyn Clock>,
    queue: Arc<OfflineQueue>,
    book: Arc<VacationBook>,
    cache: SharedProjection,
    network: Arc<SharedNetworkState>,
    drainer: Drainer,
    refresher: PullRefresher,
}

impl SyncEngine {
    /// Loads persisted state and wires the components together.
    pub async fn open(
        options: EngineOptions,
        store: Arc<dyn KvStore>,
        remote: Arc<dyn Remote>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let queue = Arc::new(OfflineQueue::open(Arc::clone(&store)).await?);
        let book = Arc::new(VacationBook::open(Arc::clone(&store)).await?);
        let cache: SharedProjection = Arc::new(RwLock::new(load_snapshot(store.as_ref()).await));
        let network = Arc::new(SharedNetworkState::new());

        let drainer = Drainer::new(
            Arc::clone(&queue),
            Arc::clone(&remote),
            options.max_attempts,
        );
        let refresher = PullRefresher::new(
            Arc::clone(&remote),
            Arc::clone(&cache),
            Arc::clone(&clock),
            store,
            Arc::clone(&network),
            options.operator_id.clone(),
            options.refresh_interval,
        );

        Ok(SyncEngine {
            options,
            remote,
            clock,
            queue,
            book,
            cache,
            network,
            drainer,
            refresher,
        })
    }

    pub fn vacations(&self) -> VacationService {
        VacationService::new(
            Arc::clone(&self.remote),
            Arc::clone(&self.queue),
            Arc::clone(&self.book),
            Arc::clone(&self.network),
            Arc::clone(&self.clock),
        )
    }

    pub fn correctives(&self) -> CorrectiveService {
        CorrectiveService::new(
            Arc::clone(&self.remote),
            Arc::clone(&self.queue),
            Arc::clone(&self.cache),
            Arc::clone(&self.network),
            Arc::clone(&self.clock),
            self.options.operator_id.clone(),
        )
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn network(&self) -> &SharedNetworkState {
        &self.network
    }

    /// Records a network report without going through the observer.
    pub fn set_network(&self, state: NetworkState) {
        self.network.update(state);
    }

    /// Runs one drain pass and folds the results into local records.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let report = self.drainer.drain().await?;
        self.reconcile(&report).await;
        Ok(report)
    }

    async fn reconcile(&self, report: &DrainReport) {
        for completed in &report.completed {
            if let (Some(local_id), JobAck::Vacation(dto)) =
                (completed.job.client_ref(), &completed.ack)
            {
                self.book
                    .update(local_id, |record| match dto {
                        Some(dto) => record.confirm(dto),
                        None => record.sync_status = SyncStatus::Synced,
                    })
                    .await;
            }
        }
        for job in &report.dead_lettered {
            self.mark_failed(job).await;
        }
    }

    async fn mark_failed(&self, job: &QueuedJob) {
        if job.kind != JobKind::CreateVacationRequest {
            return;
        }
        if let Some(local_id) = job.client_ref() {
            self.book
                .update(local_id, |record| record.sync_status = SyncStatus::Failed)
                .await;
        }
    }

    /// Pulls tickets into the read cache.
    pub async fn pull(&self) -> SyncResult<usize> {
        self.refresher.pull().await
    }

    /// Cached tickets matching `query`.
    pub fn tickets(&self, query: &TicketQuery) -> Vec<Ticket> {
        self.cache
            .read()
            .map(|cache| query.apply(&cache))
            .unwrap_or_default()
    }

    pub fn ticket(&self, id: &str) -> Option<Ticket> {
        self.cache.read().ok()?.get(id).cloned()
    }

    pub async fn status(&self) -> SyncSnapshot {
        let (cached_tickets, last_sync) = self
            .cache
            .read()
            .map(|c| (c.len(), c.last_sync()))
            .unwrap_or((0, None));
        SyncSnapshot {
            pending_sync_count: self.queue.pending_count().await,
            dead_letter_count: self.queue.dead_letters().await.len(),
            cached_tickets,
            last_sync,
            network: self.network.status_string(),
            queue_durable: !self.queue.is_dirty(),
        }
    }

    /// Runs the background loops until cancelled.
    ///
    /// Network reports and app lifecycle changes drive drains and periodic
    /// pulls. While online, a drain also runs every drain interval when jobs
    /// are pending.
    pub async fn run(
        self: Arc<Self>,
        network_rx: mpsc::Receiver<NetworkState>,
        app_rx: mpsc::Receiver<AppState>,
        cancel: CancellationToken,
    ) {
        let (trigger_tx, mut trigger_rx) = mpsc::channel(16);
        let (active_tx, active_rx) = watch::channel(false);
        let tasks = cancel.child_token();

        let observer = ConnectivityObserver::new(Arc::clone(&self.network));
        let observer_task =
            tokio::spawn(observer.run(network_rx, app_rx, trigger_tx, tasks.clone()));

        let refresh_task = {
            let engine = Arc::clone(&self);
            let tasks = tasks.clone();
            tokio::spawn(async move { engine.refresher.run(active_rx, tasks).await })
        };

        let interval = self.options.drain_interval;
        let mut drain_ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        drain_ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!("sync engine started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                trigger = trigger_rx.recv() => match trigger {
                    Some(Trigger::Drain) => self.spawn_drain(),
                    Some(Trigger::Foreground) => {
                        let _ = active_tx.send(true);
                    }
                    Some(Trigger::Background) => {
                        let _ = active_tx.send(false);
                    }
                    None => break,
                },
                _ = drain_ticker.tick() => {
                    if self.network.is_online() && self.queue.pending_count().await > 0 {
                        self.spawn_drain();
                    }
                }
            }
        }

        tasks.cancel();
        let _ = active_tx.send(false);
        let _ = tokio::join!(observer_task, refresh_task);
        tracing::info!("sync engine stopped");
    }

    fn spawn_drain(self: &Arc<Self>) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            match engine.drain().await {
                Ok(report) => tracing::info!(
                    completed = report.completed.len(),
                    dead = report.dead_lettered.len(),
                    remaining = report.remaining,
                    "drain finished"
                ),
                Err(SyncError::DrainInProgress) => tracing::debug!("drain already running"),
                Err(e) => tracing::warn!(error = %e, "drain failed"),
            }
        });
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
