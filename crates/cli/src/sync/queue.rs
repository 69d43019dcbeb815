// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent queue of jobs awaiting remote confirmation.
//!
//! The whole queue is stored as one JSON array under a single storage key
//! and rewritten on every mutation. All mutations go through one async
//! mutex that is held across the storage write, so two writers never race
//! to overwrite the list.
//!
//! The in-memory list is authoritative for the running process. When a
//! storage write fails the mutation still applies in memory and the error
//! is returned to the caller; the next successful write persists the full
//! list again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fk_core::QueuedJob;
use tokio::sync::Mutex;

use crate::storage::{KvStore, StoreError};

/// Default storage key of the queue.
pub const QUEUE_KEY: &str = "offline_queue";

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

struct QueueState {
    jobs: Vec<QueuedJob>,
    dead: Vec<QueuedJob>,
}

/// Durable FIFO of [`QueuedJob`]s with a dead-letter list.
pub struct OfflineQueue {
    store: Arc<dyn KvStore>,
    key: String,
    dead_key: String,
    state: Mutex<QueueState>,
    /// Set while the durable copy lags behind memory.
    dirty: AtomicBool,
}

impl OfflineQueue {
    /// Opens the queue stored under [`QUEUE_KEY`].
    pub async fn open(store: Arc<dyn KvStore>) -> QueueResult<Self> {
        Self::open_with_key(store, QUEUE_KEY).await
    }

    /// Opens the queue stored under `key`; dead letters live under `<key>.dead`.
    ///
    /// A missing key is an empty queue. Unreadable or corrupt storage is an
    /// error so it is never silently overwritten.
    pub async fn open_with_key(store: Arc<dyn KvStore>, key: &str) -> QueueResult<Self> {
        let dead_key = format!("{key}.dead");
        let jobs = load_list(store.as_ref(), key).await?;
        let dead = load_list(store.as_ref(), &dead_key).await?;

        tracing::debug!(
            pending = jobs.len(),
            dead = dead.len(),
            "opened offline queue"
        );

        Ok(OfflineQueue {
            store,
            key: key.to_string(),
            dead_key,
            state: Mutex::new(QueueState { jobs, dead }),
            dirty: AtomicBool::new(false),
        })
    }

    /// Appends a job to the end of the queue and persists the full list.
    ///
    /// On error the job is still queued in memory.
    pub async fn enqueue(&self, job: QueuedJob) -> QueueResult<()> {
        let mut state = self.state.lock().await;
        tracing::info!(job_id = %job.id, kind = %job.kind, "enqueued job");
        state.jobs.push(job);
        self.persist_jobs(&state.jobs).await
    }

    /// Removes the job with `job_id`. Returns whether a job was removed.
    ///
    /// Removing an absent id is a no-op and does not touch storage.
    pub async fn dequeue(&self, job_id: &str) -> QueueResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != job_id);
        if state.jobs.len() == before {
            return Ok(false);
        }
        self.persist_jobs(&state.jobs).await?;
        Ok(true)
    }

    /// Snapshot of the pending jobs in FIFO order.
    pub async fn list(&self) -> Vec<QueuedJob> {
        self.state.lock().await.jobs.clone()
    }

    /// Number of pending jobs.
    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.jobs.len()
    }

    /// Empties the queue. Diagnostics and reset only.
    pub async fn clear(&self) -> QueueResult<()> {
        let mut state = self.state.lock().await;
        tracing::warn!(dropped = state.jobs.len(), "clearing offline queue");
        state.jobs.clear();
        self.persist_jobs(&state.jobs).await
    }

    /// Records a permanent replay failure on a job.
    ///
    /// Returns the updated attempt count, or `None` if the job is gone.
    pub async fn record_failure(&self, job_id: &str, error: &str) -> QueueResult<Option<u32>> {
        let mut state = self.state.lock().await;
        let attempts = match state.jobs.iter_mut().find(|j| j.id == job_id) {
            Some(job) => {
                job.attempts = job.attempts.saturating_add(1);
                job.last_error = Some(error.to_string());
                job.attempts
            }
            None => return Ok(None),
        };
        self.persist_jobs(&state.jobs).await?;
        Ok(Some(attempts))
    }

    /// Moves a job from the queue to the dead-letter list.
    ///
    /// Returns the moved job, or `None` if it was not queued.
    pub async fn bury(&self, job_id: &str) -> QueueResult<Option<QueuedJob>> {
        let mut state = self.state.lock().await;
        let Some(pos) = state.jobs.iter().position(|j| j.id == job_id) else {
            return Ok(None);
        };
        let job = state.jobs.remove(pos);
        state.dead.push(job.clone());

        // Dead list first: a crash in between duplicates rather than loses.
        let dead = match serde_json::to_string(&state.dead) {
            Ok(json) => self.store.set(&self.dead_key, json).await.map_err(QueueError::from),
            Err(e) => Err(e.into()),
        };
        let jobs = self.persist_jobs(&state.jobs).await;
        if let Err(e) = &dead {
            self.dirty.store(true, Ordering::Release);
            tracing::error!(error = %e, "failed to persist dead-letter list");
        }
        dead.and(jobs)?;
        Ok(Some(job))
    }

    /// Snapshot of dead-lettered jobs.
    pub async fn dead_letters(&self) -> Vec<QueuedJob> {
        self.state.lock().await.dead.clone()
    }

    /// Returns true if the last write to storage failed.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    async fn persist_jobs(&self, jobs: &[QueuedJob]) -> QueueResult<()> {
        let result = match serde_json::to_string(jobs) {
            Ok(json) => self.store.set(&self.key, json).await.map_err(QueueError::from),
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(()) => self.dirty.store(false, Ordering::Release),
            Err(e) => {
                self.dirty.store(true, Ordering::Release);
                tracing::error!(error = %e, pending = jobs.len(), "failed to persist offline queue");
            }
        }
        result
    }
}

async fn load_list(store: &dyn KvStore, key: &str) -> QueueResult<Vec<QueuedJob>> {
    match store.get(key).await? {
        Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
