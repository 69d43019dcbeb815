// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay of queued jobs against the remote.
//!
//! A drain pass walks a snapshot of the queue front to back. Each job is
//! removed only after the remote confirms it. The first failure stops the
//! pass so later jobs never overtake an earlier one, except that a job which
//! keeps failing permanently is moved to the dead-letter list once it reaches
//! the attempt limit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fk_core::{
    CorrectiveRequest, JobId, JobKind, NewVacationRequest, QueuedJob, VacationRequestDto,
    WorkOrderAck,
};

use super::error::{SyncError, SyncResult};
use super::queue::OfflineQueue;
use super::remote::{Remote, RemoteError};

/// Default number of permanent failures before a job is dead-lettered.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// What the remote returned for a replayed job.
#[derive(Debug, Clone, PartialEq)]
pub enum JobAck {
    Corrective(Option<WorkOrderAck>),
    Vacation(Option<VacationRequestDto>),
}

/// A job the remote confirmed during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedJob {
    pub job: QueuedJob,
    pub ack: JobAck,
}

/// Where a pass stopped early.
#[derive(Debug, Clone, PartialEq)]
pub struct Halt {
    pub job_id: JobId,
    pub kind: JobKind,
    pub error: RemoteError,
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrainReport {
    pub completed: Vec<CompletedJob>,
    pub dead_lettered: Vec<QueuedJob>,
    pub halted: Option<Halt>,
    /// Jobs still queued after the pass.
    pub remaining: usize,
}

impl DrainReport {
    /// Returns true if the pass reached the end of the queue.
    pub fn is_complete(&self) -> bool {
        self.halted.is_none()
    }
}

enum DispatchError {
    Payload(fk_core::Error),
    Remote(RemoteError),
}

/// Replays the offline queue in FIFO order.
pub struct Drainer {
    queue: Arc<OfflineQueue>,
    remote: Arc<dyn Remote>,
    max_attempts: u32,
    running: AtomicBool,
}

impl Drainer {
    pub fn new(queue: Arc<OfflineQueue>, remote: Arc<dyn Remote>, max_attempts: u32) -> Self {
        Drainer {
            queue,
            remote,
            max_attempts: max_attempts.max(1),
            running: AtomicBool::new(false),
        }
    }

    /// Returns true while a pass is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Runs one drain pass.
    ///
    /// Returns [`SyncError::DrainInProgress`] if another pass is running;
    /// at most one pass dispatches jobs at a time. Remote failures never
    /// surface as `Err`: they stop the pass and are reported in
    /// [`DrainReport::halted`]. Storage failures are logged and the pass
    /// carries on with the in-memory queue.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let _guard = DrainGuard::acquire(&self.running).ok_or(SyncError::DrainInProgress)?;

        let jobs = self.queue.list().await;
        let mut report = DrainReport::default();
        tracing::debug!(pending = jobs.len(), "drain pass started");

        for job in jobs {
            match self.dispatch(&job).await {
                Ok(ack) => {
                    if let Err(e) = self.queue.dequeue(&job.id).await {
                        // Removed in memory; a restart before the next write replays it.
                        tracing::warn!(job_id = %job.id, error = %e, "confirmed job not persisted as removed");
                    }
                    tracing::info!(job_id = %job.id, kind = %job.kind, "replayed job");
                    report.completed.push(CompletedJob { job, ack });
                }
                Err(DispatchError::Payload(e)) => {
                    tracing::error!(job_id = %job.id, error = %e, "dead-lettering job with unreadable payload");
                    self.bury(&job).await;
                    report.dead_lettered.push(job);
                }
                Err(DispatchError::Remote(error)) => {
                    if error.is_permanent() {
                        let attempts = self.record_failure(&job, &error).await;
                        if attempts >= self.max_attempts {
                            tracing::error!(
                                job_id = %job.id,
                                kind = %job.kind,
                                attempts,
                                error = %error,
                                "dead-lettering job after repeated permanent failures"
                            );
                            self.bury(&job).await;
                            report.dead_lettered.push(job);
                            continue;
                        }
                    }
                    tracing::warn!(
                        job_id = %job.id,
                        kind = %job.kind,
                        error = %error,
                        transient = error.is_transient(),
                        "drain halted"
                    );
                    report.halted = Some(Halt {
                        job_id: job.id.clone(),
                        kind: job.kind,
                        error,
                    });
                    break;
                }
            }
        }

        report.remaining = self.queue.pending_count().await;
        tracing::debug!(
            completed = report.completed.len(),
            dead = report.dead_lettered.len(),
            remaining = report.remaining,
            "drain pass finished"
        );
        Ok(report)
    }

    /// Counts a permanent failure. The in-memory count stands even when
    /// it cannot be written back.
    async fn record_failure(&self, job: &QueuedJob, error: &RemoteError) -> u32 {
        match self.queue.record_failure(&job.id, &error.to_string()).await {
            Ok(attempts) => attempts.unwrap_or(job.attempts.saturating_add(1)),
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "failure count not persisted");
                job.attempts.saturating_add(1)
            }
        }
    }

    async fn bury(&self, job: &QueuedJob) {
        if let Err(e) = self.queue.bury(&job.id).await {
            // Moved in memory; a restart before the next write brings it back.
            tracing::warn!(job_id = %job.id, error = %e, "dead-lettered job not persisted");
        }
    }

    async fn dispatch(&self, job: &QueuedJob) -> Result<JobAck, DispatchError> {
        match job.kind {
            JobKind::CreateCorrective => {
                let request: CorrectiveRequest =
                    job.decode_payload().map_err(DispatchError::Payload)?;
                self.remote
                    .create_corrective(&request)
                    .await
                    .map(JobAck::Corrective)
                    .map_err(DispatchError::Remote)
            }
            JobKind::CreateVacationRequest => {
                let request: NewVacationRequest =
                    job.decode_payload().map_err(DispatchError::Payload)?;
                self.remote
                    .create_vacation_request(&request)
                    .await
                    .map(JobAck::Vacation)
                    .map_err(DispatchError::Remote)
            }
        }
    }
}

/// Clears the running flag when a pass ends, including on early return.
struct DrainGuard<'a>(&'a AtomicBool);

impl<'a> DrainGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| DrainGuard(flag))
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
