// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Vacation request workflow.

use std::sync::Arc;

use fk_core::{
    Clock, JobKind, NewVacationRequest, QueuedJob, SyncStatus, VacationRequest, VacationStatus,
};

use super::book::VacationBook;
use super::Submission;
use crate::error::{Error, Result};
use crate::sync::{OfflineQueue, Remote, SharedNetworkState};

/// Submits vacation requests optimistically and applies status changes.
pub struct VacationService {
    remote: Arc<dyn Remote>,
    queue: Arc<OfflineQueue>,
    book: Arc<VacationBook>,
    network: Arc<SharedNetworkState>,
    clock: Arc<dyn Clock>,
}

impl VacationService {
    pub fn new(
        remote: Arc<dyn Remote>,
        queue: Arc<OfflineQueue>,
        book: Arc<VacationBook>,
        network: Arc<SharedNetworkState>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        VacationService {
            remote,
            queue,
            book,
            network,
            clock,
        }
    }

    /// Submits a new request.
    ///
    /// The local record is stored before this returns, whatever the outcome:
    /// synced when the server accepted it, pending when it was queued, failed
    /// when the server rejected it (the rejection is returned as an error).
    pub async fn submit(&self, request: NewVacationRequest) -> Result<Submission<VacationRequest>> {
        request.validate()?;
        let now = self.clock.now();
        let mut record = VacationRequest::optimistic(&request, now);

        let mut cause = None;
        if !self.network.is_offline() {
            match self.remote.create_vacation_request(&request).await {
                Ok(dto) => {
                    match &dto {
                        Some(dto) => record.confirm(dto),
                        None => record.sync_status = SyncStatus::Synced,
                    }
                    self.book.insert(record.clone()).await;
                    tracing::info!(id = %record.id(), "vacation request created");
                    return Ok(Submission::Synced {
                        server_id: record.server_id.clone(),
                        record,
                    });
                }
                Err(e) if e.is_permanent() => {
                    record.sync_status = SyncStatus::Failed;
                    self.book.insert(record).await;
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "vacation request not delivered, queueing");
                    cause = Some(e);
                }
            }
        }

        let job = QueuedJob::new(JobKind::CreateVacationRequest, &request, now)?;
        self.book.insert(record.clone()).await;
        if let Err(e) = self.queue.enqueue(job).await {
            // Still queued in memory; replayed if this process lives to drain.
            tracing::warn!(error = %e, "queued vacation request not persisted");
        }
        Ok(Submission::Queued { record, cause })
    }

    /// Moves a request to `target` on the server, then locally.
    ///
    /// Online only. The transition is checked locally first when the
    /// request is known; the server stays authoritative either way.
    pub async fn set_status(
        &self,
        id: &str,
        target: VacationStatus,
    ) -> Result<Option<VacationRequest>> {
        let known = self.book.get(id).await;
        let server_id = match &known {
            Some(record) => {
                record.status.transition_to(target)?;
                record
                    .server_id
                    .clone()
                    .ok_or_else(|| Error::NotSynced(id.to_string()))?
            }
            None => id.to_string(),
        };

        if self.network.is_offline() {
            return Err(Error::Offline {
                operation: "changing a vacation request",
            });
        }

        let dto = self.remote.set_vacation_status(&server_id, target).await?;
        tracing::info!(id = %server_id, status = %target, "vacation request updated");

        if known.is_some() {
            return Ok(self
                .book
                .update(&server_id, |record| match &dto {
                    Some(dto) => record.confirm(dto),
                    None => record.status = target,
                })
                .await);
        }

        match dto {
            Some(dto) => {
                let record = VacationRequest::from_dto(&dto, self.clock.now());
                self.book.insert(record.clone()).await;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// All locally known requests, newest first.
    pub async fn list(&self) -> Vec<VacationRequest> {
        self.book.list().await
    }
}

#[cfg(test)]
#[path = "vacation_tests.rs"]
mod tests;
