// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Corrective work orders raised from cached tickets.

use std::sync::Arc;

use fk_core::{Clock, CorrectiveRequest, JobKind, QueuedJob, Ticket};

use super::Submission;
use crate::error::{Error, Result};
use crate::sync::{OfflineQueue, Remote, SharedNetworkState, SharedProjection};

/// Ticket field holding the id of the last corrective work order raised from it.
pub const CORRECTIVE_WORK_ORDER_FIELD: &str = "correctiveWorkOrderId";

pub struct CorrectiveService {
    remote: Arc<dyn Remote>,
    queue: Arc<OfflineQueue>,
    cache: SharedProjection,
    network: Arc<SharedNetworkState>,
    clock: Arc<dyn Clock>,
    operator_id: String,
}

impl CorrectiveService {
    pub fn new(
        remote: Arc<dyn Remote>,
        queue: Arc<OfflineQueue>,
        cache: SharedProjection,
        network: Arc<SharedNetworkState>,
        clock: Arc<dyn Clock>,
        operator_id: impl Into<String>,
    ) -> Self {
        CorrectiveService {
            remote,
            queue,
            cache,
            network,
            clock,
            operator_id: operator_id.into(),
        }
    }

    /// Raises a corrective work order for a cached ticket.
    ///
    /// `note` replaces the ticket description in the work order.
    pub async fn create_from_ticket(
        &self,
        ticket_id: &str,
        note: Option<String>,
    ) -> Result<Submission<CorrectiveRequest>> {
        let ticket = self
            .cache
            .read()
            .ok()
            .and_then(|cache| cache.get(ticket_id).cloned())
            .ok_or_else(|| Error::TicketNotFound(ticket_id.to_string()))?;
        let request = CorrectiveRequest::from_ticket(&ticket, &self.operator_id, note);

        let mut cause = None;
        if !self.network.is_offline() {
            match self.remote.create_corrective(&request).await {
                Ok(ack) => {
                    tracing::info!(ticket_id, "corrective work order created");
                    let server_id = ack.map(|a| a.id);
                    if let Some(id) = &server_id {
                        self.mark_ticket(ticket, id);
                    }
                    return Ok(Submission::Synced {
                        server_id,
                        record: request,
                    });
                }
                Err(e) if e.is_permanent() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!(error = %e, "corrective work order not delivered, queueing");
                    cause = Some(e);
                }
            }
        }

        let job = QueuedJob::new(JobKind::CreateCorrective, &request, self.clock.now())?;
        if let Err(e) = self.queue.enqueue(job).await {
            tracing::warn!(error = %e, "queued corrective work order not persisted");
        }
        Ok(Submission::Queued {
            record: request,
            cause,
        })
    }

    /// Links the created work order to the cached ticket until the next
    /// pull replaces it.
    fn mark_ticket(&self, mut ticket: Ticket, work_order_id: &str) {
        ticket.updated_at = Some(self.clock.now());
        ticket.extra.insert(
            CORRECTIVE_WORK_ORDER_FIELD.to_string(),
            serde_json::Value::String(work_order_id.to_string()),
        );
        if let Ok(mut cache) = self.cache.write() {
            cache.upsert(ticket);
        }
    }
}

#[cfg(test)]
#[path = "corrective_tests.rs"]
mod tests;
