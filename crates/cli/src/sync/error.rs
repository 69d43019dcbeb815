// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fk_core::JobId;

use super::queue::QueueError;
use super::remote::RemoteError;
use crate::storage::StoreError;

/// Error type for background sync operations (drain and pull).
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote call failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Another drain pass holds the queue.
    #[error("a drain is already in progress")]
    DrainInProgress,

    /// A queued job's payload no longer decodes.
    #[error("job {job_id} has an unreadable payload: {source}")]
    Payload {
        job_id: JobId,
        #[source]
        source: fk_core::Error,
    },
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
