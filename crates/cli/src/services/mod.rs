// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Optimistic domain operations.
//!
//! Each create first tries the remote. When the device is offline or the
//! remote fails transiently, the request is parked in the offline queue and
//! the caller gets a [`Submission::Queued`] result instead of an error.
//! Permanent rejections are returned as errors.

mod book;
mod corrective;
mod vacation;

pub use book::{VacationBook, VACATIONS_KEY};
pub use corrective::{CorrectiveService, CORRECTIVE_WORK_ORDER_FIELD};
pub use vacation::VacationService;

use crate::sync::RemoteError;

/// Result of an optimistic create.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<T> {
    /// The server accepted the request.
    Synced {
        record: T,
        server_id: Option<String>,
    },
    /// The request waits in the offline queue.
    Queued {
        record: T,
        /// The remote failure that forced queueing; `None` when offline.
        cause: Option<RemoteError>,
    },
}

impl<T> Submission<T> {
    pub fn record(&self) -> &T {
        match self {
            Submission::Synced { record, .. } | Submission::Queued { record, .. } => record,
        }
    }

    pub fn is_queued(&self) -> bool {
        matches!(self, Submission::Queued { .. })
    }
}
