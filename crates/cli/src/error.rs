// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::storage::StoreError;
use crate::sync::{QueueError, RemoteError, SyncError};

/// All possible errors that can occur in the fkrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'fieldkit init' first\n  hint: no config found at {0}")]
    NotInitialized(String),

    #[error("already initialized at {0}\n  hint: pass --force to overwrite the config")]
    AlreadyInitialized(String),

    #[error("ticket not found: {0}\n  hint: run 'fieldkit pull' to refresh cached tickets")]
    TicketNotFound(String),

    #[error("vacation request not found: {0}")]
    VacationNotFound(String),

    #[error("vacation request {0} has not reached the server yet\n  hint: run 'fieldkit drain' once online")]
    NotSynced(String),

    #[error("{operation} requires a connection to the server")]
    Offline { operation: &'static str },

    #[error("state directory is in use by another fieldkit process: {0}")]
    Locked(String),

    #[error("invalid date '{0}'\n  hint: use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid URL '{0}'\n  hint: the API URL must start with http:// or https://")]
    InvalidUrl(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] fk_core::Error),

    #[error("server error: {0}")]
    Remote(#[from] RemoteError),

    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for fkrs operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
