// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for fk-core operations.

use thiserror::Error;

/// All possible errors that can occur in fk-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid date range: {start} is after {end}\n  hint: the start date must be on or before the end date")]
    InvalidDateRange { start: String, end: String },

    #[error("invalid status transition: cannot go from {from} to {to}\n  hint: from '{from}' you can go to: {valid_targets}")]
    InvalidTransition {
        from: String,
        to: String,
        valid_targets: String,
    },

    #[error("invalid vacation status: '{0}'\n  hint: valid statuses are: pending, approved, rejected, cancelled")]
    InvalidVacationStatus(String),

    #[error("invalid ticket status: '{0}'\n  hint: valid statuses are: open, assigned, in_progress, on_hold, resolved, closed")]
    InvalidTicketStatus(String),

    #[error("invalid sort order: '{0}'\n  hint: valid orders are: newest, oldest, priority")]
    InvalidSort(String),

    #[error("invalid payload for {kind} job: {reason}")]
    InvalidPayload { kind: String, reason: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for fk-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
