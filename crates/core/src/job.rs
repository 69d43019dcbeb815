// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued jobs: mutations awaiting remote confirmation.
//!
//! A job carries everything needed to replay one user mutation against the
//! remote service. The payload is kept as opaque JSON so the persisted queue
//! format does not change when a payload type grows a field.
//!
//! Persisted shape (one element of the queue array):
//!
//! ```json
//! {"id":"5b0c...","kind":"CreateVacationRequest","payload":{...},"createdAt":"2026-03-01T08:00:00Z"}
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Unique identifier for a queued job.
pub type JobId = String;

/// Generates a collision-resistant job identifier.
pub fn new_job_id() -> JobId {
    uuid::Uuid::new_v4().to_string()
}

/// The remote operation a job replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// Create a corrective work order derived from a ticket.
    CreateCorrective,
    /// Create a vacation request for an operator.
    CreateVacationRequest,
}

impl JobKind {
    /// Returns the kind's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::CreateCorrective => "CreateCorrective",
            JobKind::CreateVacationRequest => "CreateVacationRequest",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mutation waiting in the offline queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedJob {
    pub id: JobId,
    #[serde(alias = "type")]
    pub kind: JobKind,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    /// Replays that ended in a permanent (non-retriable) failure.
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl QueuedJob {
    /// Creates a job from a typed payload.
    pub fn new<P: Serialize>(kind: JobKind, payload: &P, created_at: DateTime<Utc>) -> Result<Self> {
        Ok(QueuedJob {
            id: new_job_id(),
            kind,
            payload: serde_json::to_value(payload)?,
            created_at,
            attempts: 0,
            last_error: None,
        })
    }

    /// Decodes the payload into the type the job's kind expects.
    pub fn decode_payload<P: DeserializeOwned>(&self) -> Result<P> {
        serde_json::from_value(self.payload.clone()).map_err(|e| Error::InvalidPayload {
            kind: self.kind.to_string(),
            reason: e.to_string(),
        })
    }

    /// Returns the local reference the payload was tagged with, if any.
    ///
    /// Payloads created by this crate carry a `clientRef` so a completed job
    /// can be matched back to its optimistic local record.
    pub fn client_ref(&self) -> Option<&str> {
        self.payload.get("clientRef").and_then(|v| v.as_str())
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
