// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Vacation requests: the reference entity for optimistic, queued mutations.
//!
//! A request is created locally with a temporary id, then either confirmed
//! by the server (gaining a server id) or parked in the offline queue.
//! Approval and rejection are server-authoritative.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix of locally generated, not yet confirmed request ids.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Generates a temporary id for a request that has not reached the server.
pub fn new_local_id() -> String {
    format!("{}{}", LOCAL_ID_PREFIX, uuid::Uuid::new_v4().simple())
}

/// Approval workflow status of a vacation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationStatus {
    /// Awaiting a decision. Initial state.
    Pending,
    Approved,
    Rejected,
    /// Withdrawn by the operator or a supervisor.
    Cancelled,
}

impl VacationStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            VacationStatus::Pending => "pending",
            VacationStatus::Approved => "approved",
            VacationStatus::Rejected => "rejected",
            VacationStatus::Cancelled => "cancelled",
        }
    }

    /// Check if a transition from this status to target is valid.
    ///
    /// Pending can be decided or cancelled; an approved request can still be
    /// cancelled. Rejected and cancelled are terminal.
    pub fn can_transition_to(&self, target: VacationStatus) -> bool {
        matches!(
            (self, target),
            (
                VacationStatus::Pending,
                VacationStatus::Approved | VacationStatus::Rejected | VacationStatus::Cancelled
            ) | (VacationStatus::Approved, VacationStatus::Cancelled)
        )
    }

    /// Get valid transition targets as a formatted string.
    pub fn valid_targets(&self) -> String {
        match self {
            VacationStatus::Pending => "approved, rejected, cancelled".to_string(),
            VacationStatus::Approved => "cancelled".to_string(),
            VacationStatus::Rejected | VacationStatus::Cancelled => "none".to_string(),
        }
    }

    /// Validates a transition, returning the target on success.
    pub fn transition_to(&self, target: VacationStatus) -> Result<VacationStatus> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(Error::InvalidTransition {
                from: self.to_string(),
                to: target.to_string(),
                valid_targets: self.valid_targets(),
            })
        }
    }
}

impl fmt::Display for VacationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VacationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(VacationStatus::Pending),
            "approved" => Ok(VacationStatus::Approved),
            "rejected" => Ok(VacationStatus::Rejected),
            "cancelled" | "canceled" => Ok(VacationStatus::Cancelled),
            _ => Err(Error::InvalidVacationStatus(s.to_string())),
        }
    }
}

/// Whether local state has been confirmed by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    /// Waiting in the offline queue.
    Pending,
    /// Rejected by the server or dead-lettered; will not be retried.
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Pending => "pending",
            SyncStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for creating a vacation request remotely.
///
/// Also the payload of a queued `CreateVacationRequest` job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVacationRequest {
    /// Local id of the optimistic record this request belongs to.
    pub client_ref: String,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl NewVacationRequest {
    /// Builds a request with a fresh local reference, validating its fields.
    pub fn new(
        operator_id: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<Self> {
        let request = NewVacationRequest {
            client_ref: new_local_id(),
            operator_id: operator_id.into(),
            start_date,
            end_date,
            reason: reason.filter(|r| !r.trim().is_empty()),
        };
        request.validate()?;
        Ok(request)
    }

    /// Checks the date range and operator identity.
    pub fn validate(&self) -> Result<()> {
        if self.operator_id.trim().is_empty() {
            return Err(Error::InvalidInput("operator id is empty".to_string()));
        }
        if self.start_date > self.end_date {
            return Err(Error::InvalidDateRange {
                start: self.start_date.to_string(),
                end: self.end_date.to_string(),
            });
        }
        Ok(())
    }

    /// Number of calendar days covered, both ends inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Server representation of a vacation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequestDto {
    pub id: String,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: VacationStatus,
}

/// A vacation request as tracked on the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationRequest {
    /// Temporary id assigned at creation. Never changes.
    pub local_id: String,
    /// Id assigned by the server once synced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    pub operator_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: VacationStatus,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
}

impl VacationRequest {
    /// Creates the optimistic local record for a new request.
    pub fn optimistic(request: &NewVacationRequest, created_at: DateTime<Utc>) -> Self {
        VacationRequest {
            local_id: request.client_ref.clone(),
            server_id: None,
            operator_id: request.operator_id.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            reason: request.reason.clone(),
            status: VacationStatus::Pending,
            sync_status: SyncStatus::Pending,
            created_at,
        }
    }

    /// Builds a record for a request first seen on the server.
    pub fn from_dto(dto: &VacationRequestDto, created_at: DateTime<Utc>) -> Self {
        VacationRequest {
            local_id: dto.id.clone(),
            server_id: Some(dto.id.clone()),
            operator_id: dto.operator_id.clone(),
            start_date: dto.start_date,
            end_date: dto.end_date,
            reason: dto.reason.clone(),
            status: dto.status,
            sync_status: SyncStatus::Synced,
            created_at,
        }
    }

    /// The id to show and to address the request by: server id when known.
    pub fn id(&self) -> &str {
        self.server_id.as_deref().unwrap_or(&self.local_id)
    }

    /// Returns true if `id` names this request (either id form).
    pub fn matches(&self, id: &str) -> bool {
        self.local_id == id || self.server_id.as_deref() == Some(id)
    }

    /// Applies the server's confirmation.
    pub fn confirm(&mut self, dto: &VacationRequestDto) {
        self.server_id = Some(dto.id.clone());
        self.status = dto.status;
        self.sync_status = SyncStatus::Synced;
    }
}

#[cfg(test)]
#[path = "vacation_tests.rs"]
mod tests;
