// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tickets (assigned work orders) and the corrective requests derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::projection::Entity;

/// Lifecycle status of a ticket as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    Assigned,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::Assigned => "assigned",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::OnHold => "on_hold",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }

    /// Returns true if no more field work is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(TicketStatus::Open),
            "assigned" => Ok(TicketStatus::Assigned),
            "in_progress" => Ok(TicketStatus::InProgress),
            "on_hold" => Ok(TicketStatus::OnHold),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(Error::InvalidTicketStatus(s.to_string())),
        }
    }
}

/// Urgency of a ticket. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ticket assigned to the operator.
///
/// Fields the device does not interpret are preserved in `extra` so a
/// cached ticket round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Entity for Ticket {
    fn entity_id(&self) -> &str {
        &self.id
    }

    /// Shallow merge: fields present in `patch` overwrite, absent optional
    /// fields keep the cached value.
    fn merge(&mut self, patch: Ticket) {
        self.title = patch.title;
        self.status = patch.status;
        self.priority = patch.priority;
        self.created_at = patch.created_at;
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.asset_id.is_some() {
            self.asset_id = patch.asset_id;
        }
        if patch.location.is_some() {
            self.location = patch.location;
        }
        if patch.assigned_to.is_some() {
            self.assigned_to = patch.assigned_to;
        }
        if patch.updated_at.is_some() {
            self.updated_at = patch.updated_at;
        }
        self.extra.extend(patch.extra);
    }
}

/// Request body for creating a corrective work order from a ticket.
///
/// Also the payload of a queued `CreateCorrective` job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveRequest {
    /// Local reference for matching the queued job to its origin.
    pub client_ref: String,
    pub ticket_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub requested_by: String,
}

impl CorrectiveRequest {
    /// Derives a corrective work-order request from a ticket.
    ///
    /// `note` replaces the ticket description when given.
    pub fn from_ticket(ticket: &Ticket, requested_by: &str, note: Option<String>) -> Self {
        CorrectiveRequest {
            client_ref: format!("corrective-{}", uuid::Uuid::new_v4().simple()),
            ticket_id: ticket.id.clone(),
            title: format!("Corrective: {}", ticket.title),
            description: note.or_else(|| ticket.description.clone()),
            priority: ticket.priority,
            asset_id: ticket.asset_id.clone(),
            location: ticket.location.clone(),
            requested_by: requested_by.to_string(),
        }
    }
}

/// Server acknowledgment of a created work order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderAck {
    pub id: String,
}

#[cfg(test)]
#[path = "ticket_tests.rs"]
mod tests;
