// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side filtering and sorting of ticket lists.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::projection::Projection;
use crate::ticket::{Ticket, TicketStatus};

/// Ordering applied to a ticket list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TicketSort {
    /// Newest first by creation time.
    #[default]
    Newest,
    Oldest,
    /// Most urgent first, newest first within a priority.
    Priority,
}

impl fmt::Display for TicketSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketSort::Newest => "newest",
            TicketSort::Oldest => "oldest",
            TicketSort::Priority => "priority",
        };
        f.write_str(s)
    }
}

impl FromStr for TicketSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "newest" => Ok(TicketSort::Newest),
            "oldest" => Ok(TicketSort::Oldest),
            "priority" => Ok(TicketSort::Priority),
            _ => Err(Error::InvalidSort(s.to_string())),
        }
    }
}

/// A filter + sort over cached tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    /// Keep only these statuses. Empty keeps all.
    pub statuses: Vec<TicketStatus>,
    /// Case-insensitive substring matched against title, description and asset.
    pub search: Option<String>,
    pub sort: TicketSort,
}

impl TicketQuery {
    /// Returns true if the ticket passes the filters.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&ticket.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                let hit = |field: Option<&str>| {
                    field.is_some_and(|f| f.to_lowercase().contains(&needle))
                };
                hit(Some(ticket.title.as_str()))
                    || hit(ticket.description.as_deref())
                    || hit(ticket.asset_id.as_deref())
            }
        }
    }

    /// Sorts tickets in place according to `self.sort`.
    pub fn sort(&self, tickets: &mut [Ticket]) {
        match self.sort {
            TicketSort::Newest => tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            TicketSort::Oldest => tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            TicketSort::Priority => tickets.sort_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
    }

    /// Applies the query to a projection, returning owned results.
    pub fn apply(&self, projection: &Projection<Ticket>) -> Vec<Ticket> {
        let mut out: Vec<Ticket> = projection
            .iter()
            .filter(|t| self.matches(t))
            .cloned()
            .collect();
        self.sort(&mut out);
        out
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
