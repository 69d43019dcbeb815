// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fk_core::{Ticket, TicketQuery, TicketSort, TicketStatus};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{block_on, Access, Context};

/// Builds a query from command-line values.
pub(crate) fn build_query(
    status: &[String],
    search: Option<String>,
    sort: &str,
) -> Result<TicketQuery> {
    let statuses = status
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<TicketStatus>())
        .collect::<fk_core::Result<Vec<_>>>()?;
    Ok(TicketQuery {
        statuses,
        search,
        sort: sort.parse::<TicketSort>()?,
    })
}

pub fn run(
    status: Vec<String>,
    search: Option<String>,
    sort: String,
    output: OutputFormat,
) -> Result<()> {
    let query = build_query(&status, search, &sort)?;
    block_on(async {
        let ctx = Context::open(Access::Read).await?;
        let tickets = ctx.engine.tickets(&query);

        match output {
            OutputFormat::Json => println!("{}", serde_json::to_string(&tickets)?),
            OutputFormat::Text if tickets.is_empty() => println!("No cached tickets"),
            OutputFormat::Text => {
                for ticket in &tickets {
                    println!("{}", format_ticket_line(ticket));
                }
            }
        }
        Ok(())
    })
}

pub(crate) fn format_ticket_line(ticket: &Ticket) -> String {
    let mut line = format!(
        "{}  [{}] [{}] {}",
        ticket.id, ticket.status, ticket.priority, ticket.title
    );
    if let Some(asset) = &ticket.asset_id {
        line.push_str(&format!(" ({})", asset));
    }
    line
}

#[cfg(test)]
#[path = "tickets_tests.rs"]
mod tests;
