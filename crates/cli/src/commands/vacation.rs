// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::NaiveDate;
use fk_core::{NewVacationRequest, VacationRequest, VacationStatus};

use crate::cli::{OutputFormat, VacationCommand};
use crate::error::{Error, Result};
use crate::services::Submission;

use super::{block_on, Access, Context};

pub fn run(command: VacationCommand) -> Result<()> {
    match command {
        VacationCommand::Request { from, to, reason } => request(&from, &to, reason),
        VacationCommand::List { output } => list(output),
        VacationCommand::Approve { id } => set_status(&id, VacationStatus::Approved),
        VacationCommand::Reject { id } => set_status(&id, VacationStatus::Rejected),
        VacationCommand::Cancel { id } => set_status(&id, VacationStatus::Cancelled),
    }
}

/// Parses a `YYYY-MM-DD` date argument.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

fn request(from: &str, to: &str, reason: Option<String>) -> Result<()> {
    let start = parse_date(from)?;
    let end = parse_date(to)?;

    block_on(async {
        let ctx = Context::open(Access::Write).await?;
        let request = NewVacationRequest::new(ctx.config.operator_id.clone(), start, end, reason)?;
        let days = request.days();

        match ctx.engine.vacations().submit(request).await? {
            Submission::Synced { record, .. } => {
                println!("Requested {} ({} day(s)), synced", record.id(), days);
            }
            Submission::Queued { record, cause } => {
                println!("Requested {} ({} day(s)), queued", record.id(), days);
                if let Some(cause) = cause {
                    println!("  server unreachable: {}", cause);
                }
            }
        }
        Ok(())
    })
}

fn list(output: OutputFormat) -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Read).await?;
        let requests = ctx.engine.vacations().list().await;

        match output {
            OutputFormat::Json => println!("{}", serde_json::to_string(&requests)?),
            OutputFormat::Text if requests.is_empty() => println!("No vacation requests"),
            OutputFormat::Text => {
                for request in &requests {
                    println!("{}", format_request_line(request));
                }
            }
        }
        Ok(())
    })
}

fn set_status(id: &str, target: VacationStatus) -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Write).await?;
        ctx.engine.vacations().set_status(id, target).await?;
        println!("{} {}", id, target);
        Ok(())
    })
}

pub(crate) fn format_request_line(request: &VacationRequest) -> String {
    let mut line = format!(
        "{}  {} .. {}  [{}] [{}]",
        request.id(),
        request.start_date,
        request.end_date,
        request.status,
        request.sync_status
    );
    if let Some(reason) = &request.reason {
        line.push_str(&format!("  {}", reason));
    }
    line
}

#[cfg(test)]
#[path = "vacation_tests.rs"]
mod tests;
