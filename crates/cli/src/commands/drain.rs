// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::DrainReport;

use super::{block_on, Access, Context};

/// JSON output structure for the drain command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DrainOutputJson {
    completed: Vec<String>,
    dead_lettered: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    halted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    remaining: usize,
}

impl From<&DrainReport> for DrainOutputJson {
    fn from(report: &DrainReport) -> Self {
        DrainOutputJson {
            completed: report.completed.iter().map(|c| c.job.id.clone()).collect(),
            dead_lettered: report.dead_lettered.iter().map(|j| j.id.clone()).collect(),
            halted_at: report.halted.as_ref().map(|h| h.job_id.clone()),
            error: report.halted.as_ref().map(|h| h.error.to_string()),
            remaining: report.remaining,
        }
    }
}

pub fn run(output: OutputFormat) -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Write).await?;
        let report = ctx.engine.drain().await?;

        match output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(&DrainOutputJson::from(&report))?)
            }
            OutputFormat::Text => print_report(&report),
        }
        Ok(())
    })
}

fn print_report(report: &DrainReport) {
    println!("Replayed {} job(s)", report.completed.len());
    for job in &report.dead_lettered {
        println!("Dead-lettered {} ({})", job.id, job.kind);
    }
    if let Some(halt) = &report.halted {
        println!("Stopped at {} ({}): {}", halt.job_id, halt.kind, halt.error);
    }
    println!("Remaining: {}", report.remaining);
}
