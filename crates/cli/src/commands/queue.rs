// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use fk_core::QueuedJob;

use crate::cli::{OutputFormat, QueueCommand};
use crate::error::Result;

use super::{block_on, format_time, Access, Context};

pub fn run(command: QueueCommand) -> Result<()> {
    match command {
        QueueCommand::List { output } => block_on(async {
            let ctx = Context::open(Access::Read).await?;
            let jobs = ctx.engine.queue().list().await;
            print_jobs(&jobs, output, "No pending jobs")
        }),
        QueueCommand::Dead { output } => block_on(async {
            let ctx = Context::open(Access::Read).await?;
            let jobs = ctx.engine.queue().dead_letters().await;
            print_jobs(&jobs, output, "No dead-lettered jobs")
        }),
        QueueCommand::Clear => block_on(async {
            let ctx = Context::open(Access::Write).await?;
            let dropped = ctx.engine.queue().pending_count().await;
            ctx.engine.queue().clear().await?;
            println!("Cleared {} pending job(s)", dropped);
            Ok(())
        }),
    }
}

fn print_jobs(jobs: &[QueuedJob], output: OutputFormat, empty: &str) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(jobs)?),
        OutputFormat::Text if jobs.is_empty() => println!("{}", empty),
        OutputFormat::Text => {
            for job in jobs {
                println!("{}", format_job_line(job));
            }
        }
    }
    Ok(())
}

/// One line per job: id, kind, queued time, attempts and last error.
pub(crate) fn format_job_line(job: &QueuedJob) -> String {
    let mut line = format!(
        "{}  {}  queued {}",
        job.id,
        job.kind,
        format_time(Some(job.created_at))
    );
    if job.attempts > 0 {
        line.push_str(&format!("  attempts {}", job.attempts));
    }
    if let Some(err) = &job.last_error {
        line.push_str(&format!("  last error: {}", err));
    }
    line
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
