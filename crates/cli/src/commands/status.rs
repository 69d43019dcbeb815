// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{block_on, format_time, Access, Context};

pub fn run(output: OutputFormat) -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Read).await?;
        let status = ctx.engine.status().await;

        match output {
            OutputFormat::Text => {
                println!("Operator: {}", ctx.config.operator_id);
                println!("API: {}", ctx.config.api.base_url);
                println!("Pending sync: {}", status.pending_sync_count);
                println!("Dead letters: {}", status.dead_letter_count);
                println!("Cached tickets: {}", status.cached_tickets);
                println!("Last sync: {}", format_time(status.last_sync));
            }
            OutputFormat::Json => println!("{}", serde_json::to_string(&status)?),
        }
        Ok(())
    })
}
