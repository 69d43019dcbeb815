// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;
use crate::services::Submission;

use super::{block_on, Access, Context};

pub fn run(ticket_id: String, note: Option<String>) -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Write).await?;
        match ctx
            .engine
            .correctives()
            .create_from_ticket(&ticket_id, note)
            .await?
        {
            Submission::Synced { server_id, .. } => match server_id {
                Some(id) => println!("Created work order {} for {}", id, ticket_id),
                None => println!("Created work order for {}", ticket_id),
            },
            Submission::Queued { cause, .. } => {
                println!("Queued work order for {}", ticket_id);
                if let Some(cause) = cause {
                    println!("  server unreachable: {}", cause);
                }
            }
        }
        Ok(())
    })
}
