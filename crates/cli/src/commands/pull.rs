// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::error::Result;

use super::{block_on, Access, Context};

pub fn run() -> Result<()> {
    block_on(async {
        let ctx = Context::open(Access::Write).await?;
        let count = ctx.engine.pull().await?;
        println!("Pulled {} ticket(s)", count);
        Ok(())
    })
}
