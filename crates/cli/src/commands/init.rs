// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::{init_state_dir, state_dir, Config};
use crate::error::Result;

pub fn run(api_url: String, operator: String, token: Option<String>, force: bool) -> Result<()> {
    let state_dir = state_dir();
    let config = Config::new(operator, api_url, token)?;
    let path = init_state_dir(&state_dir, &config, force)?;

    println!("Initialized fieldkit at {}", state_dir.display());
    println!("Config: {}", path.display());
    println!("Operator: {}", config.operator_id);
    println!("API: {}", config.api.base_url);
    Ok(())
}
