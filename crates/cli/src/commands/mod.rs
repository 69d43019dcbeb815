// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod corrective;
pub mod drain;
pub mod init;
pub mod pull;
pub mod queue;
pub mod run;
pub mod status;
pub mod tickets;
pub mod vacation;

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fk_core::SystemClock;

use crate::config::{data_dir, state_dir, Config};
use crate::engine::{EngineOptions, SyncEngine};
use crate::error::Result;
use crate::lock::StateLock;
use crate::storage::FileStore;
use crate::sync::HttpRemote;

/// Everything a command needs: config, engine and (optionally) the state lock.
pub struct Context {
    pub state_dir: PathBuf,
    pub config: Config,
    pub engine: Arc<SyncEngine>,
    _lock: Option<StateLock>,
}

/// Whether a command may rewrite stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Context {
    /// Loads config and opens the engine over the on-disk store.
    pub async fn open(access: Access) -> Result<Self> {
        let state_dir = state_dir();
        let config = Config::load(&state_dir)?;
        let lock = match access {
            Access::Write => Some(StateLock::acquire(&state_dir)?),
            Access::Read => None,
        };

        let store = Arc::new(FileStore::open(&data_dir(&state_dir))?);
        let remote = Arc::new(HttpRemote::new(&config.api)?);
        let engine = SyncEngine::open(
            EngineOptions::from_config(&config),
            store,
            remote,
            Arc::new(SystemClock),
        )
        .await?;

        Ok(Context {
            state_dir,
            config,
            engine: Arc::new(engine),
            _lock: lock,
        })
    }
}

/// Runs a one-shot command future on a current-thread runtime.
pub fn block_on<T, F>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

/// Formats a timestamp for text output.
pub(crate) fn format_time(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "never".to_string(),
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
