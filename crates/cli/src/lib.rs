// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! fkrs - offline-first sync for field operations.
//!
//! This crate provides the library behind the `fieldkit` CLI: a device-side
//! client that keeps working without a connection and reconciles with the
//! backend once one returns.
//!
//! # Main Components
//!
//! - [`sync::OfflineQueue`] - durable FIFO of writes waiting for the server
//! - [`sync::ConnectivityObserver`] - turns network and lifecycle reports into triggers
//! - [`sync::Drainer`] - replays the queue in order, halting at the first failure
//! - [`sync::PullRefresher`] - keeps the ticket cache fresh while active
//! - [`SyncEngine`] - wires the above to a store, a remote and a clock
//!
//! # Usage
//!
//! ```rust,ignore
//! use fkrs::{Config, EngineOptions, SyncEngine};
//!
//! let config = Config::load(&state_dir)?;
//! let engine = SyncEngine::open(EngineOptions::from_config(&config), store, remote, clock).await?;
//! let report = engine.drain().await?;
//! ```

mod cli;
mod commands;
mod lock;
mod logging;

pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod services;
pub mod storage;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, QueueCommand, VacationCommand};
pub use config::{state_dir, ApiConfig, Config, SyncSettings};
pub use engine::{EngineOptions, SyncEngine, SyncSnapshot};
pub use error::{Error, Result};
pub use storage::{FileStore, KvStore, MemoryStore};

/// Installs the tracing subscriber suited to `command`.
///
/// `run` logs to a file in the state directory; everything else logs
/// warnings to stderr.
pub fn init_logging(command: &Command) {
    match command {
        Command::Run => logging::init_file(&config::log_path(&config::state_dir())),
        _ => logging::init_stderr(),
    }
}

/// Executes a parsed command.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init {
            api_url,
            operator,
            token,
            force,
        } => commands::init::run(api_url, operator, token, force),
        Command::Status { output } => commands::status::run(output),
        Command::Queue(cmd) => commands::queue::run(cmd),
        Command::Drain { output } => commands::drain::run(output),
        Command::Pull => commands::pull::run(),
        Command::Tickets {
            status,
            search,
            sort,
            output,
        } => commands::tickets::run(status, search, sort, output),
        Command::Vacation(cmd) => commands::vacation::run(cmd),
        Command::Corrective { ticket_id, note } => commands::corrective::run(ticket_id, note),
        Command::Run => commands::run::run(),
    }
}
