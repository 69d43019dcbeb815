// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-first sync core.
//!
//! Mutations that cannot reach the backend are parked in a durable queue
//! and replayed in order once connectivity returns. Reads are served from a
//! local ticket cache refreshed by periodic pulls.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Drain   ┌─────────────┐     ┌─────────────┐
//! │ Connectivity │─────────►│   Drainer   │────►│   Remote    │
//! │   Observer   │          └─────────────┘     │   (trait)   │
//! └──────────────┘                 │            └─────────────┘
//!        │ Foreground/Background   ▼                   ▲
//!        ▼                  ┌─────────────┐            │
//! ┌──────────────┐          │ OfflineQueue│     ┌─────────────┐
//! │    Pull      │─────────►│  (KvStore)  │     │  Services   │
//! │  Refresher   │ tickets  └─────────────┘◄────│ (optimistic)│
//! └──────────────┘                              └─────────────┘
//! ```
//!
//! # Features
//!
//! - Durable FIFO queue persisted as a JSON array
//! - Strict in-order replay that halts at the first failure
//! - Dead-lettering of jobs that keep failing permanently
//! - Edge-triggered drains on connectivity restore
//! - Periodic ticket pulls while the app is active
//! - Injectable remote trait for testing

mod connectivity;
mod drain;
mod error;
mod probe;
mod queue;
mod refresher;
mod remote;

pub use connectivity::{
    AppState, ConnectivityObserver, NetworkState, SharedNetworkState, Trigger,
};
pub use drain::{CompletedJob, DrainReport, Drainer, Halt, JobAck, DEFAULT_MAX_ATTEMPTS};
pub use error::{SyncError, SyncResult};
pub use probe::run_probe;
pub use queue::{OfflineQueue, QueueError, QueueResult, QUEUE_KEY};
pub use refresher::{
    load_snapshot, PullRefresher, SharedProjection, REFRESH_INTERVAL, TICKETS_KEY,
};
pub use remote::{HttpRemote, Remote, RemoteError, RemoteFuture, RemoteResult};

#[cfg(test)]
pub(crate) mod test_helpers;
