// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network and app-lifecycle observation.
//!
//! The observer turns raw platform signals into sync triggers:
//! - an offline to online edge asks for a drain
//! - becoming active starts periodic pulls, leaving active stops them
//!
//! Edge detection is pure ([`ConnectivityObserver::on_network`] and
//! [`ConnectivityObserver::on_app_state`]); [`ConnectivityObserver::run`]
//! wires it to channels.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Network state values for the atomic state field.
pub const NET_UNKNOWN: u8 = 0;
pub const NET_OFFLINE: u8 = 1;
pub const NET_ONLINE: u8 = 2;

/// A network state report from the platform (or the health probe).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    pub is_connected: bool,
    /// `None` when the platform cannot tell.
    pub is_internet_reachable: Option<bool>,
}

impl NetworkState {
    pub fn online() -> Self {
        NetworkState {
            is_connected: true,
            is_internet_reachable: Some(true),
        }
    }

    pub fn offline() -> Self {
        NetworkState {
            is_connected: false,
            is_internet_reachable: Some(false),
        }
    }

    /// Connected, and internet reachability is not known to be false.
    pub fn is_online(&self) -> bool {
        self.is_connected && self.is_internet_reachable != Some(false)
    }
}

/// Application lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Background,
    Inactive,
}

/// Network state visible to every component.
///
/// Uses an atomic field for lock-free reads.
#[derive(Debug)]
pub struct SharedNetworkState {
    state: AtomicU8,
}

impl SharedNetworkState {
    /// Create a new shared state; nothing is known until the first report.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(NET_UNKNOWN),
        }
    }

    pub fn get(&self) -> u8 {
        self.state.load(Ordering::Acquire)
    }

    pub fn set(&self, state: u8) {
        self.state.store(state, Ordering::Release);
    }

    /// Records a platform report, returning the previous value.
    pub fn update(&self, report: NetworkState) -> u8 {
        let next = if report.is_online() {
            NET_ONLINE
        } else {
            NET_OFFLINE
        };
        self.state.swap(next, Ordering::AcqRel)
    }

    pub fn is_online(&self) -> bool {
        self.get() == NET_ONLINE
    }

    /// Known to be offline. Unknown is not offline.
    pub fn is_offline(&self) -> bool {
        self.get() == NET_OFFLINE
    }

    /// Get a human-readable status string.
    pub fn status_string(&self) -> &'static str {
        match self.get() {
            NET_ONLINE => "online",
            NET_OFFLINE => "offline",
            _ => "unknown",
        }
    }
}

impl Default for SharedNetworkState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the observer asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Connectivity was restored: replay the queue.
    Drain,
    /// The app became active: start periodic pulls.
    Foreground,
    /// The app left the active state: stop periodic pulls.
    Background,
}

/// Detects connectivity and lifecycle edges.
pub struct ConnectivityObserver {
    network: Arc<SharedNetworkState>,
    app_state: Option<AppState>,
}

impl ConnectivityObserver {
    pub fn new(network: Arc<SharedNetworkState>) -> Self {
        ConnectivityObserver {
            network,
            app_state: None,
        }
    }

    /// Handles a network report.
    ///
    /// Only a transition into online yields [`Trigger::Drain`]; the first
    /// report counts as a transition when it is online. Repeated online
    /// reports yield nothing.
    pub fn on_network(&mut self, report: NetworkState) -> Option<Trigger> {
        let previous = self.network.update(report);
        let online = report.is_online();

        match (previous == NET_ONLINE, online) {
            (false, true) => {
                tracing::info!("connectivity restored");
                Some(Trigger::Drain)
            }
            (true, false) => {
                tracing::info!("connectivity lost");
                None
            }
            _ => None,
        }
    }

    /// Handles an app lifecycle change.
    pub fn on_app_state(&mut self, state: AppState) -> Option<Trigger> {
        let was_active = self.app_state == Some(AppState::Active);
        self.app_state = Some(state);
        let is_active = state == AppState::Active;

        match (was_active, is_active) {
            (false, true) => Some(Trigger::Foreground),
            (true, false) => Some(Trigger::Background),
            _ => None,
        }
    }

    /// Forwards triggers until cancelled or every input closes.
    pub async fn run(
        mut self,
        mut network_rx: mpsc::Receiver<NetworkState>,
        mut app_rx: mpsc::Receiver<AppState>,
        trigger_tx: mpsc::Sender<Trigger>,
        cancel: CancellationToken,
    ) {
        loop {
            let trigger = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                Some(report) = network_rx.recv() => self.on_network(report),
                Some(state) = app_rx.recv() => self.on_app_state(state),
                else => break,
            };

            if let Some(trigger) = trigger {
                tracing::debug!(?trigger, "connectivity trigger");
                if trigger_tx.send(trigger).await.is_err() {
                    break;
                }
            }
        }
        tracing::debug!("connectivity observer stopped");
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
