// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::sync::{run_probe, AppState, HttpRemote, Remote};

use super::{Access, Context};

/// Runs background sync until Ctrl-C.
///
/// A terminal session has no app lifecycle, so the process reports itself
/// active once at startup and background on shutdown.
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let ctx = Context::open(Access::Write).await?;
        let sync = &ctx.config.sync;
        let remote: Arc<dyn Remote> = Arc::new(HttpRemote::new(&ctx.config.api)?);
        let cancel = CancellationToken::new();

        let (network_tx, network_rx) = mpsc::channel(8);
        let (app_tx, app_rx) = mpsc::channel(4);

        let probe = tokio::spawn(run_probe(
            remote,
            sync.probe_interval(),
            network_tx,
            cancel.clone(),
        ));

        let engine = tokio::spawn(Arc::clone(&ctx.engine).run(network_rx, app_rx, cancel.clone()));
        let _ = app_tx.send(AppState::Active).await;

        println!(
            "Syncing for {} against {} (Ctrl-C to stop)",
            ctx.config.operator_id, ctx.config.api.base_url
        );
        tracing::info!(state_dir = %ctx.state_dir.display(), "background sync running");

        tokio::signal::ctrl_c().await?;
        let _ = app_tx.send(AppState::Background).await;
        cancel.cancel();
        let _ = tokio::join!(probe, engine);

        println!("Stopped");
        Ok(())
    })
}
