// src/main.rs
//! Tickhook engine host
//!
//! Drives a headless engine on a fixed tick interval with hooks that trace
//! the configured events. Ctrl-C delivers `InterruptSignal` on the next tick.

use anyhow::Result;
use std::time::Duration;
use tickhook_engine::dispatch::{Dispatcher, TickOutcome, TraceBootstrap};
use tickhook_engine::engine::HeadlessEngine;
use tickhook_engine::observability::{describe_metrics, init_tracing};
use tickhook_engine::utils::config::EngineConfig;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = EngineConfig::load()?;

    // Initialize observability (tracing, metrics)
    init_tracing(&config.logging)?;
    describe_metrics();

    info!("Starting tickhook engine v{}", tickhook_engine::VERSION);
    info!("Configuration loaded: {:?}", config);

    // Runs without the call log so a long-lived host does not grow
    let engine = HeadlessEngine::new(config.limits);
    let bootstrap = Box::new(TraceBootstrap::new(config.hooks.trace_events.clone()));
    let mut dispatcher = Dispatcher::new(engine, &config, bootstrap);

    // First engine reset boots the dispatcher
    dispatcher.reset_game()?;
    info!("Dispatcher ready with {} HTTP workers", dispatcher.http_workers());

    // Graceful shutdown handler
    let reset = dispatcher.reset_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                reset.request_shutdown();
            }
            Err(e) => error!("Failed to install CTRL+C signal handler: {}", e),
        }
    });

    let tick = Duration::from_millis(config.dispatch.tick_interval_ms.max(1));
    let mut interval = tokio::time::interval(tick);
    loop {
        interval.tick().await;
        if dispatcher.logic_simulation() == TickOutcome::Shutdown {
            break;
        }
    }

    let stats = dispatcher.stats();
    info!(
        ticks = dispatcher.engine().ticks(),
        hooks_fired = stats.hooks_fired,
        script_errors = stats.script_errors,
        "Engine stopped"
    );
    Ok(())
}
