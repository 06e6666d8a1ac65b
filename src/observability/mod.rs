// src/observability/mod.rs
//! Logging and metrics
//!
//! `init_tracing` installs the global subscriber for the binary. The metric
//! names below are recorded through the `metrics` facade; no exporter is
//! installed here, so they are no-ops unless the host registers a recorder.

use crate::utils::config::LoggingConfig;
use crate::utils::errors::ScriptError;
use metrics::{counter, describe_counter};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const HOOKS_FIRED: &str = "tickhook_hooks_fired_total";
pub const VETOES: &str = "tickhook_vetoes_total";
pub const SCRIPT_ERRORS: &str = "tickhook_script_errors_total";
pub const RESPONSES_DELIVERED: &str = "tickhook_responses_delivered_total";
pub const RESPONSES_DISCARDED: &str = "tickhook_responses_discarded_total";
pub const RESETS: &str = "tickhook_resets_total";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init()?;
    }
    Ok(())
}

/// Register descriptions for every engine metric
pub fn describe_metrics() {
    describe_counter!(HOOKS_FIRED, "Script handlers invoked");
    describe_counter!(VETOES, "Pre-hooks that cancelled the default behavior");
    describe_counter!(SCRIPT_ERRORS, "Script handler and callback failures");
    describe_counter!(RESPONSES_DELIVERED, "HTTP responses handed to callbacks");
    describe_counter!(RESPONSES_DISCARDED, "HTTP responses dropped after a reset");
    describe_counter!(RESETS, "Game resets performed");
}

/// Report a script failure on the operator console and count it
pub fn report_script_error(prefix: &str, event: &str, err: &ScriptError) {
    error!(target: "script", "{}{}: {}", prefix, event, err);
    counter!(SCRIPT_ERRORS).increment(1);
}
