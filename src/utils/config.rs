// src/utils/config.rs
//! Engine configuration
//!
//! Layered with the `config` crate: built-in defaults, an optional
//! `config/tickhook.{toml,yaml,json}` file, then `TICKHOOK__*` environment
//! variables (double underscore separates sections, e.g.
//! `TICKHOOK__HTTP__WORKER_THREADS=4`).

use crate::engine::types::EntityKind;
use crate::utils::errors::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dispatch: DispatchConfig,
    pub http: HttpConfig,
    pub limits: EntityLimits,
    pub hooks: HooksConfig,
    pub logging: LoggingConfig,
}

/// Dispatch thread settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Interval between logic ticks driven by the binary (milliseconds)
    pub tick_interval_ms: u64,

    /// Prefix printed before script errors on the operator console
    pub script_error_prefix: String,

    /// Number of reset records kept for inspection
    pub reset_history: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            script_error_prefix: "[Script] ".to_string(),
            reset_history: 32,
        }
    }
}

/// HTTP worker pool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Number of request worker threads
    pub worker_threads: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { worker_threads: 2 }
    }
}

/// Slot capacity per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityLimits {
    pub accounts: usize,
    pub players: usize,
    pub humans: usize,
    pub items: usize,
    pub vehicles: usize,
    pub bodies: usize,
}

impl EntityLimits {
    pub fn capacity(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Account => self.accounts,
            EntityKind::Player => self.players,
            EntityKind::Human => self.humans,
            EntityKind::Item => self.items,
            EntityKind::Vehicle => self.vehicles,
            EntityKind::Body => self.bodies,
        }
    }
}

impl Default for EntityLimits {
    fn default() -> Self {
        Self {
            accounts: 8192,
            players: 256,
            humans: 256,
            items: 1024,
            vehicles: 512,
            bodies: 8192,
        }
    }
}

/// Hook bootstrap settings for the bundled binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Events that get a tracing handler registered and enabled at boot
    pub trace_events: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    /// Load from `config/tickhook.*` (optional) and the environment
    pub fn load() -> Result<Self> {
        Self::build(Config::builder().add_source(File::with_name("config/tickhook").required(false)))
    }

    /// Load from an explicit file, still honoring environment overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let settings = builder
            .add_source(
                Environment::with_prefix("TICKHOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("hooks.trace_events")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
