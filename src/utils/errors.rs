// src/utils/errors.rs
//! Error types for the dispatch engine
//!
//! Two families exist:
//!
//! - [`EngineError`]: failures of the engine itself (interception binding,
//!   configuration, slot bookkeeping, worker startup)
//! - [`ScriptError`]: failures raised by a script handler; always recovered
//!   at the dispatch boundary and never propagated into engine code

use crate::engine::types::EntityKind;
use std::any::Any;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine-level errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A core intercept point could not be installed at boot
    #[error("Failed to install intercept point {0}")]
    InterceptInstall(&'static str),

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A slot index outside the table bounds for its entity kind
    #[error("Slot {slot} out of range for {kind:?} (capacity {capacity})")]
    SlotOutOfRange {
        kind: EntityKind,
        slot: usize,
        capacity: usize,
    },

    /// A worker thread could not be spawned
    #[error("Failed to spawn worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),

    /// The HTTP worker pool is gone
    #[error("Request channel closed")]
    ChannelClosed,

    /// Transport-level failure reported by a request worker
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Error raised by a script handler or callback
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScriptError {
    /// Runtime error inside a handler
    #[error("{0}")]
    Runtime(String),
}

impl ScriptError {
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    /// Runtime error for a handler that panicked
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Runtime(format!("handler panicked: {}", message))
    }
}
