// src/utils/mod.rs
//! Common utilities: configuration and error types

pub mod config;
pub mod errors;

pub use config::{EngineConfig, EntityLimits};
pub use errors::{EngineError, Result, ScriptError};
