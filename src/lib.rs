// src/lib.rs
//! Tickhook hook-dispatch engine
//!
//! Intercepts a fixed set of engine call sites (ticks, entity lifecycle,
//! packet I/O, collisions, chat) and routes each one through a scriptable
//! pre/post hook layer that may observe, veto or replace the default
//! behavior.
//!
//! # Architecture
//!
//! The crate is structured into these modules:
//!
//! - **interception**: redirect switches, pass-through guards, point catalogue
//! - **dispatch**: the hook protocol, hook registry, shadow state, tick driver
//! - **runtime**: cross-thread event queue, HTTP workers, reset lifecycle
//! - **engine**: the engine collaborator trait and a headless implementation
//! - **observability**: tracing setup and metric names
//! - **utils**: configuration and error types

// Public module exports
pub mod dispatch;
pub mod engine;
pub mod interception;
pub mod observability;
pub mod runtime;
pub mod utils;

// Re-export commonly used types
pub use dispatch::{Dispatcher, TickOutcome};
pub use engine::{Engine, HeadlessEngine};
pub use utils::config::EngineConfig;
pub use utils::errors::{EngineError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
