// src/dispatch/mod.rs
//! Hook dispatch
//!
//! Everything that runs on the dispatch thread:
//!
//! - **Dispatcher**: the pre/default/post protocol for every intercept
//!   point and the logic tick driver
//! - **Environment**: hooks and shadow state of one script generation, plus
//!   the bootstrap that populates it
//! - **Hooks**: the named handler registry and the per-call context
//! - **Shadow**: per-entity script values, cleared on slot reuse
//! - **Value**: the payload type handed to handlers
//!
//! # Tick order
//!
//! ```text
//! logic_simulation
//!   1. pending reset ─▶ teardown ─▶ bootstrap ─▶ ResetGame protocol
//!   2. shutdown requested ─▶ InterruptSignal ─▶ TickOutcome::Shutdown
//!   3. Logic / default / PostLogic
//!   4. console queue ─▶ ConsoleInput
//!   5. response queue ─▶ callbacks (stale generations discarded)
//!   6. script-requested game reset
//! ```

pub mod dispatcher;
pub mod environment;
pub mod hooks;
pub mod shadow;
pub mod value;

// Re-export commonly used types
pub use dispatcher::{DispatchStats, Dispatcher, TickOutcome};
pub use environment::{bootstrap_fn, BootContext, DispatchEnvironment, ScriptBootstrap, TraceBootstrap};
pub use hooks::{HookCall, HookRegistry, HookResult, ResponseCall, ScriptApi};
pub use shadow::ShadowState;
pub use value::{Table, Value};
