// src/interception/mod.rs
//! Interception layer
//!
//! Redirects engine call sites into the hook dispatcher:
//!
//! - **Redirect**: atomic redirect switches, the scoped [`PassThrough`]
//!   guard and [`FnSlot`], a swappable function pointer for raw call sites
//! - **Points**: the fixed catalogue of intercept points and event names
//! - **Binder**: the per-point redirect table used by the dispatcher
//!
//! # Architecture
//!
//! ```text
//! Engine call site
//!     │
//!     ├─ redirect removed ──────────────▶ original implementation
//!     └─ redirect installed ─▶ Dispatcher
//!                                 ├─ pre hook (may veto)
//!                                 ├─ PassThrough ─▶ original implementation
//!                                 └─ post hook
//! ```

pub mod binder;
pub mod points;
pub mod redirect;

// Re-export commonly used types
pub use binder::{Binder, BoundPoint};
pub use points::Point;
pub use redirect::{FnSlot, InterceptPoint, PassThrough, RedirectSwitch};
