// src/runtime/mod.rs
//! Cross-thread runtime pieces
//!
//! - **Event Queue**: mutex-guarded FIFO filled by any thread and drained on
//!   the dispatch thread
//! - **HTTP Workers**: fixed pool that runs requests off the dispatch thread
//! - **Lifecycle**: initialization state, reset requests and the rebuild lock
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   submit    ┌──────────────────┐
//! │ script hook  │────────────▶│ http-worker-0..N │
//! └──────────────┘             └────────┬─────────┘
//!        ▲                              │ enqueue
//!        │ callback                     ▼
//! ┌──────┴────────────────────────────────────────┐
//! │ dispatch thread: drain_all() once per tick    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Only the queues, the reset/shutdown flags and the rebuild lock are shared
//! between threads. Script state never leaves the dispatch thread.

pub mod event_queue;
pub mod http_workers;
pub mod lifecycle;

// Re-export commonly used types
pub use event_queue::{EventQueue, QueueStats};
pub use http_workers::{
    HttpRequest, HttpRequester, HttpResponse, HttpWorkerPool, Method, OfflineTransport,
    PendingHttpResponse, ResponseCallback, Transport,
};
pub use lifecycle::{LifecycleController, LifecycleState, ResetHandle, ResetReason, ResetRecord};
