// src/runtime/lifecycle.rs
//! Lifecycle and reset control
//!
//! Tracks whether the script environment is initialized and coordinates
//! resets. Any thread may request a reset or a shutdown through a
//! [`ResetHandle`]; only the dispatch thread consumes the requests, at the
//! start of a tick. Requests collapse: the flag is a boolean, not a counter.
//!
//! A rebuild holds the script-state lock for its whole duration. Threads
//! outside the dispatch thread that need to reach script-owned state take
//! the same lock through [`ResetHandle::lock_script_state`].

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Why a reset happened; observability only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    /// First engine reset after startup
    Boot,
    /// The engine reset the game on its own
    EngineCall,
    /// A flagged full reset (environment rebuilt)
    ScriptReset,
    /// A game reset requested through the script API
    ScriptCall,
}

impl ResetReason {
    /// Numeric code handed to `ResetGame` handlers
    pub fn code(self) -> i32 {
        match self {
            ResetReason::Boot => 0,
            ResetReason::EngineCall => 1,
            ResetReason::ScriptReset => 2,
            ResetReason::ScriptCall => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LifecycleState {
    Uninitialized,
    Ready,
}

/// One performed reset
#[derive(Debug, Clone, Serialize)]
pub struct ResetRecord {
    pub reason: ResetReason,
    pub at: DateTime<Utc>,

    /// Whether the script environment was torn down and rebuilt
    pub rebuilt: bool,
}

#[derive(Debug, Default)]
struct Shared {
    reset_requested: AtomicBool,
    shutdown_requested: AtomicBool,
    script_state: Mutex<()>,
    mode: Mutex<Option<String>>,
}

/// Cross-thread handle for requesting resets and shutdown
#[derive(Debug, Clone)]
pub struct ResetHandle {
    shared: Arc<Shared>,
}

impl ResetHandle {
    /// Flag a full reset; returns false if one was already pending
    pub fn request_reset(&self) -> bool {
        !self.shared.reset_requested.swap(true, Ordering::AcqRel)
    }

    /// Flag a full reset and select the mode the next bootstrap sees
    pub fn flag_for_reset(&self, mode: impl Into<String>) -> bool {
        *self.shared.mode.lock() = Some(mode.into());
        self.request_reset()
    }

    pub fn is_reset_requested(&self) -> bool {
        self.shared.reset_requested.load(Ordering::Acquire)
    }

    /// Ask the dispatch thread to deliver `InterruptSignal` and stop
    pub fn request_shutdown(&self) {
        self.shared.shutdown_requested.store(true, Ordering::Release);
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shared.shutdown_requested.load(Ordering::Acquire)
    }

    /// Exclude a concurrent environment rebuild while held
    pub fn lock_script_state(&self) -> MutexGuard<'_, ()> {
        self.shared.script_state.lock()
    }
}

/// Dispatch-thread side of the lifecycle
pub struct LifecycleController {
    shared: Arc<Shared>,
    state: LifecycleState,
    history: VecDeque<ResetRecord>,
    history_limit: usize,
    rebuilds: u64,
}

impl LifecycleController {
    pub fn new(history_limit: usize) -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            state: LifecycleState::Uninitialized,
            history: VecDeque::with_capacity(history_limit),
            history_limit,
            rebuilds: 0,
        }
    }

    pub fn handle(&self) -> ResetHandle {
        ResetHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::Ready
    }

    pub fn mark_ready(&mut self) {
        if self.state == LifecycleState::Uninitialized {
            info!("Lifecycle ready");
        }
        self.state = LifecycleState::Ready;
    }

    /// Consume a pending reset request
    pub fn take_reset_request(&self) -> bool {
        self.shared.reset_requested.swap(false, Ordering::AcqRel)
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shared.shutdown_requested.load(Ordering::Acquire)
    }

    /// Mode selected by the last `flag_for_reset`
    pub fn mode(&self) -> Option<String> {
        self.shared.mode.lock().clone()
    }

    /// Run a full environment rebuild under the script-state lock.
    ///
    /// `rebuild` must not call [`ResetHandle::lock_script_state`].
    pub fn rebuild<T>(&mut self, rebuild: impl FnOnce() -> T) -> T {
        let _exclusive = self.shared.script_state.lock();
        self.rebuilds += 1;
        debug!("Rebuilding script environment (#{})", self.rebuilds);
        rebuild()
    }

    pub fn record(&mut self, reason: ResetReason, rebuilt: bool) {
        info!(?reason, rebuilt, "Reset performed");
        if self.history_limit == 0 {
            return;
        }
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(ResetRecord {
            reason,
            at: Utc::now(),
            rebuilt,
        });
    }

    pub fn history(&self) -> impl Iterator<Item = &ResetRecord> {
        self.history.iter()
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}
