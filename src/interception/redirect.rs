// src/interception/redirect.rs
//! Redirect switches and scoped pass-through
//!
//! A redirect switch has three states:
//!
//! ```text
//! Removed ──install──▶ Installed ──pass_through──▶ Passing
//!    ▲                     │  ▲                       │
//!    └──────remove─────────┘  └──────guard drop───────┘
//! ```
//!
//! While `Passing`, calls at the site go to the original implementation, so
//! an original that re-enters its own call site never recurses into the
//! replacement. An explicit `remove` during a pass-through wins over the
//! guard: the guard only restores `Installed` from `Passing`.

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::trace;

const REMOVED: u8 = 0;
const INSTALLED: u8 = 1;
const PASSING: u8 = 2;

/// Atomic redirect state for one call site
#[derive(Debug)]
pub struct RedirectSwitch {
    state: AtomicU8,
}

impl RedirectSwitch {
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(REMOVED),
        }
    }

    /// Arm the redirect; false if already installed
    pub fn install(&self) -> bool {
        self.state
            .compare_exchange(REMOVED, INSTALLED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Disarm the redirect; false if nothing was installed
    pub fn remove(&self) -> bool {
        self.state.swap(REMOVED, Ordering::AcqRel) != REMOVED
    }

    /// Installed, including while temporarily passing through
    pub fn is_installed(&self) -> bool {
        self.state.load(Ordering::Acquire) != REMOVED
    }

    /// Calls at the site currently go to the replacement
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == INSTALLED
    }

    fn suspend(&self) -> bool {
        self.state
            .compare_exchange(INSTALLED, PASSING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn resume(&self) {
        let _ = self
            .state
            .compare_exchange(PASSING, INSTALLED, Ordering::AcqRel, Ordering::Acquire);
    }
}

impl Default for RedirectSwitch {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped removal of a redirect
///
/// Dropping the guard reinstalls the redirect on every exit path, including
/// unwinding. Nested guards on an already-passing switch are no-ops.
#[must_use = "the redirect is reinstalled as soon as the guard is dropped"]
pub struct PassThrough<'a> {
    switch: &'a RedirectSwitch,
    suspended: bool,
}

impl<'a> PassThrough<'a> {
    pub fn acquire(switch: &'a RedirectSwitch) -> Self {
        let suspended = switch.suspend();
        Self { switch, suspended }
    }
}

impl Drop for PassThrough<'_> {
    fn drop(&mut self) {
        if self.suspended {
            self.switch.resume();
        }
    }
}

/// A hookable call site
pub trait InterceptPoint {
    fn name(&self) -> &str;

    fn switch(&self) -> &RedirectSwitch;

    fn install(&self) -> bool {
        self.switch().install()
    }

    fn remove(&self) -> bool {
        self.switch().remove()
    }

    fn is_installed(&self) -> bool {
        self.switch().is_installed()
    }

    fn pass_through(&self) -> PassThrough<'_> {
        trace!("pass-through on {}", self.name());
        PassThrough::acquire(self.switch())
    }
}

type SlotFn<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// Swappable function pointer for a host call site
///
/// `call` is what the host invokes; it runs the replacement while the
/// redirect is active and the original otherwise.
pub struct FnSlot<A, R> {
    name: &'static str,
    original: SlotFn<A, R>,
    replacement: RwLock<Option<SlotFn<A, R>>>,
    switch: RedirectSwitch,
    install_lock: Mutex<()>,
}

impl<A, R> FnSlot<A, R> {
    pub fn new(name: &'static str, original: impl Fn(A) -> R + Send + Sync + 'static) -> Self {
        Self {
            name,
            original: Arc::new(original),
            replacement: RwLock::new(None),
            switch: RedirectSwitch::new(),
            install_lock: Mutex::new(()),
        }
    }

    /// Install `replacement`; false if a redirect is already installed
    pub fn install_with(&self, replacement: impl Fn(A) -> R + Send + Sync + 'static) -> bool {
        let _serial = self.install_lock.lock();
        if self.switch.is_installed() {
            return false;
        }
        *self.replacement.write() = Some(Arc::new(replacement));
        self.switch.install()
    }

    /// Invoke the call site
    pub fn call(&self, args: A) -> R {
        if self.switch.is_active() {
            // Clone out so the replacement may install/remove freely
            let replacement = self.replacement.read().clone();
            if let Some(replacement) = replacement {
                return replacement(args);
            }
        }
        (self.original)(args)
    }

    /// Invoke the untouched original with the redirect lifted
    pub fn call_through(&self, args: A) -> R {
        let _pass = self.pass_through();
        (self.original)(args)
    }
}

impl<A, R> InterceptPoint for FnSlot<A, R> {
    fn name(&self) -> &str {
        self.name
    }

    fn switch(&self) -> &RedirectSwitch {
        &self.switch
    }

    /// Re-arm the last installed replacement
    fn install(&self) -> bool {
        let _serial = self.install_lock.lock();
        self.replacement.read().is_some() && self.switch.install()
    }
}
