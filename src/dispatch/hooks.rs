// src/dispatch/hooks.rs
//! Named hook registry and the per-call handler context

use crate::dispatch::shadow::ShadowState;
use crate::dispatch::value::Value;
use crate::interception::binder::Binder;
use crate::runtime::http_workers::{HttpRequest, HttpRequester, ResponseCallback};
use crate::runtime::lifecycle::ResetHandle;
use crate::utils::errors::ScriptError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use ulid::Ulid;

/// What a handler hands back; a truthy value vetoes a pre-hook
pub type HookResult = std::result::Result<Value, ScriptError>;

/// A registered handler
pub type HookHandler = Box<dyn FnMut(&mut HookCall<'_>) -> HookResult + Send>;

/// Event name to handler mapping; one handler per name, last registration wins
#[derive(Default)]
pub struct HookRegistry {
    handlers: HashMap<String, HookHandler>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`; returns true if it replaced one
    pub fn register(
        &mut self,
        event: impl Into<String>,
        handler: impl FnMut(&mut HookCall<'_>) -> HookResult + Send + 'static,
    ) -> bool {
        let event = event.into();
        debug!("Registering handler for {}", event);
        self.handlers.insert(event, Box::new(handler)).is_some()
    }

    pub fn unregister(&mut self, event: &str) -> bool {
        self.handlers.remove(event).is_some()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub(crate) fn get_mut(&mut self, event: &str) -> Option<&mut HookHandler> {
        self.handlers.get_mut(event)
    }
}

/// Engine services reachable from handlers
pub struct ScriptApi<'a> {
    pub(crate) binder: &'a Binder,
    pub(crate) reset: &'a ResetHandle,
    pub(crate) http: Option<&'a HttpRequester>,
    pub(crate) generation: u64,
    pub(crate) game_reset: &'a AtomicBool,
}

impl ScriptApi<'_> {
    pub fn enable(&self, event: &str) -> bool {
        self.binder.enable(event)
    }

    pub fn disable(&self, event: &str) -> bool {
        self.binder.disable(event)
    }

    pub fn clear(&self) {
        self.binder.clear()
    }

    /// Flag a full environment rebuild at the next tick
    pub fn flag_for_reset(&self, mode: &str) -> bool {
        self.reset.flag_for_reset(mode)
    }

    /// Reset the game once the current tick's events are done
    pub fn reset_game(&self) {
        self.game_reset.store(true, Ordering::Release);
    }

    /// Queue an asynchronous request; `callback` runs on a later tick
    pub fn request(
        &self,
        request: HttpRequest,
        callback: ResponseCallback,
    ) -> std::result::Result<Ulid, ScriptError> {
        let http = self
            .http
            .ok_or_else(|| ScriptError::runtime("HTTP workers are not running"))?;
        http.submit(self.generation, request, callback)
            .map_err(|e| ScriptError::runtime(e.to_string()))
    }
}

/// Context handed to a handler for one invocation
pub struct HookCall<'a> {
    pub event: &'a str,

    /// Payload; writes are visible to the default implementation where
    /// the call site reads them back, and to the post hook
    pub args: &'a mut Vec<Value>,

    pub shadow: &'a mut ShadowState,
    pub api: &'a ScriptApi<'a>,
}

impl HookCall<'_> {
    /// Positional argument, nil when absent
    pub fn arg(&self, index: usize) -> &Value {
        static NIL: Value = Value::Nil;
        self.args.get(index).unwrap_or(&NIL)
    }

    pub fn arg_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.args.get_mut(index)
    }
}

/// Context handed to an HTTP response callback on the dispatch thread
pub struct ResponseCall<'a> {
    /// Id returned by [`ScriptApi::request`]
    pub id: Ulid,

    pub shadow: &'a mut ShadowState,
    pub api: &'a ScriptApi<'a>,
}
