// src/dispatch/environment.rs
//! The dispatch environment and its bootstrap
//!
//! [`DispatchEnvironment`] owns every piece of script-facing state: the named
//! hooks and the shadow tables. A reset replaces all of it at once by tearing
//! the environment down and running the [`ScriptBootstrap`] again.

use crate::dispatch::hooks::{HookRegistry, ScriptApi};
use crate::dispatch::shadow::ShadowState;
use crate::dispatch::value::Value;
use crate::runtime::lifecycle::ResetReason;
use crate::utils::config::EntityLimits;
use tracing::{debug, info};

/// Hooks and shadow state of one script environment generation
pub struct DispatchEnvironment {
    hooks: HookRegistry,
    shadow: ShadowState,

    /// A callback set is registered (bootstrap succeeded)
    active: bool,

    /// Bumped on every teardown; stale async results carry an older value
    generation: u64,
}

impl DispatchEnvironment {
    pub fn new(limits: EntityLimits) -> Self {
        Self {
            hooks: HookRegistry::new(),
            shadow: ShadowState::new(limits),
            active: false,
            generation: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn shadow(&self) -> &ShadowState {
        &self.shadow
    }

    pub fn shadow_mut(&mut self) -> &mut ShadowState {
        &mut self.shadow
    }

    pub(crate) fn split_mut(&mut self) -> (&mut HookRegistry, &mut ShadowState) {
        (&mut self.hooks, &mut self.shadow)
    }

    /// Drop every hook and shadow value and start a new generation
    pub(crate) fn teardown(&mut self) {
        debug!(
            "Tearing down environment generation {} ({} hooks)",
            self.generation,
            self.hooks.len()
        );
        self.hooks.clear();
        self.shadow.clear_all();
        self.active = false;
        self.generation += 1;
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }
}

/// Inputs for one bootstrap run
pub struct BootContext<'a> {
    pub reason: ResetReason,

    /// Mode chosen by the last `flag_for_reset`, if any
    pub mode: Option<&'a str>,

    pub api: &'a ScriptApi<'a>,
}

/// Loads scripts and registers their hooks into a fresh environment
pub trait ScriptBootstrap: Send {
    fn bootstrap(&mut self, env: &mut DispatchEnvironment, ctx: &BootContext<'_>) -> anyhow::Result<()>;
}

/// Bootstrap backed by a closure
pub struct FnBootstrap<F>(F);

/// Wrap a closure as a [`ScriptBootstrap`]
pub fn bootstrap_fn<F>(f: F) -> FnBootstrap<F>
where
    F: FnMut(&mut DispatchEnvironment, &BootContext<'_>) -> anyhow::Result<()> + Send,
{
    FnBootstrap(f)
}

impl<F> ScriptBootstrap for FnBootstrap<F>
where
    F: FnMut(&mut DispatchEnvironment, &BootContext<'_>) -> anyhow::Result<()> + Send,
{
    fn bootstrap(&mut self, env: &mut DispatchEnvironment, ctx: &BootContext<'_>) -> anyhow::Result<()> {
        (self.0)(env, ctx)
    }
}

/// Registers a tracing handler for each configured event and enables it
pub struct TraceBootstrap {
    events: Vec<String>,
}

impl TraceBootstrap {
    pub fn new(events: Vec<String>) -> Self {
        Self { events }
    }
}

impl ScriptBootstrap for TraceBootstrap {
    fn bootstrap(&mut self, env: &mut DispatchEnvironment, ctx: &BootContext<'_>) -> anyhow::Result<()> {
        for event in &self.events {
            env.hooks_mut().register(event.clone(), |call| {
                let args: Vec<String> = call.args.iter().map(Value::to_string).collect();
                info!(target: "script", "{}({})", call.event, args.join(", "));
                Ok(Value::Nil)
            });
            if !ctx.api.enable(event) {
                anyhow::bail!("unknown event {}", event);
            }
        }
        info!(
            "Bootstrapped {} trace hooks ({:?}, mode {:?})",
            self.events.len(),
            ctx.reason,
            ctx.mode
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::EntityKind;

    #[test]
    fn test_teardown_clears_everything() {
        let mut env = DispatchEnvironment::new(EntityLimits::default());
        env.hooks_mut().register("Logic", |_| Ok(Value::Nil));
        env.shadow_mut()
            .set(EntityKind::Player, 3, Value::Int(1))
            .unwrap();
        env.activate();

        env.teardown();

        assert!(!env.is_active());
        assert!(env.hooks().is_empty());
        assert!(env.shadow().get(EntityKind::Player, 3).is_none());
        assert_eq!(env.generation(), 1);
    }
}
