// src/dispatch/dispatcher.rs
//! Hook dispatcher
//!
//! Every redirected engine call lands in one method here and runs the same
//! protocol:
//!
//! ```text
//!  engine call ──▶ redirected? ──no──▶ original (direct)
//!                      │yes
//!                      ▼
//!               "E" handler ──truthy──▶ veto ─────────┐
//!                      │falsy / error                 │
//!                      ▼                              ▼
//!        pass-through ▶ original ──────────▶ "PostE" handler ──▶ result
//! ```
//!
//! The tick driver (`logic_simulation`) additionally performs pending
//! resets, the shutdown signal, and drains the console and HTTP queues.

use crate::dispatch::environment::{BootContext, DispatchEnvironment, ScriptBootstrap};
use crate::dispatch::hooks::{HookCall, ResponseCall, ScriptApi};
use crate::dispatch::value::{Table, Value};
use crate::engine::native::Engine;
use crate::engine::types::{address_from_integer, EntityKind, RotMatrix, Vector};
use crate::interception::binder::Binder;
use crate::interception::points::{
    Point, ACCOUNT_TICKET_BEGIN, ACCOUNT_TICKET_FOUND, CONSOLE_INPUT, INTERRUPT_SIGNAL,
};
use crate::observability::{
    report_script_error, HOOKS_FIRED, RESETS, RESPONSES_DELIVERED, RESPONSES_DISCARDED, VETOES,
};
use crate::runtime::event_queue::EventQueue;
use crate::runtime::http_workers::{
    HttpRequester, HttpWorkerPool, OfflineTransport, PendingHttpResponse, Transport,
};
use crate::runtime::lifecycle::{LifecycleController, ResetHandle, ResetReason};
use crate::utils::config::EngineConfig;
use crate::utils::errors::{Result, ScriptError};
use metrics::counter;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Result of one logic tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,

    /// `InterruptSignal` was delivered; the host should exit
    Shutdown,
}

/// Dispatch counters since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub hooks_fired: u64,
    pub vetoes: u64,
    pub script_errors: u64,
    pub responses_delivered: u64,
    pub responses_discarded: u64,
    pub console_lines: u64,
}

enum HookOutcome {
    /// No active environment or no handler for the event
    Skipped,
    Returned(Value),
    /// Reported and treated as no veto
    Failed,
}

impl HookOutcome {
    fn vetoes(&self) -> bool {
        matches!(self, HookOutcome::Returned(value) if value.is_truthy())
    }
}

/// Runs the pre/default/post protocol for every intercept point
pub struct Dispatcher<E: Engine> {
    engine: E,
    binder: Binder,
    env: DispatchEnvironment,
    bootstrap: Box<dyn ScriptBootstrap>,
    lifecycle: LifecycleController,
    reset: ResetHandle,

    /// Completed HTTP requests, drained once per tick
    responses: Arc<EventQueue<PendingHttpResponse>>,

    /// Operator console lines, delivered as `ConsoleInput`
    console: Arc<EventQueue<String>>,

    // Dropped before the pool so its workers can exit
    requester: Option<HttpRequester>,
    http: Option<HttpWorkerPool>,
    transport: Arc<dyn Transport>,
    http_threads: usize,

    /// Set by `ScriptApi::reset_game`, consumed at the end of the tick
    game_reset_requested: AtomicBool,

    error_prefix: String,
    stats: DispatchStats,
}

impl<E: Engine> Dispatcher<E> {
    /// Dispatcher whose HTTP requests all fail
    pub fn new(engine: E, config: &EngineConfig, bootstrap: Box<dyn ScriptBootstrap>) -> Self {
        Self::with_transport(engine, config, bootstrap, Arc::new(OfflineTransport))
    }

    pub fn with_transport(
        engine: E,
        config: &EngineConfig,
        bootstrap: Box<dyn ScriptBootstrap>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let lifecycle = LifecycleController::new(config.dispatch.reset_history);
        let reset = lifecycle.handle();

        Self {
            engine,
            binder: Binder::new(),
            env: DispatchEnvironment::new(config.limits),
            bootstrap,
            lifecycle,
            reset,
            responses: Arc::new(EventQueue::new()),
            console: Arc::new(EventQueue::new()),
            requester: None,
            http: None,
            transport,
            http_threads: config.http.worker_threads,
            game_reset_requested: AtomicBool::new(false),
            error_prefix: config.dispatch.script_error_prefix.clone(),
            stats: DispatchStats::default(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn env(&self) -> &DispatchEnvironment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut DispatchEnvironment {
        &mut self.env
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn lifecycle(&self) -> &LifecycleController {
        &self.lifecycle
    }

    /// Handle for requesting resets and shutdown from other threads
    pub fn reset_handle(&self) -> ResetHandle {
        self.reset.clone()
    }

    pub fn responses(&self) -> Arc<EventQueue<PendingHttpResponse>> {
        Arc::clone(&self.responses)
    }

    pub fn console(&self) -> Arc<EventQueue<String>> {
        Arc::clone(&self.console)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn http_workers(&self) -> usize {
        self.http.as_ref().map_or(0, HttpWorkerPool::worker_count)
    }

    // ---- lifecycle -------------------------------------------------------

    /// Engine reset entry point; the first call boots the dispatcher
    pub fn reset_game(&mut self) -> Result<()> {
        if !self.lifecycle.is_initialized() {
            return self.boot();
        }
        self.hook_and_reset(ResetReason::EngineCall, false);
        Ok(())
    }

    fn boot(&mut self) -> Result<()> {
        info!("Engine ready, booting dispatcher");
        self.binder.install_core()?;

        if self.http_threads > 0 {
            let pool = HttpWorkerPool::start(
                self.http_threads,
                Arc::clone(&self.transport),
                Arc::clone(&self.responses),
            )?;
            self.requester = pool.requester();
            self.http = Some(pool);
        }

        self.rebuild_environment(ResetReason::Boot);
        self.lifecycle.mark_ready();
        self.hook_and_reset(ResetReason::Boot, true);
        Ok(())
    }

    /// Tear the script environment down and bootstrap a new one.
    ///
    /// A failed bootstrap leaves the environment inactive; no handler fires
    /// until the next successful rebuild.
    fn rebuild_environment(&mut self, reason: ResetReason) {
        let mode = self.lifecycle.mode();
        let Self {
            lifecycle,
            env,
            bootstrap,
            binder,
            reset,
            requester,
            game_reset_requested,
            ..
        } = &mut *self;

        let result = lifecycle.rebuild(|| {
            env.teardown();
            binder.clear();

            let api = ScriptApi {
                binder,
                reset,
                http: requester.as_ref(),
                generation: env.generation(),
                game_reset: game_reset_requested,
            };
            let ctx = BootContext {
                reason,
                mode: mode.as_deref(),
                api: &api,
            };
            let result = panic::catch_unwind(AssertUnwindSafe(|| bootstrap.bootstrap(env, &ctx)))
                .unwrap_or_else(|payload| Err(ScriptError::from_panic(&*payload).into()));
            if result.is_ok() {
                env.activate();
            }
            result
        });

        match result {
            Ok(()) => {
                info!(
                    "Script environment generation {} ready with {} hooks",
                    self.env.generation(),
                    self.env.hooks().len()
                );
            }
            Err(e) => {
                error!(target: "script", "{}bootstrap failed: {:#}", self.error_prefix, e);
            }
        }
    }

    /// Run the `ResetGame` protocol for `reason`
    fn hook_and_reset(&mut self, reason: ResetReason, rebuilt: bool) {
        let point = Point::ResetGame;
        let mut args = vec![Value::from(reason.code())];

        if !self.pre(point, &mut args) {
            self.call_through(point, |engine| engine.reset_game());
            // The engine wipes every entity table except accounts
            for kind in EntityKind::ALL {
                if kind != EntityKind::Account {
                    self.env.shadow_mut().clear_kind(kind);
                }
            }
        }
        self.post(point, args);

        self.lifecycle.record(reason, rebuilt);
        counter!(RESETS).increment(1);
    }

    /// Logic tick driver
    pub fn logic_simulation(&mut self) -> TickOutcome {
        if self.lifecycle.is_initialized() && self.lifecycle.take_reset_request() {
            self.rebuild_environment(ResetReason::ScriptReset);
            self.hook_and_reset(ResetReason::ScriptReset, true);
        }

        if self.lifecycle.is_shutdown_requested() {
            info!("Interrupt received, shutting down");
            self.fire(INTERRUPT_SIGNAL, &mut Vec::new());
            return TickOutcome::Shutdown;
        }

        self.intercept(Point::Logic, Vec::new, |engine| engine.logic_simulation());

        self.drain_console();
        self.drain_responses();

        if self.game_reset_requested.swap(false, Ordering::AcqRel) {
            self.hook_and_reset(ResetReason::ScriptCall, false);
        }
        TickOutcome::Continue
    }

    fn drain_console(&mut self) {
        let console = Arc::clone(&self.console);
        let lines = console.drain_all(|line| {
            self.fire(CONSOLE_INPUT, &mut vec![Value::from(line)]);
        });
        self.stats.console_lines += lines as u64;
    }

    fn drain_responses(&mut self) {
        let responses = Arc::clone(&self.responses);
        responses.drain_all(|record| self.deliver_response(record));
    }

    fn deliver_response(&mut self, record: PendingHttpResponse) {
        if !self.env.is_active() || record.generation != self.env.generation() {
            debug!(
                "Discarding response {} from generation {} (current {})",
                record.id,
                record.generation,
                self.env.generation()
            );
            self.stats.responses_discarded += 1;
            counter!(RESPONSES_DISCARDED).increment(1);
            return;
        }

        let id = record.id;
        trace!("Delivering response {} (responded: {})", id, record.responded());
        let api = ScriptApi {
            binder: &self.binder,
            reset: &self.reset,
            http: self.requester.as_ref(),
            generation: self.env.generation(),
            game_reset: &self.game_reset_requested,
        };
        let mut call = ResponseCall {
            id,
            shadow: self.env.shadow_mut(),
            api: &api,
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| record.deliver(&mut call)))
            .unwrap_or_else(|payload| Err(ScriptError::from_panic(&*payload)));

        if let Err(e) = result {
            report_script_error(&self.error_prefix, &format!("response {}", id), &e);
            self.stats.script_errors += 1;
        }
        self.stats.responses_delivered += 1;
        counter!(RESPONSES_DELIVERED).increment(1);
    }

    // ---- protocol helpers ------------------------------------------------

    fn hooked(&self, point: Point) -> bool {
        self.binder.is_redirected(point)
    }

    /// Invoke the handler for `event`.
    ///
    /// Mutations made by a handler that fails are discarded. A panicking
    /// handler counts as a failure and never unwinds past this point.
    fn fire(&mut self, event: &str, args: &mut Vec<Value>) -> HookOutcome {
        if !self.env.is_active() {
            return HookOutcome::Skipped;
        }

        let api = ScriptApi {
            binder: &self.binder,
            reset: &self.reset,
            http: self.requester.as_ref(),
            generation: self.env.generation(),
            game_reset: &self.game_reset_requested,
        };
        let (hooks, shadow) = self.env.split_mut();
        let Some(handler) = hooks.get_mut(event) else {
            return HookOutcome::Skipped;
        };

        trace!("Firing {}", event);
        let snapshot = args.clone();
        let mut call = HookCall {
            event,
            args: &mut *args,
            shadow,
            api: &api,
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler(&mut call)))
            .unwrap_or_else(|payload| Err(ScriptError::from_panic(&*payload)));

        self.stats.hooks_fired += 1;
        counter!(HOOKS_FIRED).increment(1);

        match result {
            Ok(value) => HookOutcome::Returned(value),
            Err(e) => {
                *args = snapshot;
                report_script_error(&self.error_prefix, event, &e);
                self.stats.script_errors += 1;
                HookOutcome::Failed
            }
        }
    }

    /// Fire a vetoable event; true if the handler returned a truthy value
    fn vetoed(&mut self, event: &str, args: &mut Vec<Value>) -> bool {
        let vetoed = self.fire(event, args).vetoes();
        if vetoed {
            debug!("{} vetoed", event);
            self.stats.vetoes += 1;
            counter!(VETOES).increment(1);
        }
        vetoed
    }

    fn pre(&mut self, point: Point, args: &mut Vec<Value>) -> bool {
        self.vetoed(point.name(), args)
    }

    fn post(&mut self, point: Point, mut args: Vec<Value>) {
        let (_, post) = point.events();
        self.fire(post, &mut args);
    }

    /// Run the original with the redirect at `point` lifted
    fn call_through<R>(&mut self, point: Point, original: impl FnOnce(&mut E) -> R) -> R {
        let _pass = self.binder.pass_through(point);
        original(&mut self.engine)
    }

    /// Protocol for points without a return value
    fn intercept(
        &mut self,
        point: Point,
        args: impl FnOnce() -> Vec<Value>,
        original: impl FnOnce(&mut E),
    ) {
        if !self.hooked(point) {
            return original(&mut self.engine);
        }

        let mut args = args();
        if !self.pre(point, &mut args) {
            self.call_through(point, original);
        }
        self.post(point, args);
    }

    /// Protocol for points with a return value; the post hook receives the
    /// outcome as its last argument (nil when vetoed)
    fn intercept_with<R>(
        &mut self,
        point: Point,
        args: impl FnOnce() -> Vec<Value>,
        original: impl FnOnce(&mut E) -> R,
        vetoed: R,
        outcome: impl FnOnce(&R) -> Value,
    ) -> R {
        if !self.hooked(point) {
            return original(&mut self.engine);
        }

        let mut args = args();
        let result = if self.pre(point, &mut args) {
            None
        } else {
            Some(self.call_through(point, original))
        };
        args.push(result.as_ref().map_or(Value::Nil, outcome));
        self.post(point, args);
        result.unwrap_or(vetoed)
    }

    /// Clear stale shadow state for a new slot, then fire the post hook
    fn created(&mut self, point: Point, kind: EntityKind, id: Option<usize>) -> Option<usize> {
        let id = id?;
        self.env.shadow_mut().clear(kind, id);
        self.post(point, vec![Value::entity(kind, id)]);
        Some(id)
    }

    fn delete(&mut self, point: Point, kind: EntityKind, slot: usize, original: impl FnOnce(&mut E)) {
        if !self.hooked(point) {
            original(&mut self.engine);
            self.env.shadow_mut().clear(kind, slot);
            return;
        }

        let mut args = vec![Value::entity(kind, slot)];
        if !self.pre(point, &mut args) {
            self.call_through(point, original);
            self.env.shadow_mut().clear(kind, slot);
        }
        self.post(point, args);
    }

    // ---- simulation ------------------------------------------------------

    pub fn logic_simulation_race(&mut self) {
        self.intercept(Point::LogicRace, Vec::new, |engine| engine.logic_simulation_race());
    }

    pub fn logic_simulation_round(&mut self) {
        self.intercept(Point::LogicRound, Vec::new, |engine| engine.logic_simulation_round());
    }

    pub fn logic_simulation_world(&mut self) {
        self.intercept(Point::LogicWorld, Vec::new, |engine| engine.logic_simulation_world());
    }

    pub fn logic_simulation_terminator(&mut self) {
        self.intercept(Point::LogicTerminator, Vec::new, |engine| {
            engine.logic_simulation_terminator()
        });
    }

    pub fn logic_simulation_coop(&mut self) {
        self.intercept(Point::LogicCoop, Vec::new, |engine| engine.logic_simulation_coop());
    }

    pub fn logic_simulation_versus(&mut self) {
        self.intercept(Point::LogicVersus, Vec::new, |engine| engine.logic_simulation_versus());
    }

    pub fn logic_player_actions(&mut self, player: usize) {
        self.intercept(
            Point::PlayerActions,
            || vec![Value::entity(EntityKind::Player, player)],
            |engine| engine.logic_player_actions(player),
        );
    }

    pub fn physics_simulation(&mut self) {
        self.intercept(Point::Physics, Vec::new, |engine| engine.physics_simulation());
    }

    pub fn bullet_simulation(&mut self) {
        self.intercept(Point::PhysicsBullets, Vec::new, |engine| engine.bullet_simulation());
    }

    // ---- network ---------------------------------------------------------

    /// Vetoed: `-1`
    pub fn server_receive(&mut self) -> i32 {
        self.intercept_with(
            Point::InPacket,
            Vec::new,
            |engine| engine.server_receive(),
            -1,
            |status| Value::from(*status),
        )
    }

    pub fn server_send(&mut self) {
        self.intercept(Point::SendPacket, Vec::new, |engine| engine.server_send());
    }

    /// The pre-hook may rewrite `data.message`; the default and the post
    /// hook see the rewritten message
    pub fn server_send_connect_response(&mut self, address: u32, port: u32, message: &str) {
        let point = Point::SendConnectResponse;
        if !self.hooked(point) {
            return self.engine.server_send_connect_response(address, port, message);
        }

        let mut data = Table::new();
        data.insert("message".to_string(), Value::from(message));
        let mut args = vec![
            Value::from(address_from_integer(address)),
            Value::from(port),
            Value::Table(data),
        ];

        if !self.pre(point, &mut args) {
            let message = args
                .get(2)
                .and_then(Value::as_table)
                .and_then(|data| data.get("message"))
                .and_then(Value::as_str)
                .unwrap_or(message)
                .to_string();
            self.call_through(point, |engine| {
                engine.server_send_connect_response(address, port, &message)
            });
        }
        self.post(point, args);
    }

    // ---- accounts --------------------------------------------------------

    pub fn save_accounts_server(&mut self) {
        self.intercept(Point::AccountsSave, Vec::new, |engine| engine.save_accounts_server());
    }

    /// Two-stage lookup: `AccountTicketBegin` may skip the lookup,
    /// `AccountTicketFound` may reject its result
    pub fn create_account_by_join_ticket(&mut self, identifier: i32, ticket: u32) -> Option<usize> {
        let point = Point::AccountTicket;
        if !self.hooked(point) {
            return self.engine.create_account_by_join_ticket(identifier, ticket);
        }

        let mut args = vec![Value::from(identifier), Value::from(ticket)];
        if self.vetoed(ACCOUNT_TICKET_BEGIN, &mut args) {
            return None;
        }

        let id = self.call_through(point, |engine| {
            engine.create_account_by_join_ticket(identifier, ticket)
        });

        let mut found = vec![Value::entity_or_nil(EntityKind::Account, id)];
        if self.vetoed(ACCOUNT_TICKET_FOUND, &mut found) {
            return None;
        }
        self.post(point, found);
        id
    }

    // ---- entity lifecycle ------------------------------------------------

    pub fn create_player(&mut self) -> Option<usize> {
        let point = Point::PlayerCreate;
        if !self.hooked(point) {
            return self.engine.create_player();
        }

        if self.pre(point, &mut Vec::new()) {
            return None;
        }
        let id = self.call_through(point, |engine| engine.create_player());
        self.created(point, EntityKind::Player, id)
    }

    pub fn delete_player(&mut self, player: usize) {
        self.delete(Point::PlayerDelete, EntityKind::Player, player, |engine| {
            engine.delete_player(player)
        });
    }

    /// The pre-hook may rewrite the spawn position and rotation
    pub fn create_human(&mut self, pos: &Vector, rot: &RotMatrix, player: usize) -> Option<usize> {
        let point = Point::HumanCreate;
        if !self.hooked(point) {
            return self.engine.create_human(pos, rot, player);
        }

        let mut args = vec![
            Value::from(*pos),
            Value::from(*rot),
            Value::entity(EntityKind::Player, player),
        ];
        if self.pre(point, &mut args) {
            return None;
        }

        let pos = args.first().and_then(Value::as_vector).unwrap_or(*pos);
        let rot = args.get(1).and_then(Value::as_rotation).unwrap_or(*rot);
        let id = self.call_through(point, |engine| engine.create_human(&pos, &rot, player));
        self.created(point, EntityKind::Human, id)
    }

    pub fn delete_human(&mut self, human: usize) {
        self.delete(Point::HumanDelete, EntityKind::Human, human, |engine| {
            engine.delete_human(human)
        });
    }

    pub fn create_item(
        &mut self,
        item_type: i32,
        pos: &Vector,
        vel: &Vector,
        rot: &RotMatrix,
    ) -> Option<usize> {
        let point = Point::ItemCreate;
        if !self.hooked(point) {
            return self.engine.create_item(item_type, pos, vel, rot);
        }

        let mut args = vec![Value::from(item_type), Value::from(*pos), Value::from(*rot)];
        if self.pre(point, &mut args) {
            return None;
        }

        let pos = args.get(1).and_then(Value::as_vector).unwrap_or(*pos);
        let rot = args.get(2).and_then(Value::as_rotation).unwrap_or(*rot);
        let id = self.call_through(point, |engine| engine.create_item(item_type, &pos, vel, &rot));
        self.created(point, EntityKind::Item, id)
    }

    pub fn delete_item(&mut self, item: usize) {
        self.delete(Point::ItemDelete, EntityKind::Item, item, |engine| {
            engine.delete_item(item)
        });
    }

    pub fn create_vehicle(
        &mut self,
        vehicle_type: i32,
        pos: &Vector,
        vel: &Vector,
        rot: &RotMatrix,
        color: i32,
    ) -> Option<usize> {
        let point = Point::VehicleCreate;
        if !self.hooked(point) {
            return self.engine.create_vehicle(vehicle_type, pos, vel, rot, color);
        }

        let mut args = vec![
            Value::from(vehicle_type),
            Value::from(*pos),
            Value::from(*rot),
            Value::from(color),
        ];
        if self.pre(point, &mut args) {
            return None;
        }

        let pos = args.get(1).and_then(Value::as_vector).unwrap_or(*pos);
        let rot = args.get(2).and_then(Value::as_rotation).unwrap_or(*rot);
        let id = self.call_through(point, |engine| {
            engine.create_vehicle(vehicle_type, &pos, vel, &rot, color)
        });
        self.created(point, EntityKind::Vehicle, id)
    }

    pub fn delete_vehicle(&mut self, vehicle: usize) {
        self.delete(Point::VehicleDelete, EntityKind::Vehicle, vehicle, |engine| {
            engine.delete_vehicle(vehicle)
        });
    }

    /// No script hooks; only clears stale shadow state for the new body
    pub fn create_rigid_body(
        &mut self,
        body_type: i32,
        pos: &Vector,
        rot: &RotMatrix,
        vel: &Vector,
        scale: &Vector,
        mass: f32,
    ) -> Option<usize> {
        let id = self.call_through(Point::RigidBodyCreate, |engine| {
            engine.create_rigid_body(body_type, pos, rot, vel, scale, mass)
        })?;
        self.env.shadow_mut().clear(EntityKind::Body, id);
        Some(id)
    }

    // ---- items and humans ------------------------------------------------

    /// Vetoed: `false`
    pub fn link_item(
        &mut self,
        item: usize,
        child_item: Option<usize>,
        parent_human: Option<usize>,
        slot: i32,
    ) -> bool {
        self.intercept_with(
            Point::ItemLink,
            || {
                vec![
                    Value::entity(EntityKind::Item, item),
                    Value::entity_or_nil(EntityKind::Item, child_item),
                    Value::entity_or_nil(EntityKind::Human, parent_human),
                    Value::from(slot),
                ]
            },
            |engine| engine.link_item(item, child_item, parent_human, slot),
            false,
            |worked| Value::from(*worked),
        )
    }

    pub fn item_computer_input(&mut self, item: usize, character: u32) {
        self.intercept(
            Point::ItemComputerInput,
            || vec![Value::entity(EntityKind::Item, item), Value::from(character)],
            |engine| engine.item_computer_input(item, character),
        );
    }

    pub fn human_apply_damage(&mut self, human: usize, bone: i32, unknown: i32, damage: i32) {
        self.intercept(
            Point::HumanDamage,
            || {
                vec![
                    Value::entity(EntityKind::Human, human),
                    Value::from(bone),
                    Value::from(damage),
                ]
            },
            |engine| engine.human_apply_damage(human, bone, unknown, damage),
        );
    }

    pub fn human_collision_vehicle(&mut self, human: usize, vehicle: usize) {
        self.intercept(
            Point::HumanCollisionVehicle,
            || {
                vec![
                    Value::entity(EntityKind::Human, human),
                    Value::entity(EntityKind::Vehicle, vehicle),
                ]
            },
            |engine| engine.human_collision_vehicle(human, vehicle),
        );
    }

    pub fn human_grabbing(&mut self, human: usize) {
        self.intercept(
            Point::HumanGrabbing,
            || vec![Value::entity(EntityKind::Human, human)],
            |engine| engine.human_grabbing(human),
        );
    }

    pub fn grenade_explosion(&mut self, item: usize) {
        self.intercept(
            Point::GrenadeExplode,
            || vec![Value::entity(EntityKind::Item, item)],
            |engine| engine.grenade_explosion(item),
        );
    }

    /// Vetoed: `1`
    pub fn server_player_message(&mut self, player: usize, message: &str) -> i32 {
        self.intercept_with(
            Point::PlayerChat,
            || vec![Value::entity(EntityKind::Player, player), Value::from(message)],
            |engine| engine.server_player_message(player, message),
            1,
            |status| Value::from(*status),
        )
    }

    pub fn player_ai(&mut self, player: usize) {
        self.intercept(
            Point::PlayerAI,
            || vec![Value::entity(EntityKind::Player, player)],
            |engine| engine.player_ai(player),
        );
    }

    pub fn player_death_tax(&mut self, player: usize) {
        self.intercept(
            Point::PlayerDeathTax,
            || vec![Value::entity(EntityKind::Player, player)],
            |engine| engine.player_death_tax(player),
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_collision_rigid_body_on_rigid_body(
        &mut self,
        body_a: usize,
        body_b: usize,
        a_local: &Vector,
        b_local: &Vector,
        normal: &Vector,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
    ) {
        self.intercept(
            Point::CollideBodies,
            || {
                vec![
                    Value::entity(EntityKind::Body, body_a),
                    Value::entity(EntityKind::Body, body_b),
                    Value::from(*a_local),
                    Value::from(*b_local),
                    Value::from(*normal),
                    Value::from(a),
                    Value::from(b),
                    Value::from(c),
                    Value::from(d),
                ]
            },
            |engine| {
                engine.add_collision_rigid_body_on_rigid_body(
                    body_a, body_b, a_local, b_local, normal, a, b, c, d,
                )
            },
        );
    }

    // ---- events ----------------------------------------------------------

    pub fn create_event_message(&mut self, speaker_type: i32, message: &str, speaker: i32, distance: i32) {
        self.intercept(
            Point::EventMessage,
            || {
                vec![
                    Value::from(speaker_type),
                    Value::from(message),
                    Value::from(speaker),
                    Value::from(distance),
                ]
            },
            |engine| engine.create_event_message(speaker_type, message, speaker, distance),
        );
    }

    pub fn create_event_update_player(&mut self, player: usize) {
        self.intercept(
            Point::EventUpdatePlayer,
            || vec![Value::entity(EntityKind::Player, player)],
            |engine| engine.create_event_update_player(player),
        );
    }

    pub fn create_event_update_player_finance(&mut self, player: usize) {
        self.intercept(
            Point::EventUpdatePlayerFinance,
            || vec![Value::entity(EntityKind::Player, player)],
            |engine| engine.create_event_update_player_finance(player),
        );
    }

    pub fn create_event_update_vehicle(
        &mut self,
        vehicle: usize,
        update_type: i32,
        part: i32,
        pos: &Vector,
        normal: &Vector,
    ) {
        self.intercept(
            Point::EventUpdateVehicle,
            || {
                vec![
                    Value::entity(EntityKind::Vehicle, vehicle),
                    Value::from(update_type),
                    Value::from(part),
                    Value::from(*pos),
                    Value::from(*normal),
                ]
            },
            |engine| engine.create_event_update_vehicle(vehicle, update_type, part, pos, normal),
        );
    }

    pub fn create_event_bullet_hit(&mut self, unknown: i32, hit_type: i32, pos: &Vector, normal: &Vector) {
        self.intercept(
            Point::EventBulletHit,
            || vec![Value::from(hit_type), Value::from(*pos), Value::from(*normal)],
            |engine| engine.create_event_bullet_hit(unknown, hit_type, pos, normal),
        );
    }

    /// The original runs first; the hook is only consulted on a hit and a
    /// veto turns the hit into a miss
    pub fn line_intersect_human(&mut self, human: usize, pos_a: &Vector, pos_b: &Vector) -> bool {
        let point = Point::LineIntersectHuman;
        if !self.hooked(point) {
            return self.engine.line_intersect_human(human, pos_a, pos_b);
        }

        let hit = self.call_through(point, |engine| engine.line_intersect_human(human, pos_a, pos_b));
        if !hit {
            return false;
        }

        let mut args = vec![
            Value::entity(EntityKind::Human, human),
            Value::from(*pos_a),
            Value::from(*pos_b),
        ];
        !self.pre(point, &mut args)
    }
}
