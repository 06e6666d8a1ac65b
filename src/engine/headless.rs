// src/engine/headless.rs
//! In-memory engine without a simulation
//!
//! Tracks slot occupancy per entity kind. With [`HeadlessEngine::with_call_log`]
//! it also records every original call in order, so the dispatch protocol
//! can be observed end to end. The bundled binary runs without the log.

use crate::engine::native::Engine;
use crate::engine::types::{EntityKind, RotMatrix, Vector};
use crate::utils::config::EntityLimits;
use std::collections::HashSet;
use tracing::trace;

/// Fixed-size slot allocator (lowest free slot first)
#[derive(Debug, Clone)]
struct SlotAllocator {
    occupied: Vec<bool>,
}

impl SlotAllocator {
    fn new(capacity: usize) -> Self {
        Self {
            occupied: vec![false; capacity],
        }
    }

    fn allocate(&mut self) -> Option<usize> {
        let slot = self.occupied.iter().position(|used| !used)?;
        self.occupied[slot] = true;
        Some(slot)
    }

    fn release(&mut self, slot: usize) {
        if let Some(used) = self.occupied.get_mut(slot) {
            *used = false;
        }
    }

    fn is_occupied(&self, slot: usize) -> bool {
        self.occupied.get(slot).copied().unwrap_or(false)
    }

    fn count(&self) -> usize {
        self.occupied.iter().filter(|used| **used).count()
    }

    fn clear(&mut self) {
        self.occupied.iter_mut().for_each(|used| *used = false);
    }
}

/// Engine that only keeps books
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    slots: Vec<SlotAllocator>,

    /// Keep `calls`, `connect_responses`, `chat` and `human_spawns`
    logging: bool,

    /// Original calls, in invocation order
    calls: Vec<String>,

    /// Ticks simulated by `logic_simulation`
    ticks: u64,

    /// Value returned by `server_receive`
    receive_status: i32,

    /// Humans that `line_intersect_human` reports as hit
    hit_humans: HashSet<usize>,

    /// Messages passed to `server_send_connect_response`
    connect_responses: Vec<String>,

    /// Chat messages passed to `server_player_message`
    chat: Vec<String>,

    /// Positions passed to `create_human`
    human_spawns: Vec<Vector>,
}

impl HeadlessEngine {
    pub fn new(limits: EntityLimits) -> Self {
        let slots = EntityKind::ALL
            .iter()
            .map(|kind| SlotAllocator::new(limits.capacity(*kind)))
            .collect();

        Self {
            slots,
            logging: false,
            calls: Vec::new(),
            ticks: 0,
            receive_status: 0,
            hit_humans: HashSet::new(),
            connect_responses: Vec::new(),
            chat: Vec::new(),
            human_spawns: Vec::new(),
        }
    }

    /// Record original calls and their payloads; the logs are unbounded
    pub fn with_call_log(mut self) -> Self {
        self.logging = true;
        self
    }

    pub fn is_logging(&self) -> bool {
        self.logging
    }

    fn record(&mut self, call: &str) {
        trace!("engine call: {}", call);
        if self.logging {
            self.calls.push(call.to_string());
        }
    }

    fn allocate(&mut self, kind: EntityKind) -> Option<usize> {
        self.slots[kind.index()].allocate()
    }

    fn release(&mut self, kind: EntityKind, slot: usize) {
        self.slots[kind.index()].release(slot);
    }

    /// Original calls observed so far
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Number of times `call` was invoked
    pub fn call_count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_occupied(&self, kind: EntityKind, slot: usize) -> bool {
        self.slots[kind.index()].is_occupied(slot)
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.slots[kind.index()].count()
    }

    pub fn set_receive_status(&mut self, status: i32) {
        self.receive_status = status;
    }

    pub fn set_human_hit(&mut self, human: usize, hit: bool) {
        if hit {
            self.hit_humans.insert(human);
        } else {
            self.hit_humans.remove(&human);
        }
    }

    pub fn connect_responses(&self) -> &[String] {
        &self.connect_responses
    }

    pub fn chat(&self) -> &[String] {
        &self.chat
    }

    pub fn human_spawns(&self) -> &[Vector] {
        &self.human_spawns
    }
}

impl Engine for HeadlessEngine {
    fn reset_game(&mut self) {
        self.record("reset_game");
        // Accounts persist across rounds
        for kind in EntityKind::ALL {
            if kind != EntityKind::Account {
                self.slots[kind.index()].clear();
            }
        }
    }

    fn logic_simulation(&mut self) {
        self.record("logic_simulation");
        self.ticks += 1;
    }

    fn logic_simulation_race(&mut self) {
        self.record("logic_simulation_race");
    }

    fn logic_simulation_round(&mut self) {
        self.record("logic_simulation_round");
    }

    fn logic_simulation_world(&mut self) {
        self.record("logic_simulation_world");
    }

    fn logic_simulation_terminator(&mut self) {
        self.record("logic_simulation_terminator");
    }

    fn logic_simulation_coop(&mut self) {
        self.record("logic_simulation_coop");
    }

    fn logic_simulation_versus(&mut self) {
        self.record("logic_simulation_versus");
    }

    fn logic_player_actions(&mut self, _player: usize) {
        self.record("logic_player_actions");
    }

    fn physics_simulation(&mut self) {
        self.record("physics_simulation");
    }

    fn bullet_simulation(&mut self) {
        self.record("bullet_simulation");
    }

    fn server_receive(&mut self) -> i32 {
        self.record("server_receive");
        self.receive_status
    }

    fn server_send(&mut self) {
        self.record("server_send");
    }

    fn server_send_connect_response(&mut self, _address: u32, _port: u32, message: &str) {
        self.record("server_send_connect_response");
        if self.logging {
            self.connect_responses.push(message.to_string());
        }
    }

    fn save_accounts_server(&mut self) {
        self.record("save_accounts_server");
    }

    fn create_account_by_join_ticket(&mut self, identifier: i32, _ticket: u32) -> Option<usize> {
        self.record("create_account_by_join_ticket");
        if identifier < 0 {
            return None;
        }
        self.allocate(EntityKind::Account)
    }

    fn create_player(&mut self) -> Option<usize> {
        self.record("create_player");
        self.allocate(EntityKind::Player)
    }

    fn delete_player(&mut self, player: usize) {
        self.record("delete_player");
        self.release(EntityKind::Player, player);
    }

    fn create_human(&mut self, pos: &Vector, _rot: &RotMatrix, _player: usize) -> Option<usize> {
        self.record("create_human");
        if self.logging {
            self.human_spawns.push(*pos);
        }
        self.allocate(EntityKind::Human)
    }

    fn delete_human(&mut self, human: usize) {
        self.record("delete_human");
        self.release(EntityKind::Human, human);
    }

    fn create_item(
        &mut self,
        _item_type: i32,
        _pos: &Vector,
        _vel: &Vector,
        _rot: &RotMatrix,
    ) -> Option<usize> {
        self.record("create_item");
        self.allocate(EntityKind::Item)
    }

    fn delete_item(&mut self, item: usize) {
        self.record("delete_item");
        self.release(EntityKind::Item, item);
    }

    fn create_vehicle(
        &mut self,
        _vehicle_type: i32,
        _pos: &Vector,
        _vel: &Vector,
        _rot: &RotMatrix,
        _color: i32,
    ) -> Option<usize> {
        self.record("create_vehicle");
        self.allocate(EntityKind::Vehicle)
    }

    fn delete_vehicle(&mut self, vehicle: usize) {
        self.record("delete_vehicle");
        self.release(EntityKind::Vehicle, vehicle);
    }

    fn create_rigid_body(
        &mut self,
        _body_type: i32,
        _pos: &Vector,
        _rot: &RotMatrix,
        _vel: &Vector,
        _scale: &Vector,
        _mass: f32,
    ) -> Option<usize> {
        self.record("create_rigid_body");
        self.allocate(EntityKind::Body)
    }

    fn link_item(
        &mut self,
        item: usize,
        child_item: Option<usize>,
        parent_human: Option<usize>,
        _slot: i32,
    ) -> bool {
        self.record("link_item");
        let item_ok = self.is_occupied(EntityKind::Item, item);
        let child_ok = child_item.map_or(true, |c| self.is_occupied(EntityKind::Item, c));
        let parent_ok = parent_human.map_or(true, |h| self.is_occupied(EntityKind::Human, h));
        item_ok && child_ok && parent_ok
    }

    fn item_computer_input(&mut self, _item: usize, _character: u32) {
        self.record("item_computer_input");
    }

    fn human_apply_damage(&mut self, _human: usize, _bone: i32, _unknown: i32, _damage: i32) {
        self.record("human_apply_damage");
    }

    fn human_collision_vehicle(&mut self, _human: usize, _vehicle: usize) {
        self.record("human_collision_vehicle");
    }

    fn human_grabbing(&mut self, _human: usize) {
        self.record("human_grabbing");
    }

    fn grenade_explosion(&mut self, _item: usize) {
        self.record("grenade_explosion");
    }

    fn server_player_message(&mut self, _player: usize, message: &str) -> i32 {
        self.record("server_player_message");
        if self.logging {
            self.chat.push(message.to_string());
        }
        0
    }

    fn player_ai(&mut self, _player: usize) {
        self.record("player_ai");
    }

    fn player_death_tax(&mut self, _player: usize) {
        self.record("player_death_tax");
    }

    fn add_collision_rigid_body_on_rigid_body(
        &mut self,
        _body_a: usize,
        _body_b: usize,
        _a_local: &Vector,
        _b_local: &Vector,
        _normal: &Vector,
        _a: f32,
        _b: f32,
        _c: f32,
        _d: f32,
    ) {
        self.record("add_collision_rigid_body_on_rigid_body");
    }

    fn create_event_message(&mut self, _speaker_type: i32, _message: &str, _speaker: i32, _distance: i32) {
        self.record("create_event_message");
    }

    fn create_event_update_player(&mut self, _player: usize) {
        self.record("create_event_update_player");
    }

    fn create_event_update_player_finance(&mut self, _player: usize) {
        self.record("create_event_update_player_finance");
    }

    fn create_event_update_vehicle(
        &mut self,
        _vehicle: usize,
        _update_type: i32,
        _part: i32,
        _pos: &Vector,
        _normal: &Vector,
    ) {
        self.record("create_event_update_vehicle");
    }

    fn create_event_bullet_hit(&mut self, _unknown: i32, _hit_type: i32, _pos: &Vector, _normal: &Vector) {
        self.record("create_event_bullet_hit");
    }

    fn line_intersect_human(&mut self, human: usize, _pos_a: &Vector, _pos_b: &Vector) -> bool {
        self.record("line_intersect_human");
        self.hit_humans.contains(&human)
    }
}
