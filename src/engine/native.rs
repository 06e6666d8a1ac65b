// src/engine/native.rs
//! Engine collaborator interface
//!
//! One method per intercept point. Implementations are the original, unhooked
//! behavior; the dispatcher decides when they run. Slot-returning calls
//! report `None` where the native engine returns `-1`.

use crate::engine::types::{RotMatrix, Vector};

/// The native simulation behind the intercept points
pub trait Engine {
    fn reset_game(&mut self);

    fn logic_simulation(&mut self);
    fn logic_simulation_race(&mut self);
    fn logic_simulation_round(&mut self);
    fn logic_simulation_world(&mut self);
    fn logic_simulation_terminator(&mut self);
    fn logic_simulation_coop(&mut self);
    fn logic_simulation_versus(&mut self);
    fn logic_player_actions(&mut self, player: usize);

    fn physics_simulation(&mut self);
    fn bullet_simulation(&mut self);

    /// Process inbound packets; returns the native status code
    fn server_receive(&mut self) -> i32;
    fn server_send(&mut self);
    fn server_send_connect_response(&mut self, address: u32, port: u32, message: &str);

    fn save_accounts_server(&mut self);
    fn create_account_by_join_ticket(&mut self, identifier: i32, ticket: u32) -> Option<usize>;

    fn create_player(&mut self) -> Option<usize>;
    fn delete_player(&mut self, player: usize);
    fn create_human(&mut self, pos: &Vector, rot: &RotMatrix, player: usize) -> Option<usize>;
    fn delete_human(&mut self, human: usize);
    fn create_item(
        &mut self,
        item_type: i32,
        pos: &Vector,
        vel: &Vector,
        rot: &RotMatrix,
    ) -> Option<usize>;
    fn delete_item(&mut self, item: usize);
    fn create_vehicle(
        &mut self,
        vehicle_type: i32,
        pos: &Vector,
        vel: &Vector,
        rot: &RotMatrix,
        color: i32,
    ) -> Option<usize>;
    fn delete_vehicle(&mut self, vehicle: usize);
    fn create_rigid_body(
        &mut self,
        body_type: i32,
        pos: &Vector,
        rot: &RotMatrix,
        vel: &Vector,
        scale: &Vector,
        mass: f32,
    ) -> Option<usize>;

    /// Returns whether the link succeeded
    fn link_item(
        &mut self,
        item: usize,
        child_item: Option<usize>,
        parent_human: Option<usize>,
        slot: i32,
    ) -> bool;
    fn item_computer_input(&mut self, item: usize, character: u32);
    fn human_apply_damage(&mut self, human: usize, bone: i32, unknown: i32, damage: i32);
    fn human_collision_vehicle(&mut self, human: usize, vehicle: usize);
    fn human_grabbing(&mut self, human: usize);
    fn grenade_explosion(&mut self, item: usize);
    fn server_player_message(&mut self, player: usize, message: &str) -> i32;
    fn player_ai(&mut self, player: usize);
    fn player_death_tax(&mut self, player: usize);

    #[allow(clippy::too_many_arguments)]
    fn add_collision_rigid_body_on_rigid_body(
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
    );

    fn create_event_message(&mut self, speaker_type: i32, message: &str, speaker: i32, distance: i32);
    fn create_event_update_player(&mut self, player: usize);
    fn create_event_update_player_finance(&mut self, player: usize);
    fn create_event_update_vehicle(
        &mut self,
        vehicle: usize,
        update_type: i32,
        part: i32,
        pos: &Vector,
        normal: &Vector,
    );
    fn create_event_bullet_hit(&mut self, unknown: i32, hit_type: i32, pos: &Vector, normal: &Vector);

    /// Returns whether the segment hits the human
    fn line_intersect_human(&mut self, human: usize, pos_a: &Vector, pos_b: &Vector) -> bool;
}
