// src/engine/types.rs
//! Plain engine value types shared by the engine trait and hook payloads

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kinds that carry per-slot shadow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Account,
    Player,
    Human,
    Item,
    Vehicle,
    Body,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Account,
        EntityKind::Player,
        EntityKind::Human,
        EntityKind::Item,
        EntityKind::Vehicle,
        EntityKind::Body,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            EntityKind::Account => 0,
            EntityKind::Player => 1,
            EntityKind::Human => 2,
            EntityKind::Item => 3,
            EntityKind::Vehicle => 4,
            EntityKind::Body => 5,
        }
    }
}

/// Reference to an entity slot, as handed to handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub slot: usize,
}

impl EntityRef {
    pub fn new(kind: EntityKind, slot: usize) -> Self {
        Self { kind, slot }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.kind, self.slot)
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Row-major 3x3 rotation matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotMatrix {
    pub rows: [[f32; 3]; 3],
}

impl Default for RotMatrix {
    fn default() -> Self {
        Self {
            rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }
}

/// Format a packed IPv4 address the way the engine stores it (first octet
/// in the lowest byte)
pub fn address_from_integer(address: u32) -> String {
    let b = address.to_le_bytes();
    format!("{}.{}.{}.{}", b[0], b[1], b[2], b[3])
}
