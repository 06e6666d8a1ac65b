// src/engine/mod.rs
//! Engine collaborator surface
//!
//! - **Native**: the [`Engine`] trait, one method per intercept point
//! - **Types**: vectors, rotation matrices, entity kinds and references
//! - **Headless**: an in-memory [`Engine`] that only tracks slot occupancy

pub mod headless;
pub mod native;
pub mod types;

pub use headless::HeadlessEngine;
pub use native::Engine;
pub use types::{EntityKind, EntityRef, RotMatrix, Vector};
