//! Rigid-body simulation core
//!
//! This module owns everything on the physical side of the playground:
//! collision shapes, contact materials, body storage, broadphase pair
//! culling, narrowphase contact generation, the impulse solver, and the
//! fixed-timestep world that ties them together.

pub mod body;
pub mod broadphase;
pub mod contact;
pub mod events;
pub mod material;
pub mod shape;
pub mod world;

// Re-export main types for convenience
pub use body::{BodyId, RigidBody};
pub use contact::Contact;
pub use events::{CollisionEvent, CollisionObserver};
pub use material::{ContactMaterialTable, ContactParams, MaterialId};
pub use shape::{Aabb, CollisionShape};
pub use world::PhysicsWorld;

// Error types
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PhysicsError {
    #[error("Unknown body: {id:?}")]
    UnknownBody { id: BodyId },

    #[error("Invalid fixed timestep: {dt}")]
    InvalidTimestep { dt: f32 },

    #[error("{reason}")]
    Other { reason: String },
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
