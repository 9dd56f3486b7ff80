// Tumblebox: an interactive rigid-body playground
// Fixed-timestep simulation kept independent of frame pacing

#![allow(warnings)]

pub mod app;
pub mod assets;
pub mod audio;
pub mod config;
pub mod physics;
pub mod playground;
pub mod scene;
pub mod utils;

// Re-export commonly used types
pub use config::{load_simulation_settings, save_simulation_settings, SimulationSettings};
pub use physics::{BodyId, CollisionEvent, CollisionObserver, PhysicsWorld, RigidBody};
pub use playground::{DynamicObject, Playground};
pub use scene::{SceneGraph, SceneNode};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
