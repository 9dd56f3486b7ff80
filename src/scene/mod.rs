//! Visual-side state: a flat graph of transform-carrying nodes.
//!
//! Nodes hold presentation data only. The simulation writes transforms in
//! each frame; nothing here feeds back into physics.

pub mod graph;

pub use graph::SceneGraph;

use glam::{Quat, Vec3};

/// Identifier of a node in a [`SceneGraph`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A renderable node: world transform plus mesh and material references.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh_id: String,
    pub material_id: String,
}

impl SceneNode {
    pub fn new(mesh_id: impl Into<String>, material_id: impl Into<String>) -> Self {
        SceneNode {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh_id: mesh_id.into(),
            material_id: material_id.into(),
        }
    }

    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn scaled(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}
