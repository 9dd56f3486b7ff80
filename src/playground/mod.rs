//! The playground pairs the physics world with the scene graph.
//!
//! Every spawned object is one scene node plus one rigid body created
//! together, and the pair registry is the single authority for per-frame
//! transform propagation and bulk teardown. The static floor is a pair as
//! well; it just lives outside the registry so resets leave it alone.

pub mod clock;
pub mod driver;

pub use clock::FrameClock;
pub use driver::{FixedRateScheduler, FrameScheduler};

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};
use tracing::{debug, info};

use crate::assets::ModelAsset;
use crate::config::SimulationSettings;
use crate::physics::{
    BodyId, CollisionObserver, CollisionShape, ContactParams, MaterialId, PhysicsWorld, RigidBody,
};
use crate::scene::{NodeId, SceneGraph, SceneNode};

// Error types
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum PlaygroundError {
    #[error("Spawn dimensions must be positive, got {value}")]
    InvalidDimensions { value: f32 },

    #[error("Carrier body is not available")]
    CarrierNotReady,

    #[error(transparent)]
    Physics(#[from] crate::physics::PhysicsError),
}

pub type PlaygroundResult<T> = Result<T, PlaygroundError>;

/// One spawned entity: the scene node and rigid body created together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicObject {
    pub node: NodeId,
    pub body: BodyId,
}

pub struct Playground {
    scene: SceneGraph,
    physics: PhysicsWorld,
    objects: Vec<DynamicObject>,
    floor: DynamicObject,
    carrier: Option<BodyId>,
    observer: Arc<dyn CollisionObserver>,
    default_material: MaterialId,
    fixed_timestep: f32,
    max_substeps: u32,
    carrier_push_force: Vec3,
}

impl Playground {
    /// Build a playground from settings: gravity, the default contact
    /// pairing, and the static floor plane. The floor body is rotated so
    /// its +Z normal faces up; the visual floor copies that orientation on
    /// the first update.
    pub fn new(settings: &SimulationSettings, observer: Arc<dyn CollisionObserver>) -> Self {
        let mut physics = PhysicsWorld::new(settings.world.gravity());
        let default_material = physics.materials_mut().register_material("default");
        let params = ContactParams::new(settings.contact.friction, settings.contact.restitution);
        physics
            .materials_mut()
            .add_pair(default_material, default_material, params);
        physics.materials_mut().set_default(params);

        let floor_orientation = Quat::from_axis_angle(Vec3::new(-1.0, 0.0, 0.0), FRAC_PI_2);
        let floor_body = physics.add_body(
            RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO)
                .with_orientation(floor_orientation)
                .with_material(default_material),
        );

        let mut scene = SceneGraph::new();
        let floor_node = scene.insert(
            SceneNode::new("unit_plane", "matte_gray").scaled(Vec3::new(50.0, 50.0, 1.0)),
        );

        Playground {
            scene,
            physics,
            objects: Vec::new(),
            floor: DynamicObject {
                node: floor_node,
                body: floor_body,
            },
            carrier: None,
            observer,
            default_material,
            fixed_timestep: settings.world.fixed_timestep,
            max_substeps: settings.world.max_substeps,
            carrier_push_force: settings.carrier.push_force(),
        }
    }

    /// Spawn a dynamic sphere: a unit sphere node scaled uniformly by the
    /// radius, and a unit-mass sphere body at the same position with the
    /// collision observer attached. Non-positive radii are rejected before
    /// anything is created.
    pub fn spawn_sphere(&mut self, radius: f32, position: Vec3) -> PlaygroundResult<DynamicObject> {
        if !(radius > 0.0) {
            return Err(PlaygroundError::InvalidDimensions { value: radius });
        }
        let node = self.scene.insert(
            SceneNode::new("unit_sphere", "env_mapped")
                .at(position)
                .scaled(Vec3::splat(radius)),
        );
        let body = self.physics.add_body(
            RigidBody::new(CollisionShape::sphere(radius), 1.0, position)
                .with_material(self.default_material),
        );
        self.physics.set_collision_observer(body, self.observer.clone())?;
        let object = DynamicObject { node, body };
        self.objects.push(object);
        debug!(radius, ?position, "sphere spawned");
        Ok(object)
    }

    /// Spawn a dynamic box: a unit box node scaled by the edge lengths, and
    /// a unit-mass box body with matching half-extents. All three
    /// dimensions must be positive.
    pub fn spawn_box(
        &mut self,
        width: f32,
        height: f32,
        depth: f32,
        position: Vec3,
    ) -> PlaygroundResult<DynamicObject> {
        for value in [width, height, depth] {
            if !(value > 0.0) {
                return Err(PlaygroundError::InvalidDimensions { value });
            }
        }
        let size = Vec3::new(width, height, depth);
        let node = self.scene.insert(
            SceneNode::new("unit_box", "env_mapped")
                .at(position)
                .scaled(size),
        );
        let body = self.physics.add_body(
            RigidBody::new(CollisionShape::cuboid(size * 0.5), 1.0, position)
                .with_material(self.default_material),
        );
        self.physics.set_collision_observer(body, self.observer.clone())?;
        let object = DynamicObject { node, body };
        self.objects.push(object);
        debug!(width, height, depth, ?position, "box spawned");
        Ok(object)
    }

    /// Spawn the imported carrier model. Its collider is a box whose
    /// half-extents equal the model's full dimensions, twice the visual
    /// envelope. No material is assigned, so its contacts resolve through
    /// the default pairing.
    pub fn spawn_carrier(
        &mut self,
        model: &ModelAsset,
        position: Vec3,
    ) -> PlaygroundResult<DynamicObject> {
        let size = model.size();
        for value in [size.x, size.y, size.z] {
            if !(value > 0.0) {
                return Err(PlaygroundError::InvalidDimensions { value });
            }
        }
        let node = self.scene.insert(
            SceneNode::new(model.mesh.clone(), "imported")
                .at(position)
                .scaled(size),
        );
        let body = self
            .physics
            .add_body(RigidBody::new(CollisionShape::cuboid(size), 1.0, position));
        self.physics.set_collision_observer(body, self.observer.clone())?;
        let object = DynamicObject { node, body };
        self.objects.push(object);
        self.carrier = Some(body);
        info!(model = %model.name, ?position, "carrier spawned");
        Ok(object)
    }

    /// Shove the carrier along its own axes with the configured force. The
    /// force is applied at the center of mass, so it translates without
    /// spinning.
    pub fn push_carrier(&mut self) -> PlaygroundResult<()> {
        let id = self.carrier.ok_or(PlaygroundError::CarrierNotReady)?;
        let force = self.carrier_push_force;
        match self.physics.body_mut(id) {
            Some(body) => {
                body.apply_local_force(force, Vec3::ZERO);
                debug!(?force, "carrier pushed");
                Ok(())
            }
            None => {
                // torn down behind our back; forget the stale handle
                self.carrier = None;
                Err(PlaygroundError::CarrierNotReady)
            }
        }
    }

    /// Tear down one spawned object: observer detached, body removed, node
    /// removed, registry entry dropped. Repeating is a no-op.
    pub fn remove_object(&mut self, object: DynamicObject) -> bool {
        let Some(index) = self.objects.iter().position(|o| *o == object) else {
            return false;
        };
        self.physics.clear_collision_observer(object.body);
        self.physics.remove_body(object.body);
        self.scene.remove(object.node);
        self.objects.remove(index);
        if self.carrier == Some(object.body) {
            self.carrier = None;
        }
        true
    }

    /// Remove every spawned object in spawn order, each one observer first,
    /// then body, then node. The floor stays. The registry is cleared, so a
    /// second reset finds nothing to do.
    pub fn reset(&mut self) {
        for object in &self.objects {
            self.physics.clear_collision_observer(object.body);
            self.physics.remove_body(object.body);
            self.scene.remove(object.node);
        }
        let removed = self.objects.len();
        self.objects.clear();
        self.carrier = None;
        if removed > 0 {
            info!(removed, "playground reset");
        }
    }

    /// Advance simulation time and propagate transforms. The step fully
    /// completes before any transform is copied. Returns the number of
    /// physics substeps that ran.
    pub fn update(&mut self, delta: f32) -> PlaygroundResult<u32> {
        let substeps = self
            .physics
            .step(self.fixed_timestep, delta, self.max_substeps)?;
        self.sync_transforms();
        Ok(substeps)
    }

    /// Copy position and orientation from each rigid body to its scene
    /// node, for every registered pair and the floor. Scale is untouched;
    /// it belongs to the visual side alone.
    pub fn sync_transforms(&mut self) {
        for object in &self.objects {
            Self::copy_transform(&self.physics, &mut self.scene, *object);
        }
        Self::copy_transform(&self.physics, &mut self.scene, self.floor);
    }

    fn copy_transform(physics: &PhysicsWorld, scene: &mut SceneGraph, object: DynamicObject) {
        if let (Some(body), Some(node)) = (physics.body(object.body), scene.get_mut(object.node)) {
            node.position = body.position;
            node.rotation = body.orientation;
        }
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.physics
    }

    pub fn objects(&self) -> &[DynamicObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn floor(&self) -> DynamicObject {
        self.floor
    }

    pub fn carrier(&self) -> Option<BodyId> {
        self.carrier
    }
}
