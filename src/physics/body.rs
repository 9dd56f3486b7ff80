//! Rigid bodies: mass properties, motion state and force accumulation.

use glam::{Quat, Vec3};

use super::material::MaterialId;
use super::shape::CollisionShape;

/// Stable handle to a body in a world. Ids are never reused, so a handle
/// kept across a removal stays invalid instead of aliasing a new body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// A simulated rigid body.
///
/// Mass zero makes the body static: it never integrates and acts as an
/// immovable obstacle. Any positive mass makes it dynamic.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub shape: CollisionShape,
    pub material: Option<MaterialId>,
    pub linear_damping: f32,
    pub angular_damping: f32,
    mass: f32,
    inv_mass: f32,
    inv_inertia: Vec3,
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
}

impl RigidBody {
    pub fn new(shape: CollisionShape, mass: f32, position: Vec3) -> Self {
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        let inertia = shape.inertia(mass);
        let inv_inertia = if inertia.x > 0.0 && inertia.y > 0.0 && inertia.z > 0.0 {
            Vec3::new(1.0 / inertia.x, 1.0 / inertia.y, 1.0 / inertia.z)
        } else {
            Vec3::ZERO
        };
        RigidBody {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            shape,
            material: None,
            linear_damping: 0.01,
            angular_damping: 0.01,
            mass,
            inv_mass,
            inv_inertia,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
        }
    }

    /// Static body: infinite mass, never moves.
    pub fn new_static(shape: CollisionShape, position: Vec3) -> Self {
        Self::new(shape, 0.0, position)
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: MaterialId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn inv_inertia(&self) -> Vec3 {
        self.inv_inertia
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Accumulate a force at the center of mass for the next substep.
    pub fn apply_force(&mut self, force: Vec3) {
        if !self.is_static() {
            self.force += force;
        }
    }

    /// Accumulate a force acting at an offset from the center of mass,
    /// producing torque as well.
    pub fn apply_force_at_point(&mut self, force: Vec3, relative_point: Vec3) {
        if !self.is_static() {
            self.force += force;
            self.torque += relative_point.cross(force);
        }
    }

    /// Force and application point given in the body's local frame. Both
    /// are rotated into world space with the current orientation before
    /// accumulation.
    pub fn apply_local_force(&mut self, local_force: Vec3, local_point: Vec3) {
        let world_force = self.orientation * local_force;
        let relative_point = self.orientation * local_point;
        self.apply_force_at_point(world_force, relative_point);
    }

    /// Instantaneous velocity change at the center of mass.
    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if !self.is_static() {
            self.velocity += impulse * self.inv_mass;
        }
    }

    /// Instantaneous velocity change applied at a world-space point.
    pub fn apply_impulse_at_point(&mut self, impulse: Vec3, point: Vec3) {
        if !self.is_static() {
            self.velocity += impulse * self.inv_mass;
            let r = point - self.position;
            self.angular_velocity += self.inv_inertia * r.cross(impulse);
        }
    }

    /// Velocity of the material point at world position `point`, combining
    /// linear and rotational motion.
    pub fn velocity_at_point(&self, point: Vec3) -> Vec3 {
        let r = point - self.position;
        self.velocity + self.angular_velocity.cross(r)
    }

    pub(crate) fn clear_accumulators(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_bodies_ignore_forces_and_impulses() {
        let mut body = RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO);
        body.apply_force(Vec3::new(100.0, 0.0, 0.0));
        body.apply_impulse(Vec3::new(0.0, 50.0, 0.0));
        assert_eq!(body.force, Vec3::ZERO);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert!(body.is_static());
    }

    #[test]
    fn local_force_rotates_with_the_body() {
        let mut body = RigidBody::new(
            CollisionShape::cuboid(Vec3::ONE),
            1.0,
            Vec3::ZERO,
        )
        .with_orientation(Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2));
        // local +X now points along world -Z
        body.apply_local_force(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO);
        assert!(body.force.z < -9.9);
        assert!(body.force.x.abs() < 1e-4);
        assert_eq!(body.torque, Vec3::ZERO);
    }

    #[test]
    fn offset_impulse_spins_the_body() {
        let mut body = RigidBody::new(CollisionShape::sphere(1.0), 1.0, Vec3::ZERO);
        body.apply_impulse_at_point(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(body.velocity.y > 0.0);
        assert!(body.angular_velocity.z > 0.0);

        let edge_velocity = body.velocity_at_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(edge_velocity.y > body.velocity.y);
    }
}
