//! Collision geometry and the bounds/inertia math derived from it.

use glam::{Mat3, Quat, Vec3};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// Collision geometry attached to a rigid body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Solid sphere of the given radius.
    Sphere { radius: f32 },
    /// Box described by half-extents along each local axis.
    Box { half_extents: Vec3 },
    /// Infinite half-space. The outward normal is local +Z rotated by the
    /// body's orientation.
    Plane,
}

impl CollisionShape {
    pub fn sphere(radius: f32) -> Self {
        CollisionShape::Sphere { radius }
    }

    pub fn cuboid(half_extents: Vec3) -> Self {
        CollisionShape::Box { half_extents }
    }

    pub fn plane() -> Self {
        CollisionShape::Plane
    }

    /// World-space bounds for a body at `position` with `orientation`.
    /// Planes are unbounded and report an infinite box.
    pub fn world_aabb(&self, position: Vec3, orientation: Quat) -> Aabb {
        match *self {
            CollisionShape::Sphere { radius } => Aabb::new(
                position - Vec3::splat(radius),
                position + Vec3::splat(radius),
            ),
            CollisionShape::Box { half_extents } => {
                let rot = Mat3::from_quat(orientation);
                // extent along each world axis is the sum of the projected
                // local axes
                let extent = Vec3::new(
                    rot.x_axis.x.abs() * half_extents.x
                        + rot.y_axis.x.abs() * half_extents.y
                        + rot.z_axis.x.abs() * half_extents.z,
                    rot.x_axis.y.abs() * half_extents.x
                        + rot.y_axis.y.abs() * half_extents.y
                        + rot.z_axis.y.abs() * half_extents.z,
                    rot.x_axis.z.abs() * half_extents.x
                        + rot.y_axis.z.abs() * half_extents.y
                        + rot.z_axis.z.abs() * half_extents.z,
                );
                Aabb::new(position - extent, position + extent)
            }
            CollisionShape::Plane => Aabb::new(
                Vec3::splat(f32::NEG_INFINITY),
                Vec3::splat(f32::INFINITY),
            ),
        }
    }

    /// Diagonal of the local inertia tensor for the given mass. Zero mass
    /// (and planes, which are always static) yield a zero tensor.
    pub fn inertia(&self, mass: f32) -> Vec3 {
        if mass <= 0.0 {
            return Vec3::ZERO;
        }
        match *self {
            CollisionShape::Sphere { radius } => {
                Vec3::splat(0.4 * mass * radius * radius)
            }
            CollisionShape::Box { half_extents } => {
                let e = half_extents * 2.0;
                let factor = mass / 12.0;
                Vec3::new(
                    factor * (e.y * e.y + e.z * e.z),
                    factor * (e.x * e.x + e.z * e.z),
                    factor * (e.x * e.x + e.y * e.y),
                )
            }
            CollisionShape::Plane => Vec3::ZERO,
        }
    }
}
