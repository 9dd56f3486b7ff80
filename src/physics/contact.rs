//! Narrowphase contact generation for each supported shape pairing.

use glam::{Mat3, Quat, Vec3};

use super::body::RigidBody;
use super::shape::CollisionShape;

/// A single contact between two overlapping bodies.
///
/// `a` and `b` are slot indices into the world's body storage. The normal
/// points from `b` toward `a`: following it separates `a` from `b`.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: usize,
    pub b: usize,
    pub point: Vec3,
    pub normal: Vec3,
    pub depth: f32,
}

fn plane_normal(orientation: Quat) -> Vec3 {
    orientation * Vec3::Z
}

pub fn sphere_sphere(
    a: usize,
    b: usize,
    pos_a: Vec3,
    radius_a: f32,
    pos_b: Vec3,
    radius_b: f32,
) -> Option<Contact> {
    let delta = pos_a - pos_b;
    let dist_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;
    if dist_sq >= radius_sum * radius_sum {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 0.0 { delta / dist } else { Vec3::Y };
    Some(Contact {
        a,
        b,
        point: pos_b + normal * radius_b,
        normal,
        depth: radius_sum - dist,
    })
}

pub fn sphere_plane(
    a: usize,
    b: usize,
    sphere_pos: Vec3,
    radius: f32,
    plane_origin: Vec3,
    plane_normal: Vec3,
) -> Option<Contact> {
    let dist = (sphere_pos - plane_origin).dot(plane_normal);
    if dist >= radius {
        return None;
    }
    Some(Contact {
        a,
        b,
        point: sphere_pos - plane_normal * dist,
        normal: plane_normal,
        depth: radius - dist,
    })
}

/// Deepest box vertex against the plane. One contact point is enough for
/// the iterative solver to settle resting boxes.
pub fn box_plane(
    a: usize,
    b: usize,
    box_pos: Vec3,
    box_rot: Quat,
    half_extents: Vec3,
    plane_origin: Vec3,
    plane_normal: Vec3,
) -> Option<Contact> {
    let rot = Mat3::from_quat(box_rot);
    let axes = [
        rot.x_axis * half_extents.x,
        rot.y_axis * half_extents.y,
        rot.z_axis * half_extents.z,
    ];
    let mut min_dist = f32::MAX;
    let mut deepest = Vec3::ZERO;
    for sx in [-1.0f32, 1.0] {
        for sy in [-1.0f32, 1.0] {
            for sz in [-1.0f32, 1.0] {
                let vertex = box_pos + axes[0] * sx + axes[1] * sy + axes[2] * sz;
                let dist = (vertex - plane_origin).dot(plane_normal);
                if dist < min_dist {
                    min_dist = dist;
                    deepest = vertex;
                }
            }
        }
    }
    if min_dist >= 0.0 {
        return None;
    }
    Some(Contact {
        a,
        b,
        point: deepest,
        normal: plane_normal,
        depth: -min_dist,
    })
}

pub fn sphere_box(
    a: usize,
    b: usize,
    sphere_pos: Vec3,
    radius: f32,
    box_pos: Vec3,
    box_rot: Quat,
    half_extents: Vec3,
) -> Option<Contact> {
    // work in the box's local frame
    let local_pos = box_rot.inverse() * (sphere_pos - box_pos);
    let clamped = local_pos.clamp(-half_extents, half_extents);
    let delta = local_pos - clamped;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    let local_normal = if dist > 0.0 {
        delta / dist
    } else {
        // center inside the box: push out along the axis of least penetration
        let penetration = half_extents - local_pos.abs();
        if penetration.x < penetration.y && penetration.x < penetration.z {
            Vec3::X * local_pos.x.signum()
        } else if penetration.y < penetration.z {
            Vec3::Y * local_pos.y.signum()
        } else {
            Vec3::Z * local_pos.z.signum()
        }
    };
    Some(Contact {
        a,
        b,
        point: box_pos + box_rot * clamped,
        normal: box_rot * local_normal,
        depth: radius - dist,
    })
}

/// Box-box overlap on world-aligned bounds, separating along the axis of
/// least overlap. Rotation is ignored here; tumbling stacks trade some
/// contact accuracy for simplicity.
pub fn box_box(
    a: usize,
    b: usize,
    pos_a: Vec3,
    half_a: Vec3,
    pos_b: Vec3,
    half_b: Vec3,
) -> Option<Contact> {
    let delta = pos_a - pos_b;
    let overlap = Vec3::new(
        (half_a.x + half_b.x) - delta.x.abs(),
        (half_a.y + half_b.y) - delta.y.abs(),
        (half_a.z + half_b.z) - delta.z.abs(),
    );
    if overlap.x <= 0.0 || overlap.y <= 0.0 || overlap.z <= 0.0 {
        return None;
    }
    let (normal, depth) = if overlap.x < overlap.y && overlap.x < overlap.z {
        (Vec3::X * delta.x.signum(), overlap.x)
    } else if overlap.y < overlap.z {
        (Vec3::Y * delta.y.signum(), overlap.y)
    } else {
        (Vec3::Z * delta.z.signum(), overlap.z)
    };
    Some(Contact {
        a,
        b,
        point: (pos_a + pos_b) * 0.5,
        normal,
        depth,
    })
}

/// Dispatch a candidate pair to the matching shape routine. The returned
/// contact's roles may be swapped relative to the arguments so that its
/// normal convention holds.
pub(crate) fn generate(
    a_idx: usize,
    b_idx: usize,
    body_a: &RigidBody,
    body_b: &RigidBody,
) -> Option<Contact> {
    match (body_a.shape, body_b.shape) {
        (CollisionShape::Sphere { radius: ra }, CollisionShape::Sphere { radius: rb }) => {
            sphere_sphere(a_idx, b_idx, body_a.position, ra, body_b.position, rb)
        }
        (CollisionShape::Sphere { radius }, CollisionShape::Plane) => sphere_plane(
            a_idx,
            b_idx,
            body_a.position,
            radius,
            body_b.position,
            plane_normal(body_b.orientation),
        ),
        (CollisionShape::Plane, CollisionShape::Sphere { radius }) => sphere_plane(
            b_idx,
            a_idx,
            body_b.position,
            radius,
            body_a.position,
            plane_normal(body_a.orientation),
        ),
        (CollisionShape::Box { half_extents }, CollisionShape::Plane) => box_plane(
            a_idx,
            b_idx,
            body_a.position,
            body_a.orientation,
            half_extents,
            body_b.position,
            plane_normal(body_b.orientation),
        ),
        (CollisionShape::Plane, CollisionShape::Box { half_extents }) => box_plane(
            b_idx,
            a_idx,
            body_b.position,
            body_b.orientation,
            half_extents,
            body_a.position,
            plane_normal(body_a.orientation),
        ),
        (CollisionShape::Sphere { radius }, CollisionShape::Box { half_extents }) => sphere_box(
            a_idx,
            b_idx,
            body_a.position,
            radius,
            body_b.position,
            body_b.orientation,
            half_extents,
        ),
        (CollisionShape::Box { half_extents }, CollisionShape::Sphere { radius }) => sphere_box(
            b_idx,
            a_idx,
            body_b.position,
            radius,
            body_a.position,
            body_a.orientation,
            half_extents,
        ),
        (CollisionShape::Box { half_extents: ha }, CollisionShape::Box { half_extents: hb }) => {
            box_box(a_idx, b_idx, body_a.position, ha, body_b.position, hb)
        }
        (CollisionShape::Plane, CollisionShape::Plane) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn up_plane() -> (Vec3, Vec3) {
        (Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn sphere_plane_reports_penetration_depth() {
        let (origin, normal) = up_plane();
        let contact = sphere_plane(0, 1, Vec3::new(0.0, 0.4, 0.0), 0.5, origin, normal)
            .expect("overlapping sphere should contact");
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.depth - 0.1).abs() < 1e-6);
        assert!(contact.point.y.abs() < 1e-6);

        assert!(sphere_plane(0, 1, Vec3::new(0.0, 0.6, 0.0), 0.5, origin, normal).is_none());
    }

    #[test]
    fn sphere_sphere_normal_points_at_the_first_body() {
        let contact = sphere_sphere(
            0,
            1,
            Vec3::new(0.0, 1.5, 0.0),
            1.0,
            Vec3::ZERO,
            1.0,
        )
        .expect("overlapping spheres should contact");
        assert!(contact.normal.y > 0.99);
        assert!((contact.depth - 0.5).abs() < 1e-6);
    }

    #[test]
    fn box_plane_finds_the_deepest_vertex() {
        let (origin, normal) = up_plane();
        // tilted 45 degrees around Z, one edge dips below the plane
        let rot = Quat::from_axis_angle(Vec3::Z, FRAC_PI_2 * 0.5);
        let contact = box_plane(0, 1, Vec3::new(0.0, 0.6, 0.0), rot, Vec3::splat(0.5), origin, normal)
            .expect("tilted box should touch");
        // corner reaches sqrt(2)/2 ~ 0.707 below center
        assert!(contact.depth > 0.1 && contact.depth < 0.2);
        assert!(contact.point.y < 0.0);
    }

    #[test]
    fn sphere_inside_box_pushes_out_of_the_nearest_face() {
        let contact = sphere_box(
            0,
            1,
            Vec3::new(0.9, 0.0, 0.0),
            0.2,
            Vec3::ZERO,
            Quat::IDENTITY,
            Vec3::ONE,
        )
        .expect("embedded sphere should contact");
        assert!(contact.normal.x > 0.99);
    }

    #[test]
    fn box_box_separates_along_least_overlap() {
        let contact = box_box(
            0,
            1,
            Vec3::new(0.0, 0.9, 0.0),
            Vec3::splat(0.5),
            Vec3::ZERO,
            Vec3::splat(0.5),
        )
        .expect("stacked boxes should contact");
        assert_eq!(contact.normal, Vec3::Y);
        assert!((contact.depth - 0.1).abs() < 1e-6);
    }

    #[test]
    fn generate_keeps_the_normal_convention_when_roles_swap() {
        let plane = RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO)
            .with_orientation(Quat::from_axis_angle(Vec3::new(-1.0, 0.0, 0.0), FRAC_PI_2));
        let sphere = RigidBody::new(CollisionShape::sphere(0.5), 1.0, Vec3::new(0.0, 0.3, 0.0));

        // plane listed first: the contact should still name the sphere as `a`
        let contact = generate(0, 1, &plane, &sphere).expect("pair should contact");
        assert_eq!(contact.a, 1);
        assert_eq!(contact.b, 0);
        assert!(contact.normal.y > 0.99);
    }
}
