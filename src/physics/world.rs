//! The stepping world: body storage, fixed-timestep accumulation, contact
//! solving and collision event delivery.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::{Quat, Vec3};
use tracing::{debug, trace};

use super::body::{BodyId, RigidBody};
use super::broadphase::sweep_and_prune;
use super::contact::{self, Contact};
use super::events::{CollisionEvent, CollisionObserver};
use super::material::ContactMaterialTable;
use super::shape::Aabb;
use super::{PhysicsError, PhysicsResult};

const SOLVER_ITERATIONS: usize = 10;
const PENETRATION_SLOP: f32 = 0.01;
const CORRECTION_FACTOR: f32 = 0.2;

/// Rigid-body world advanced in fixed increments.
///
/// Wall-clock time handed to [`step`](Self::step) goes into an internal
/// accumulator; the simulation only ever integrates whole `fixed_dt`
/// substeps, so results depend on total simulated time and never on how
/// frame deltas were sliced.
pub struct PhysicsWorld {
    pub gravity: Vec3,
    bodies: Vec<RigidBody>,
    slot_ids: Vec<BodyId>,
    slots: HashMap<BodyId, usize>,
    observers: HashMap<BodyId, Arc<dyn CollisionObserver>>,
    materials: ContactMaterialTable,
    touching: HashSet<(BodyId, BodyId)>,
    accumulator: f32,
    next_id: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: Vec3) -> Self {
        PhysicsWorld {
            gravity,
            bodies: Vec::new(),
            slot_ids: Vec::new(),
            slots: HashMap::new(),
            observers: HashMap::new(),
            materials: ContactMaterialTable::new(),
            touching: HashSet::new(),
            accumulator: 0.0,
            next_id: 0,
        }
    }

    pub fn materials(&self) -> &ContactMaterialTable {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut ContactMaterialTable {
        &mut self.materials
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn body(&self, id: BodyId) -> Option<&RigidBody> {
        self.slots.get(&id).map(|&slot| &self.bodies[slot])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        match self.slots.get(&id) {
            Some(&slot) => self.bodies.get_mut(slot),
            None => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &RigidBody)> {
        self.slot_ids.iter().copied().zip(self.bodies.iter())
    }

    /// Simulated time still owed from previous `step` calls.
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }

    pub fn add_body(&mut self, body: RigidBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, self.bodies.len());
        self.slot_ids.push(id);
        self.bodies.push(body);
        trace!(?id, "body added");
        id
    }

    /// Remove a body along with its observer and any touching records.
    /// Unknown or already removed ids are a no-op returning `false`.
    pub fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        self.bodies.swap_remove(slot);
        self.slot_ids.swap_remove(slot);
        if slot < self.bodies.len() {
            // the swapped-in body changed slots
            let moved = self.slot_ids[slot];
            self.slots.insert(moved, slot);
        }
        self.observers.remove(&id);
        self.touching.retain(|&(x, y)| x != id && y != id);
        trace!(?id, "body removed");
        true
    }

    /// Attach the reaction hook invoked when `id` begins touching another
    /// body. Replaces any previous observer for that body.
    pub fn set_collision_observer(
        &mut self,
        id: BodyId,
        observer: Arc<dyn CollisionObserver>,
    ) -> PhysicsResult<()> {
        if !self.slots.contains_key(&id) {
            return Err(PhysicsError::UnknownBody { id });
        }
        self.observers.insert(id, observer);
        Ok(())
    }

    /// Detach the observer, if any. Safe on unknown ids.
    pub fn clear_collision_observer(&mut self, id: BodyId) {
        self.observers.remove(&id);
    }

    /// Advance the simulation by `elapsed` seconds of wall time, running at
    /// most `max_substeps` whole `fixed_dt` substeps. Returns how many
    /// substeps actually ran.
    ///
    /// The sub-`fixed_dt` remainder carries over to the next call. Debt
    /// beyond `max_substeps * fixed_dt` is dropped so a long stall slows
    /// the simulation down instead of spiraling it.
    pub fn step(&mut self, fixed_dt: f32, elapsed: f32, max_substeps: u32) -> PhysicsResult<u32> {
        if !fixed_dt.is_finite() || fixed_dt <= 0.0 {
            return Err(PhysicsError::InvalidTimestep { dt: fixed_dt });
        }
        self.accumulator += elapsed.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= fixed_dt && substeps < max_substeps {
            self.substep(fixed_dt);
            self.accumulator -= fixed_dt;
            substeps += 1;
        }

        let max_debt = fixed_dt * max_substeps as f32;
        if self.accumulator > max_debt {
            debug!(
                dropped = self.accumulator - max_debt,
                "step budget exhausted, dropping excess simulation debt"
            );
            self.accumulator = max_debt;
        }
        Ok(substeps)
    }

    fn substep(&mut self, dt: f32) {
        self.integrate_velocities(dt);
        let contacts = self.detect_contacts();
        // impact speeds are read before the solver changes velocities
        self.dispatch_begin_events(&contacts);
        self.solve_contacts(&contacts);
        self.integrate_positions(dt);
        self.update_touching(&contacts);
    }

    fn integrate_velocities(&mut self, dt: f32) {
        let gravity = self.gravity;
        for body in &mut self.bodies {
            if !body.is_static() {
                let weight = gravity * body.mass();
                body.apply_force(weight);
                body.velocity += body.force * body.inv_mass() * dt;
                body.angular_velocity += body.inv_inertia() * body.torque * dt;
                body.velocity *= (1.0 - body.linear_damping).powf(dt);
                body.angular_velocity *= (1.0 - body.angular_damping).powf(dt);
            }
            body.clear_accumulators();
        }
    }

    fn detect_contacts(&self) -> Vec<Contact> {
        let aabbs: Vec<Aabb> = self
            .bodies
            .iter()
            .map(|body| body.shape.world_aabb(body.position, body.orientation))
            .collect();
        let mut contacts = Vec::new();
        for (i, j) in sweep_and_prune(&aabbs) {
            let a = &self.bodies[i];
            let b = &self.bodies[j];
            if a.is_static() && b.is_static() {
                continue;
            }
            if let Some(contact) = contact::generate(i, j, a, b) {
                contacts.push(contact);
            }
        }
        contacts
    }

    /// Closing speed along the contact normal, positive when the bodies
    /// approach each other.
    fn closing_speed(&self, contact: &Contact) -> f32 {
        let a = &self.bodies[contact.a];
        let b = &self.bodies[contact.b];
        let relative = a.velocity_at_point(contact.point) - b.velocity_at_point(contact.point);
        -relative.dot(contact.normal)
    }

    fn dispatch_begin_events(&self, contacts: &[Contact]) {
        let mut pending: Vec<(Arc<dyn CollisionObserver>, CollisionEvent)> = Vec::new();
        for contact in contacts {
            let id_a = self.slot_ids[contact.a];
            let id_b = self.slot_ids[contact.b];
            if self.touching.contains(&pair_key(id_a, id_b)) {
                continue;
            }
            let impact_speed = self.closing_speed(contact);
            if let Some(observer) = self.observers.get(&id_a) {
                pending.push((observer.clone(), CollisionEvent::new(id_a, id_b, impact_speed)));
            }
            if let Some(observer) = self.observers.get(&id_b) {
                pending.push((observer.clone(), CollisionEvent::new(id_b, id_a, impact_speed)));
            }
        }
        for (observer, event) in pending {
            trace!(
                body = ?event.body,
                other = ?event.other,
                impact = event.impact_speed,
                "contact begin"
            );
            observer.on_collision(&event);
        }
    }

    fn solve_contacts(&mut self, contacts: &[Contact]) {
        for _ in 0..SOLVER_ITERATIONS {
            for contact in contacts {
                self.resolve_contact(contact);
            }
        }
    }

    fn resolve_contact(&mut self, contact: &Contact) {
        let params = {
            let a = &self.bodies[contact.a];
            let b = &self.bodies[contact.b];
            self.materials.lookup(a.material, b.material)
        };
        let (a, b) = pair_mut(&mut self.bodies, contact.a, contact.b);

        let inv_mass_sum = a.inv_mass() + b.inv_mass();
        if inv_mass_sum == 0.0 {
            return;
        }

        let normal = contact.normal;
        let relative = a.velocity_at_point(contact.point) - b.velocity_at_point(contact.point);
        let vn = relative.dot(normal);

        // impulses only for approaching bodies; separating pairs still get
        // their penetration corrected below
        if vn < 0.0 {
            let r_a = contact.point - a.position;
            let r_b = contact.point - b.position;
            let rn_a = r_a.cross(normal);
            let rn_b = r_b.cross(normal);
            let k = inv_mass_sum
                + rn_a.dot(a.inv_inertia() * rn_a)
                + rn_b.dot(b.inv_inertia() * rn_b);
            let j = -(1.0 + params.restitution) * vn / k;
            let impulse = normal * j;
            a.apply_impulse_at_point(impulse, contact.point);
            b.apply_impulse_at_point(-impulse, contact.point);

            // Coulomb friction clamped by the normal impulse
            let tangent = (relative - normal * vn).normalize_or_zero();
            if tangent != Vec3::ZERO {
                let vt = relative.dot(tangent);
                let jt = (-vt / k).clamp(-j * params.friction, j * params.friction);
                let friction_impulse = tangent * jt;
                a.apply_impulse_at_point(friction_impulse, contact.point);
                b.apply_impulse_at_point(-friction_impulse, contact.point);
            }
        }

        let correction =
            (contact.depth - PENETRATION_SLOP).max(0.0) * CORRECTION_FACTOR / inv_mass_sum;
        if correction > 0.0 {
            a.position += normal * correction * a.inv_mass();
            b.position -= normal * correction * b.inv_mass();
        }
    }

    fn integrate_positions(&mut self, dt: f32) {
        for body in &mut self.bodies {
            if body.is_static() {
                continue;
            }
            body.position += body.velocity * dt;
            let w = body.angular_velocity;
            let q = body.orientation;
            let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q * (0.5 * dt);
            body.orientation = (q + dq).normalize();
        }
    }

    fn update_touching(&mut self, contacts: &[Contact]) {
        self.touching.clear();
        for contact in contacts {
            let key = pair_key(self.slot_ids[contact.a], self.slot_ids[contact.b]);
            self.touching.insert(key);
        }
    }
}

fn pair_key(a: BodyId, b: BodyId) -> (BodyId, BodyId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Mutable references to two distinct slots of the body storage.
fn pair_mut(bodies: &mut [RigidBody], a: usize, b: usize) -> (&mut RigidBody, &mut RigidBody) {
    debug_assert_ne!(a, b);
    if a < b {
        let (left, right) = bodies.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = bodies.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::CollisionShape;

    #[test]
    fn pair_mut_respects_contact_roles() {
        let mut bodies = vec![
            RigidBody::new(CollisionShape::sphere(1.0), 1.0, Vec3::ZERO),
            RigidBody::new(CollisionShape::sphere(2.0), 1.0, Vec3::ONE),
        ];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert_eq!(a.position, Vec3::ONE);
        assert_eq!(b.position, Vec3::ZERO);
    }

    #[test]
    fn removal_reindexes_swapped_bodies() {
        let mut world = PhysicsWorld::new(Vec3::ZERO);
        let first = world.add_body(RigidBody::new(
            CollisionShape::sphere(1.0),
            1.0,
            Vec3::new(1.0, 0.0, 0.0),
        ));
        let second = world.add_body(RigidBody::new(
            CollisionShape::sphere(1.0),
            1.0,
            Vec3::new(2.0, 0.0, 0.0),
        ));
        let third = world.add_body(RigidBody::new(
            CollisionShape::sphere(1.0),
            1.0,
            Vec3::new(3.0, 0.0, 0.0),
        ));

        assert!(world.remove_body(first));
        // the last body moved into the vacated slot; handles must still
        // resolve to the right data
        assert_eq!(world.body(third).map(|b| b.position.x), Some(3.0));
        assert_eq!(world.body(second).map(|b| b.position.x), Some(2.0));
        assert!(world.body(first).is_none());
        assert_eq!(world.body_count(), 2);
    }
}
