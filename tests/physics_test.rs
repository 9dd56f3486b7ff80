use std::f32::consts::FRAC_PI_2;
use std::sync::{Arc, Mutex};

use glam::{Quat, Vec3};

use tumblebox::audio::{ImpactAudio, ImpactSoundPlayer};
use tumblebox::physics::{
    BodyId, CollisionEvent, CollisionObserver, CollisionShape, ContactParams, PhysicsWorld,
    RigidBody,
};

const DT: f32 = 1.0 / 60.0;

fn world_with_floor(friction: f32, restitution: f32) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.87, 0.0));
    let default = world.materials_mut().register_material("default");
    world
        .materials_mut()
        .set_default(ContactParams::new(friction, restitution));
    world.add_body(
        RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO)
            .with_orientation(Quat::from_axis_angle(Vec3::new(-1.0, 0.0, 0.0), FRAC_PI_2))
            .with_material(default),
    );
    world
}

fn sphere_at(position: Vec3, radius: f32) -> RigidBody {
    RigidBody::new(CollisionShape::sphere(radius), 1.0, position)
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<(BodyId, BodyId, f32)>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<(BodyId, BodyId, f32)> {
        self.events.lock().unwrap().clone()
    }
}

impl CollisionObserver for RecordingObserver {
    fn on_collision(&self, event: &CollisionEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.body, event.other, event.impact_speed));
    }
}

#[test]
fn dynamic_body_falls_under_gravity() {
    let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.87, 0.0));
    let id = world.add_body(sphere_at(Vec3::new(0.0, 10.0, 0.0), 0.5));

    for _ in 0..60 {
        world.step(DT, DT, 3).unwrap();
    }

    let body = world.body(id).unwrap();
    // roughly g/2 after one second, damping shaves a little off
    assert!(body.position.y < 7.0, "fell to {}", body.position.y);
    assert!(body.position.y > 4.0, "fell to {}", body.position.y);
    assert!(body.velocity.y < 0.0);
}

#[test]
fn step_consumes_whole_fixed_increments() {
    let mut world = PhysicsWorld::new(Vec3::ZERO);

    assert_eq!(world.step(DT, 0.0, 3).unwrap(), 0);
    // half a timestep is owed but not yet run
    assert_eq!(world.step(DT, DT * 0.5, 3).unwrap(), 0);
    assert!(world.pending_time() > 0.0);
    // the carried remainder completes one whole step
    assert_eq!(world.step(DT, DT * 0.5, 3).unwrap(), 1);
    assert_eq!(world.pending_time(), 0.0);
    // a long stall is bounded by the substep budget
    assert_eq!(world.step(DT, DT * 10.0, 3).unwrap(), 3);
    assert!(world.pending_time() <= DT * 3.0 + f32::EPSILON);
}

#[test]
fn step_rejects_bad_timesteps() {
    let mut world = PhysicsWorld::new(Vec3::ZERO);
    assert!(world.step(0.0, DT, 3).is_err());
    assert!(world.step(-1.0, DT, 3).is_err());
    assert!(world.step(f32::NAN, DT, 3).is_err());
}

#[test]
fn sphere_settles_on_the_floor() {
    let mut world = world_with_floor(0.1, 0.3);
    let id = world.add_body(sphere_at(Vec3::new(0.0, 3.0, 0.0), 0.5));

    // ten simulated seconds is plenty for the bouncing to die out
    for _ in 0..600 {
        world.step(DT, DT, 3).unwrap();
    }

    let body = world.body(id).unwrap();
    assert!(
        (body.position.y - 0.5).abs() < 0.1,
        "rest height {}",
        body.position.y
    );
    assert!(body.velocity.length() < 0.5);
}

#[test]
fn contact_begin_fires_once_while_touching() {
    let mut world = world_with_floor(0.1, 0.0);
    let id = world.add_body(sphere_at(Vec3::new(0.0, 0.28, 0.0), 0.25));
    let observer = Arc::new(RecordingObserver::default());
    world.set_collision_observer(id, observer.clone()).unwrap();

    for _ in 0..120 {
        world.step(DT, DT, 3).unwrap();
    }

    let events = observer.events();
    assert_eq!(events.len(), 1, "begin fired {} times", events.len());
    let (body, _, impact) = events[0];
    assert_eq!(body, id);
    assert!(impact > 0.5, "impact speed {impact}");
}

#[test]
fn both_sides_observe_a_shared_contact() {
    let mut world = PhysicsWorld::new(Vec3::ZERO);
    let left = world.add_body({
        let mut body = sphere_at(Vec3::new(-0.6, 5.0, 0.0), 0.5);
        body.velocity = Vec3::new(1.0, 0.0, 0.0);
        body
    });
    let right = world.add_body({
        let mut body = sphere_at(Vec3::new(0.6, 5.0, 0.0), 0.5);
        body.velocity = Vec3::new(-1.0, 0.0, 0.0);
        body
    });
    let left_obs = Arc::new(RecordingObserver::default());
    let right_obs = Arc::new(RecordingObserver::default());
    world.set_collision_observer(left, left_obs.clone()).unwrap();
    world.set_collision_observer(right, right_obs.clone()).unwrap();

    for _ in 0..30 {
        world.step(DT, DT, 3).unwrap();
    }

    let left_events = left_obs.events();
    let right_events = right_obs.events();
    assert_eq!(left_events.len(), 1);
    assert_eq!(right_events.len(), 1);
    // each side names itself first and sees the same impact speed
    assert_eq!(left_events[0].0, left);
    assert_eq!(left_events[0].1, right);
    assert_eq!(right_events[0].0, right);
    assert_eq!(right_events[0].1, left);
    assert_eq!(left_events[0].2, right_events[0].2);
    assert!(left_events[0].2 > 1.5, "closing speed {}", left_events[0].2);
}

#[test]
fn impact_threshold_filters_sound_triggers() {
    // controlled impacts: no gravity, sphere already in contact so the
    // begin event carries the chosen approach speed
    let gentle = Arc::new(ImpactSoundPlayer::new(
        Arc::new(ImpactAudio::disabled()),
        1.4,
        1.0,
    ));
    let mut world = PhysicsWorld::new(Vec3::ZERO);
    world.materials_mut().set_default(ContactParams::new(0.1, 0.3));
    world.add_body(
        RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO)
            .with_orientation(Quat::from_axis_angle(Vec3::new(-1.0, 0.0, 0.0), FRAC_PI_2)),
    );
    let id = world.add_body({
        let mut body = sphere_at(Vec3::new(0.0, 0.49, 0.0), 0.5);
        body.velocity = Vec3::new(0.0, -1.0, 0.0);
        body
    });
    world.set_collision_observer(id, gentle.clone()).unwrap();
    for _ in 0..180 {
        world.step(DT, DT, 3).unwrap();
    }
    assert_eq!(gentle.trigger_count(), 0, "a soft contact must stay silent");

    let hard = Arc::new(ImpactSoundPlayer::new(
        Arc::new(ImpactAudio::disabled()),
        1.4,
        1.0,
    ));
    let mut world = PhysicsWorld::new(Vec3::ZERO);
    world.materials_mut().set_default(ContactParams::new(0.1, 0.3));
    world.add_body(
        RigidBody::new_static(CollisionShape::plane(), Vec3::ZERO)
            .with_orientation(Quat::from_axis_angle(Vec3::new(-1.0, 0.0, 0.0), FRAC_PI_2)),
    );
    let id = world.add_body({
        let mut body = sphere_at(Vec3::new(0.0, 0.49, 0.0), 0.5);
        body.velocity = Vec3::new(0.0, -2.0, 0.0);
        body
    });
    world.set_collision_observer(id, hard.clone()).unwrap();
    for _ in 0..180 {
        world.step(DT, DT, 3).unwrap();
    }
    assert_eq!(hard.trigger_count(), 1, "a hard contact fires exactly once");
}

#[test]
fn remove_body_is_idempotent() {
    let mut world = world_with_floor(0.1, 0.3);
    let id = world.add_body(sphere_at(Vec3::new(0.0, 3.0, 0.0), 0.5));
    assert_eq!(world.body_count(), 2);

    assert!(world.remove_body(id));
    assert_eq!(world.body_count(), 1);
    assert!(world.body(id).is_none());

    assert!(!world.remove_body(id));
    assert_eq!(world.body_count(), 1);
}

#[test]
fn removed_body_stops_emitting_events() {
    let mut world = world_with_floor(0.1, 0.0);
    let id = world.add_body(sphere_at(Vec3::new(0.0, 0.2, 0.0), 0.25));
    let observer = Arc::new(RecordingObserver::default());
    world.set_collision_observer(id, observer.clone()).unwrap();

    world.step(DT, DT, 3).unwrap();
    let seen = observer.events().len();
    assert_eq!(seen, 1);

    world.remove_body(id);
    for _ in 0..30 {
        world.step(DT, DT, 3).unwrap();
    }
    assert_eq!(observer.events().len(), seen);
}

#[test]
fn identical_delta_sequences_reproduce_states() {
    // jittery frame times, the same on both runs
    let deltas = [0.016, 0.019, 0.013, 0.017, 0.021, 0.015, 0.018, 0.014];

    fn run(deltas: &[f32]) -> Vec<(Vec3, Quat)> {
        let mut world = world_with_floor(0.1, 0.3);
        let sphere = world.add_body(sphere_at(Vec3::new(0.0, 3.0, 0.0), 0.4));
        let boxy = world.add_body(RigidBody::new(
            CollisionShape::cuboid(Vec3::splat(0.3)),
            1.0,
            Vec3::new(0.2, 5.0, 0.1),
        ));
        for _ in 0..50 {
            for &delta in deltas {
                world.step(DT, delta, 3).unwrap();
            }
        }
        [sphere, boxy]
            .iter()
            .map(|id| {
                let body = world.body(*id).unwrap();
                (body.position, body.orientation)
            })
            .collect()
    }

    assert_eq!(run(&deltas), run(&deltas));
}

#[test]
fn chunked_deltas_match_uniform_stepping() {
    fn build() -> (PhysicsWorld, BodyId, BodyId) {
        let mut world = world_with_floor(0.1, 0.3);
        let sphere = world.add_body(sphere_at(Vec3::new(0.0, 3.0, 0.0), 0.4));
        let boxy = world.add_body(RigidBody::new(
            CollisionShape::cuboid(Vec3::splat(0.3)),
            1.0,
            Vec3::new(0.2, 5.0, 0.1),
        ));
        (world, sphere, boxy)
    }

    let (mut uniform, u_sphere, u_box) = build();
    for _ in 0..6 {
        uniform.step(DT, DT, 3).unwrap();
    }

    // same six substeps delivered in uneven frames
    let (mut chunked, c_sphere, c_box) = build();
    chunked.step(DT, DT * 2.0, 3).unwrap();
    chunked.step(DT, DT, 3).unwrap();
    chunked.step(DT, DT * 2.0, 3).unwrap();
    chunked.step(DT, DT, 3).unwrap();

    assert_eq!(
        uniform.body(u_sphere).unwrap().position,
        chunked.body(c_sphere).unwrap().position
    );
    assert_eq!(
        uniform.body(u_box).unwrap().position,
        chunked.body(c_box).unwrap().position
    );
    assert_eq!(
        uniform.body(u_sphere).unwrap().orientation,
        chunked.body(c_sphere).unwrap().orientation
    );
}
