//! Collision begin events and the observer seam they are delivered through.

use std::time::SystemTime;

use super::body::BodyId;

/// Emitted when two bodies start touching. Carries the closing speed along
/// the contact normal measured before the solver runs, positive when the
/// bodies approach each other.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub body: BodyId,
    pub other: BodyId,
    pub impact_speed: f32,
    pub timestamp: SystemTime,
}

impl CollisionEvent {
    pub fn new(body: BodyId, other: BodyId, impact_speed: f32) -> Self {
        CollisionEvent {
            body,
            other,
            impact_speed,
            timestamp: SystemTime::now(),
        }
    }
}

/// Per-body reaction hook. The world invokes it once per contact begin
/// while stepping; continued touching stays silent until the bodies
/// separate and meet again.
pub trait CollisionObserver: Send + Sync {
    fn on_collision(&self, event: &CollisionEvent);
}
