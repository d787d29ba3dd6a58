//! Semi-implicit Euler integration plus the steering helpers controllers
//! drive bodies with.

use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

use super::{Actor, ActorRegistry, Body};
use crate::defs::BodyFlags;

impl Body {
    /// Accumulate a force for this frame.  Cleared by [`integrate`].
    #[inline]
    pub fn add_force(&mut self, force: Vec3) {
        self.acceleration += force;
    }

    /// Instant change of velocity.
    #[inline]
    pub fn add_impulse(&mut self, impulse: Vec3) {
        self.velocity += impulse;
    }
}

/// One step for one body:
///
/// ```text
/// a += -v · drag
/// v += a · dt
/// p += v · dt
/// ```
///
/// Ground bodies are pinned to `z = 0`; retired projectiles freeze.
pub fn integrate(body: &mut Body, drag: f32, dt: f32) {
    if body.is_dead() || body.is_projectile_dead() {
        return;
    }

    body.add_force(-body.velocity * drag);
    body.velocity += body.acceleration * dt;
    body.position += body.velocity * dt;
    body.acceleration = Vec3::ZERO;

    if !body.flags.contains(BodyFlags::FLYING) {
        body.position.z = 0.0;
        body.velocity.z = 0.0;
    }
}

/// Integrate every actor in the registry.
pub fn physics_system(actors: &mut ActorRegistry, dt: f32) {
    for (_, actor) in actors.iter_mut() {
        integrate(&mut actor.body, actor.def.drag, dt);
    }
}

impl Actor {
    /// Push toward `direction` (XY only) hard enough that drag settles the
    /// body at `speed`.
    pub fn move_in_direction(&mut self, direction: Vec2, speed: f32) {
        let dir = direction.normalize_or_zero();
        self.body.add_force((dir * speed * self.def.drag).extend(0.0));
    }

    /// Rotate toward `target_yaw` by at most `turn_speed · dt`, taking the
    /// short way round.
    pub fn turn_toward(&mut self, target_yaw: f32, dt: f32) {
        let max_step = self.def.turn_speed.to_radians() * dt;
        let yaw = &mut self.body.orientation.yaw;
        let delta = shortest_angle(*yaw, target_yaw);
        *yaw = wrap_angle(*yaw + delta.clamp(-max_step, max_step));
    }
}

/// Signed difference `to - from` folded into `(-π, π]`.
#[inline]
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    let d = wrap_angle(to - from);
    if d <= -PI { d + TAU } else { d }
}

/// Fold an angle into `(-π, π]`.
#[inline]
pub fn wrap_angle(a: f32) -> f32 {
    let w = (a + PI).rem_euclid(TAU) - PI;
    if w <= -PI { w + TAU } else { w }
}
