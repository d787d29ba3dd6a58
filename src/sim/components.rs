use glam::{Vec2, Vec3};

use super::ActorHandle;
use crate::defs::{ActorDef, BodyFlags, StatusFlags};

/// Yaw / pitch in radians.  x-forward, y-left, z-up; positive pitch looks down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    #[inline]
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Unit forward vector.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cy * cp, sy * cp, -sp)
    }

    #[inline]
    pub fn forward_xy(&self) -> Vec2 {
        Vec2::from_angle(self.yaw)
    }
}

/// Physical aspect of an actor: a vertical cylinder standing on `position`.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    pub orientation: Orientation,
    pub radius: f32,
    pub height: f32,
    pub flags: BodyFlags,
    pub status: StatusFlags,
}

impl Body {
    pub fn from_def(def: &ActorDef, position: Vec3, orientation: Orientation) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            acceleration: Vec3::ZERO,
            orientation,
            radius: def.radius,
            height: def.height,
            flags: def.flags,
            status: StatusFlags::empty(),
        }
    }

    #[inline]
    pub fn simulated(&self) -> bool {
        self.flags.contains(BodyFlags::SIMULATED)
    }
    #[inline]
    pub fn collides_with_world(&self) -> bool {
        self.flags.contains(BodyFlags::COLLIDES_WITH_WORLD)
    }
    #[inline]
    pub fn collides_with_actors(&self) -> bool {
        self.flags.contains(BodyFlags::COLLIDES_WITH_ACTORS)
    }
    #[inline]
    pub fn is_projectile(&self) -> bool {
        self.flags.contains(BodyFlags::PROJECTILE)
    }
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.status.contains(StatusFlags::DEAD)
    }
    #[inline]
    pub fn is_corpse(&self) -> bool {
        self.status.contains(StatusFlags::CORPSE)
    }
    #[inline]
    pub fn is_projectile_dead(&self) -> bool {
        self.status.contains(StatusFlags::PROJECTILE_DEAD)
    }

    /// Neither dead nor a corpse.
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.status.intersects(StatusFlags::DEAD | StatusFlags::CORPSE)
    }

    #[inline]
    pub fn xy(&self) -> Vec2 {
        self.position.truncate()
    }

    #[inline]
    pub fn set_xy(&mut self, xy: Vec2) {
        self.position.x = xy.x;
        self.position.y = xy.y;
    }

    /// Middle of the cylinder.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + Vec3::Z * (self.height * 0.5)
    }
}

/// Who drives an actor.  The physics core never looks inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Player { index: usize },
    Ai { target: ActorHandle },
}

impl Controller {
    /// React to being hurt: AI turns on whoever shot it.
    pub fn on_damaged(&mut self, attacker: ActorHandle) {
        if let Controller::Ai { target } = self {
            if attacker.is_valid() {
                *target = attacker;
            }
        }
    }

    pub fn target(&self) -> Option<ActorHandle> {
        match self {
            Controller::Ai { target } if target.is_valid() => Some(*target),
            _ => None,
        }
    }
}

/// One registry entry: body + definition + gameplay state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub def: &'static ActorDef,
    pub body: Body,
    pub health: f32,
    pub controller: Option<Controller>,
    /// Shooter of a projectile; `ActorHandle::INVALID` for everything else.
    pub owner: ActorHandle,
    /// Seconds left before a corpse is flagged dead.
    pub corpse_timer: f32,
    /// Seconds until this actor may attack again.
    pub refire_timer: f32,
}

impl Actor {
    pub fn new(def: &'static ActorDef, position: Vec3, orientation: Orientation) -> Self {
        Self {
            def,
            body: Body::from_def(def, position, orientation),
            health: def.health,
            controller: None,
            owner: ActorHandle::INVALID,
            corpse_timer: 0.0,
            refire_timer: 0.0,
        }
    }

    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Weapon cooled down?
    #[inline]
    pub fn can_attack(&self) -> bool {
        self.refire_timer <= 0.0
    }

    /// World-space eye position.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.body.position + Vec3::Z * self.def.eye_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::actor_by_name;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn forward_follows_yaw_and_pitch() {
        let f = Orientation::new(0.0, 0.0).forward();
        assert!((f - Vec3::X).length() < 1e-6);

        let f = Orientation::new(FRAC_PI_2, 0.0).forward();
        assert!((f - Vec3::Y).length() < 1e-6);

        // positive pitch looks down
        let f = Orientation::new(0.0, FRAC_PI_2).forward();
        assert!((f + Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn body_copies_definition() {
        let def = actor_by_name("Demon").unwrap();
        let actor = Actor::new(def, Vec3::new(1.0, 2.0, 0.0), Orientation::default());
        assert_eq!(actor.body.radius, def.radius);
        assert!(actor.body.simulated());
        assert!(actor.body.is_live());
        assert_eq!(actor.health, def.health);
        assert!((actor.eye().z - def.eye_height).abs() < 1e-6);
    }

    #[test]
    fn ai_retargets_on_damage() {
        let attacker = ActorHandle::new(3, 7);
        let mut ai = Controller::Ai {
            target: ActorHandle::INVALID,
        };
        assert_eq!(ai.target(), None);
        ai.on_damaged(attacker);
        assert_eq!(ai.target(), Some(attacker));

        let mut player = Controller::Player { index: 0 };
        player.on_damaged(attacker);
        assert_eq!(player.target(), None);
    }
}
