//! Health, corpses and the path from "hit" to "swept".
//!
//! ```text
//! live ──damage≤0──▶ CORPSE ──corpse_lifetime──▶ DEAD ──sweep──▶ freed
//! projectile ──contact──▶ PROJECTILE_DEAD ──next frame──▶ DEAD
//! ```

use glam::Vec3;

use super::{Actor, ActorHandle, ActorRegistry};
use crate::defs::StatusFlags;

impl Actor {
    /// Apply `amount` damage from `attacker`.  Returns `true` if this blow
    /// turned the actor into a corpse.  Corpses and the dead ignore damage.
    pub fn damage(&mut self, amount: f32, attacker: ActorHandle) -> bool {
        if !self.body.is_live() {
            return false;
        }

        self.health -= amount;
        if let Some(controller) = self.controller.as_mut() {
            controller.on_damaged(attacker);
        }

        if self.health > 0.0 {
            return false;
        }

        log::debug!("{} killed by {attacker:?}", self.def.name);
        self.body.status |= StatusFlags::CORPSE;
        self.body.velocity = Vec3::ZERO;
        self.corpse_timer = self.def.corpse_lifetime;
        true
    }
}

/// Advance corpse and refire timers and promote retired projectiles to dead.
pub fn lifecycle_system(actors: &mut ActorRegistry, dt: f32) {
    for (_, actor) in actors.iter_mut() {
        actor.refire_timer = (actor.refire_timer - dt).max(0.0);

        let body = &mut actor.body;
        if body.is_dead() {
            continue;
        }
        if body.is_projectile_dead() {
            body.status |= StatusFlags::DEAD;
        } else if body.is_corpse() {
            actor.corpse_timer -= dt;
            if actor.corpse_timer <= 0.0 {
                body.status |= StatusFlags::DEAD;
            }
        }
    }
}
