//! Minimal chase behaviour for AI-controlled actors: acquire a visible
//! marine, turn toward it, walk at it, and bite once it is in reach.

use glam::Vec2;
use smallvec::SmallVec;

use super::sight::find_visible_target;
use super::weapon::{in_melee_reach, strike_melee};
use super::{ActorHandle, ActorRegistry, Controller};
use crate::defs::Faction;
use crate::world::TileMap;

/* ----------------------------------------------------------------- */
/*  Steering queue: decide with `&registry`, apply with `&mut`        */
/* ----------------------------------------------------------------- */
struct Steer {
    actor: ActorHandle,
    target: ActorHandle,
    toward: Vec2,
    in_reach: bool,
}
type Steers = SmallVec<[Steer; 8]>;

pub fn ai_system(actors: &mut ActorRegistry, map: &TileMap, dt: f32) {
    let mut queue = Steers::new();

    for (handle, actor) in actors.iter() {
        let Some(controller) = actor.controller else {
            continue;
        };
        if !matches!(controller, Controller::Ai { .. }) || !actor.body.is_live() {
            continue;
        }

        // keep a live remembered target, otherwise look for a new one
        let target = controller
            .target()
            .filter(|t| actors.resolve(*t).is_some_and(|a| a.body.is_live()))
            .or_else(|| find_visible_target(map, actors, handle, Faction::Marine));

        if let Some((t, a)) = target.and_then(|t| actors.resolve(t).map(|a| (t, a))) {
            let in_reach = actor
                .def
                .melee
                .is_some_and(|m| in_melee_reach(actors, handle, t, &m));
            queue.push(Steer {
                actor: handle,
                target: t,
                toward: a.body.xy() - actor.body.xy(),
                in_reach,
            });
        }
    }

    for steer in queue {
        let melee = {
            let Some(actor) = actors.resolve_mut(steer.actor) else {
                continue;
            };
            actor.controller = Some(Controller::Ai { target: steer.target });
            if steer.toward != Vec2::ZERO {
                actor.turn_toward(steer.toward.to_angle(), dt);
            }
            if !steer.in_reach {
                let speed = actor.def.walk_speed;
                actor.move_in_direction(actor.body.orientation.forward_xy(), speed);
                continue;
            }
            // hold ground while attacking
            actor.body.velocity.x = 0.0;
            actor.body.velocity.y = 0.0;
            actor.def.melee
        };
        if let Some(melee) = melee {
            strike_melee(actors, steer.actor, steer.target, &melee);
        }
    }
}
