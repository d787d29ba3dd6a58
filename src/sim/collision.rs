//! Discrete overlap resolution run once per frame after integration.
//!
//! Nothing here is swept: bodies are teleported out of whatever they
//! overlap *now*.  Order matters and is fixed by the frame runner:
//! projectiles → actor pairs → tiles, so the world always gets the last
//! word and nobody ends a frame inside a wall.

use glam::Vec2;

use super::{ActorRegistry, Body};
use crate::defs::StatusFlags;
use crate::world::{
    SLAB_TOP, TileMap, push_disc_out_of_aabb2, push_disc_out_of_disc, push_discs_out_of_each_other,
    z_cylinders_overlap,
};

/// The four edge neighbours a disc can reach from its own tile.
const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/* ================================================================= */
/*  Actor vs. actor                                                  */
/* ================================================================= */

/// Separate every overlapping pair of bodies, each unordered pair once.
pub fn collide_actors(actors: &mut ActorRegistry) {
    let n = actors.slot_count();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some((a, b)) = actors.pair_mut(i, j) {
                collide_bodies(&mut a.body, &mut b.body);
            }
        }
    }
}

/// Resolve one pair.  Returns `true` if anything moved.
///
/// | `a` simulated | `b` simulated | effect                    |
/// |---------------|---------------|---------------------------|
/// | no            | no            | none                      |
/// | yes           | no            | `a` pushed fully out      |
/// | no            | yes           | `b` pushed fully out      |
/// | yes           | yes           | each moves half the depth |
pub fn collide_bodies(a: &mut Body, b: &mut Body) -> bool {
    if !takes_part(a) || !takes_part(b) {
        return false;
    }
    if !z_cylinders_overlap(a.position, a.height, a.radius, b.position, b.height, b.radius) {
        return false;
    }

    match (a.simulated(), b.simulated()) {
        (false, false) => false,
        (true, false) => push_one(a, b),
        (false, true) => push_one(b, a),
        (true, true) => {
            let (mut pa, mut pb) = (a.xy(), b.xy());
            let moved = push_discs_out_of_each_other(&mut pa, a.radius, &mut pb, b.radius);
            a.set_xy(pa);
            b.set_xy(pb);
            moved
        }
    }
}

#[inline]
fn takes_part(body: &Body) -> bool {
    body.is_live() && body.collides_with_actors() && !body.is_projectile()
}

fn push_one(mobile: &mut Body, fixed: &Body) -> bool {
    let mut p = mobile.xy();
    let moved = push_disc_out_of_disc(&mut p, mobile.radius, fixed.xy(), fixed.radius);
    mobile.set_xy(p);
    moved
}

/* ================================================================= */
/*  Projectile vs. actor                                             */
/* ================================================================= */

/// Retire every projectile touching a body other than its shooter,
/// applying the projectile's damage and knock-back.  Returns the number
/// of hits.
pub fn collide_projectiles(actors: &mut ActorRegistry) -> usize {
    let mut hits = 0;
    let n = actors.slot_count();

    for i in 0..n {
        let in_flight = actors
            .handle_at(i)
            .and_then(|h| actors.resolve(h))
            .is_some_and(|a| {
                a.body.is_projectile() && a.body.is_live() && !a.body.is_projectile_dead()
            });
        if !in_flight {
            continue;
        }

        for j in 0..n {
            let Some(victim_handle) = actors.handle_at(j) else {
                continue;
            };
            let Some((shot, victim)) = actors.pair_mut(i, j) else {
                continue;
            };
            if victim_handle == shot.owner || !takes_part(&victim.body) {
                continue;
            }
            let (s, v) = (&shot.body, &victim.body);
            let touching =
                z_cylinders_overlap(s.position, s.height, s.radius, v.position, v.height, v.radius);
            if !touching {
                continue;
            }

            shot.body.status |= StatusFlags::PROJECTILE_DEAD;
            if victim.body.simulated() {
                let heading = shot.body.velocity.truncate().normalize_or_zero();
                let push = heading * shot.def.impulse_on_collide;
                victim.body.velocity += push.extend(0.0);
            }
            log::debug!("{} struck {} ({victim_handle:?})", shot.def.name, victim.def.name);
            victim.damage(shot.def.damage_on_collide, shot.owner);
            hits += 1;
            break;
        }
    }
    hits
}

/* ================================================================= */
/*  Actor vs. tiles                                                  */
/* ================================================================= */

/// Keep every world-colliding body inside the slab and out of walls.
pub fn collide_actors_with_map(actors: &mut ActorRegistry, map: &TileMap) {
    for (_, actor) in actors.iter_mut() {
        collide_body_with_map(&mut actor.body, map);
    }
}

/// Returns `true` on any contact.  A projectile that touches anything is
/// flagged [`StatusFlags::PROJECTILE_DEAD`] and ignored from then on.
pub fn collide_body_with_map(body: &mut Body, map: &TileMap) -> bool {
    if !body.collides_with_world() || body.is_dead() {
        return false;
    }
    if body.is_projectile() && body.is_projectile_dead() {
        return false;
    }

    let mut contact = false;

    /* ----- floor / ceiling ----------------------------------------- */
    let top = (SLAB_TOP - body.height).max(0.0);
    if body.position.z > top {
        body.position.z = top;
        contact = true;
    } else if body.position.z < 0.0 {
        body.position.z = 0.0;
        contact = true;
    }

    /* ----- edge neighbours ----------------------------------------- */
    let tile = TileMap::tile_coords_of(body.xy());
    let mut pos = body.xy();

    for (dx, dy) in NEIGHBOURS {
        let (x, y) = (tile.x + dx, tile.y + dy);
        if !map.is_solid(x, y) {
            continue;
        }
        if edge_gap(pos, x, y, dx, dy) < body.radius
            && push_disc_out_of_aabb2(&mut pos, body.radius, &map.bounds_2d(x, y))
        {
            contact = true;
        }
    }
    body.set_xy(pos);

    if contact && body.is_projectile() {
        log::trace!("projectile hit world near {tile:?}");
        body.status |= StatusFlags::PROJECTILE_DEAD;
    }
    contact
}

/// Distance from `p` to the shared edge with neighbour tile `(x, y)`,
/// reached by stepping `(dx, dy)`.
#[inline]
fn edge_gap(p: Vec2, x: i32, y: i32, dx: i32, dy: i32) -> f32 {
    match (dx, dy) {
        (1, _) => x as f32 - p.x,
        (-1, _) => p.x - (x + 1) as f32,
        (_, 1) => y as f32 - p.y,
        _ => p.y - (y + 1) as f32,
    }
}
