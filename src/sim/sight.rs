//! Vision-cone + line-of-sight queries used by AI controllers.

use glam::Vec2;

use super::{ActorHandle, ActorRegistry};
use crate::defs::Faction;
use crate::raycast::{RaycastQuery, raycast_all};
use crate::world::TileMap;

/// Is `point` inside the sector of radius `radius` and full aperture
/// `aperture` (radians) opening from `apex` along `yaw`?
pub fn is_point_inside_oriented_sector_2d(
    point: Vec2,
    apex: Vec2,
    yaw: f32,
    aperture: f32,
    radius: f32,
) -> bool {
    let offset = point - apex;
    let dist_sq = offset.length_squared();
    if dist_sq > radius * radius {
        return false;
    }
    if dist_sq == 0.0 {
        return true;
    }
    Vec2::from_angle(yaw).angle_to(offset).abs() <= aperture * 0.5
}

/// Can `looker` see the middle of `target`?  Walls, the slab and other
/// actors all block.
pub fn has_line_of_sight(
    map: &TileMap,
    actors: &ActorRegistry,
    looker: ActorHandle,
    target: ActorHandle,
) -> bool {
    let (Some(from), Some(to)) = (actors.resolve(looker), actors.resolve(target)) else {
        return false;
    };
    let eye = from.eye();
    let aim = to.body.center();
    let distance = eye.distance(aim);
    if distance == 0.0 {
        return true;
    }

    let query = RaycastQuery::new(eye, aim - eye, distance);
    let hit = raycast_all(map, actors, &query, &[looker]);
    hit.actor == Some(target) || !hit.did_impact()
}

/// Nearest live actor of `faction` inside `looker`'s vision cone with a
/// clear line of sight.
pub fn find_visible_target(
    map: &TileMap,
    actors: &ActorRegistry,
    looker: ActorHandle,
    faction: Faction,
) -> Option<ActorHandle> {
    let me = actors.resolve(looker)?;
    let apex = me.body.xy();
    let yaw = me.body.orientation.yaw;
    let aperture = me.def.sight_angle.to_radians();
    let radius = me.def.sight_radius;

    actors
        .iter()
        .filter(|(h, a)| *h != looker && a.body.is_live() && a.def.faction == faction)
        .filter(|(_, a)| {
            is_point_inside_oriented_sector_2d(a.body.xy(), apex, yaw, aperture, radius)
        })
        .filter(|(h, _)| has_line_of_sight(map, actors, looker, *h))
        .min_by(|(_, a), (_, b)| {
            let da = apex.distance_squared(a.body.xy());
            let db = apex.distance_squared(b.body.xy());
            da.total_cmp(&db)
        })
        .map(|(h, _)| h)
}
