use super::{
    ImpactKind, MapRaycast, RaycastQuery, raycast_actors, raycast_world_xy, raycast_world_z,
};
use crate::sim::{ActorHandle, ActorRegistry};
use crate::world::TileMap;

/// The authoritative "what does this ray hit first" query used by weapons
/// and AI sight.
pub fn raycast_all(
    map: &TileMap,
    actors: &ActorRegistry,
    query: &RaycastQuery,
    exclude: &[ActorHandle],
) -> MapRaycast {
    let slab = MapRaycast::world(raycast_world_z(map, query), ImpactKind::Slab);
    let grid = MapRaycast::world(raycast_world_xy(map, query), ImpactKind::Grid);
    let actor = raycast_actors(actors, query, exclude);

    let best = nearest_of(query, slab, grid, actor);
    log::trace!(
        "raycast from {:?}: {:?} at {:.3}",
        query.start,
        best.kind,
        best.ray.impact_distance
    );
    best
}

/// Pick the candidate nearest to the ray start.
///
/// Exact ties resolve slab → grid → actor.  If nothing impacted the
/// result is a miss ending at the unclamped ray end.
pub fn nearest_of(
    query: &RaycastQuery,
    slab: MapRaycast,
    grid: MapRaycast,
    actor: MapRaycast,
) -> MapRaycast {
    let mut best = slab;
    let mut best_rank = slab.ray.rank();

    for candidate in [grid, actor] {
        let rank = candidate.ray.rank();
        if rank < best_rank {
            best = candidate;
            best_rank = rank;
        }
    }

    if best_rank.is_finite() {
        best
    } else {
        MapRaycast::miss(*query)
    }
}
