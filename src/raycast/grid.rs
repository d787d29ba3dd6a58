//! Tile-grid sub-casts: Amanatides–Woo DDA in XY, plane test in Z.

use glam::{IVec2, Vec2, Vec3};

use super::{RaycastQuery, RaycastResult};
use crate::world::{SLAB_TOP, TileCoord, TileMap};

/// One grid-line crossing reported by [`GridWalk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCrossing {
    /// Tile entered by this crossing.
    pub tile: TileCoord,
    /// Distance along the (3-D, unit) ray at which the line is crossed.
    pub distance: f32,
    /// Face normal of the entered tile, facing back toward the ray.
    pub normal: Vec3,
}

/// Iterator over the grid lines a ray crosses, nearest first.
///
/// * Per-axis crossing distances grow by `1/|d.axis|` every step, so the
///   sequence never decreases and each axis strictly increases.
/// * A zero component never crosses a line on that axis.
/// * Ties (exact corners) step X first.
/// * A ray with no horizontal component yields nothing.
/// * The walk ends once `f32` can no longer tell two crossings apart.
///   Callers that know the grid should stop earlier, see [`leaves_grid`].
#[derive(Debug, Clone)]
pub struct GridWalk {
    tile: IVec2,
    step: IVec2,
    dist_per_crossing: Vec2,
    next_crossing: Vec2,
}

impl GridWalk {
    pub fn new(start: Vec2, dir: Vec2) -> Self {
        let tile = TileMap::tile_coords_of(start);
        let step = IVec2::new(
            if dir.x < 0.0 { -1 } else { 1 },
            if dir.y < 0.0 { -1 } else { 1 },
        );

        let per = |d: f32| if d == 0.0 { f32::INFINITY } else { 1.0 / d.abs() };
        let dist_per_crossing = Vec2::new(per(dir.x), per(dir.y));

        // first grid line ahead of the start on each axis
        let first = |t: i32, s: i32, from: f32, per: f32| {
            if per.is_infinite() {
                return f32::INFINITY;
            }
            let line = (t + (s + 1) / 2) as f32;
            (line - from).abs() * per
        };
        let next_crossing = Vec2::new(
            first(tile.x, step.x, start.x, dist_per_crossing.x),
            first(tile.y, step.y, start.y, dist_per_crossing.y),
        );

        Self {
            tile,
            step,
            dist_per_crossing,
            next_crossing,
        }
    }

    /// Tile the walk currently sits in.
    #[inline]
    pub fn tile(&self) -> TileCoord {
        self.tile
    }
}

impl Iterator for GridWalk {
    type Item = GridCrossing;

    fn next(&mut self) -> Option<GridCrossing> {
        if self.next_crossing.x <= self.next_crossing.y {
            let distance = self.next_crossing.x;
            if !distance.is_finite() {
                return None;
            }
            let following = distance + self.dist_per_crossing.x;
            if following <= distance {
                return None;
            }
            self.tile.x += self.step.x;
            self.next_crossing.x = following;
            Some(GridCrossing {
                tile: self.tile,
                distance,
                normal: Vec3::new(-self.step.x as f32, 0.0, 0.0),
            })
        } else {
            let distance = self.next_crossing.y;
            let following = distance + self.dist_per_crossing.y;
            if following <= distance {
                return None;
            }
            self.tile.y += self.step.y;
            self.next_crossing.y = following;
            Some(GridCrossing {
                tile: self.tile,
                distance,
                normal: Vec3::new(0.0, -self.step.y as f32, 0.0),
            })
        }
    }
}

/// True once `tile` lies outside a `dims`-sized grid on some axis and `dir`
/// never brings the walk back across that axis.
pub fn leaves_grid(tile: TileCoord, dims: IVec2, dir: Vec2) -> bool {
    let gone = |t: i32, size: i32, d: f32| (t < 0 && d <= 0.0) || (t >= size && d >= 0.0);
    gone(tile.x, dims.x, dir.x) || gone(tile.y, dims.y, dir.y)
}

/// Cast against the walls of the tile grid.
///
/// Walls only block inside the slab: a solid tile crossed above or below
/// `z ∈ [0, 1]` is skipped and the walk continues.  The walk stops at the
/// ray end or as soon as it has left the map for good.
pub fn raycast_world_xy(map: &TileMap, query: &RaycastQuery) -> RaycastResult {
    // started embedded in a wall
    if map.is_position_in_solid(query.start) {
        return RaycastResult::hit(*query, 0.0, -query.direction);
    }

    let dir = query.direction.truncate();
    let dims = map.dimensions();
    let walk = GridWalk::new(query.start.truncate(), dir);
    for crossing in walk {
        if crossing.distance > query.max_distance {
            break;
        }
        if leaves_grid(crossing.tile, dims, dir) {
            break;
        }
        if !map.is_solid(crossing.tile.x, crossing.tile.y) {
            continue;
        }
        let impact = query.point_at(crossing.distance);
        if !(0.0..=SLAB_TOP).contains(&impact.z) {
            log::trace!("ray passes over/under wall at {:?}", crossing.tile);
            continue;
        }
        return RaycastResult::hit(*query, crossing.distance, crossing.normal);
    }

    RaycastResult::miss(*query)
}

/// Cast against the ceiling (`z = 1`) when rising, the floor (`z = 0`)
/// when falling.  Impacts outside the map's footprint are ignored.
pub fn raycast_world_z(map: &TileMap, query: &RaycastQuery) -> RaycastResult {
    let ray = query.direction * query.max_distance;

    let (plane, normal) = if ray.z > 0.0 {
        (SLAB_TOP, Vec3::NEG_Z)
    } else if ray.z < 0.0 {
        (0.0, Vec3::Z)
    } else {
        return RaycastResult::miss(*query);
    };

    let t = (plane - query.start.z) / ray.z;
    if !(t > 0.0 && t < 1.0) {
        return RaycastResult::miss(*query);
    }

    let impact = query.start + ray * t;
    if !map.contains_xy(impact.truncate()) {
        return RaycastResult::miss(*query);
    }

    RaycastResult::hit(*query, t * query.max_distance, normal)
}

// ──────────────────────────────────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// 4×4, solid column at x = 2.
    fn column_map() -> TileMap {
        TileMap::from_layout("column", &["..#.", "..#.", "..#.", "..#."]).unwrap()
    }

    fn open_map(n: usize) -> TileMap {
        let row = ".".repeat(n);
        let rows: Vec<&str> = (0..n).map(|_| row.as_str()).collect();
        TileMap::from_layout("open", &rows).unwrap()
    }

    #[test]
    fn wall_hit_end_to_end() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(0.5, 0.5, 0.5), Vec3::X, 10.0);
        let r = raycast_world_xy(&map, &q);
        assert!(r.did_impact);
        assert!((r.impact_distance - 1.5).abs() < 1e-6);
        assert!((r.impact_position.x - 2.0).abs() < 1e-6);
        assert_eq!(r.impact_normal, Vec3::NEG_X);
    }

    #[test]
    fn wall_hit_from_the_far_side() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(3.5, 1.5, 0.5), Vec3::NEG_X, 10.0);
        let r = raycast_world_xy(&map, &q);
        assert!(r.did_impact);
        assert!((r.impact_position.x - 3.0).abs() < 1e-6);
        assert_eq!(r.impact_normal, Vec3::X);
    }

    #[test]
    fn short_ray_stops_before_wall() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(0.5, 0.5, 0.5), Vec3::X, 1.0);
        let r = raycast_world_xy(&map, &q);
        assert!(!r.did_impact);
        assert_eq!(r.impact_position, Vec3::new(1.5, 0.5, 0.5));
    }

    #[test]
    fn ray_above_slab_is_masked() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(0.5, 0.5, 1.5), Vec3::X, 10.0);
        assert!(!raycast_world_xy(&map, &q).did_impact);

        // climbing ray: passes through the slab at the first wall face
        let q = RaycastQuery::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.0, 1.0), 10.0);
        assert!(!raycast_world_xy(&map, &q).did_impact);
    }

    #[test]
    fn embedded_start_hits_immediately() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(2.5, 0.5, 0.5), Vec3::Y, 10.0);
        let r = raycast_world_xy(&map, &q);
        assert!(r.did_impact);
        assert_eq!(r.impact_distance, 0.0);
        assert_eq!(r.impact_position, q.start);
        assert_eq!(r.impact_normal, Vec3::NEG_Y);
    }

    #[test]
    fn axis_aligned_ray_never_crosses_other_axis() {
        let mut walk = GridWalk::new(Vec2::new(0.5, 0.5), Vec2::Y);
        for (i, c) in walk.by_ref().take(3).enumerate() {
            assert_eq!(c.tile, IVec2::new(0, i as i32 + 1));
            assert!(c.distance.is_finite());
        }
        assert_eq!(walk.tile().x, 0);

        // purely vertical ray: no crossings at all
        assert!(GridWalk::new(Vec2::new(0.5, 0.5), Vec2::ZERO).next().is_none());
    }

    #[test]
    fn crossings_strictly_increase_and_terminate() {
        let max = 20.0;
        let dir = Vec3::new(0.8, 0.6, 0.0);
        let crossings: Vec<_> = GridWalk::new(Vec2::new(0.3, 0.2), dir.truncate())
            .take_while(|c| c.distance <= max)
            .collect();

        assert!(!crossings.is_empty());
        for w in crossings.windows(2) {
            assert!(w[1].distance > w[0].distance);
        }
        // each axis advances at least one unit of distance per crossing
        assert!(crossings.len() <= 2 * (max as usize + 1));

        // no walls: the full cast misses and ends at the ray end
        let map = open_map(32);
        let q = RaycastQuery::new(Vec3::new(0.3, 0.2, 0.5), dir, max);
        let r = raycast_world_xy(&map, &q);
        assert!(!r.did_impact);
        assert!((r.impact_position - q.end()).length() < 1e-5);
    }

    #[test]
    fn rays_leaving_the_map_miss() {
        let map = column_map();
        let q = RaycastQuery::new(Vec3::new(1.5, 1.5, 0.5), Vec3::NEG_X, 100.0);
        assert!(!raycast_world_xy(&map, &q).did_impact);
    }

    #[test]
    fn huge_range_cast_terminates_at_the_map_edge() {
        let map = open_map(4);
        let q = RaycastQuery::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 0.3, 0.0), 1.0e8);
        let r = raycast_world_xy(&map, &q);
        assert!(!r.did_impact);
        assert_eq!(r.impact_position, q.end());

        // axis-aligned and heading out through the low side
        let q = RaycastQuery::new(Vec3::new(2.5, 2.5, 0.5), Vec3::NEG_Y, 1.0e8);
        assert!(!raycast_world_xy(&map, &q).did_impact);
    }

    #[test]
    fn walk_outside_the_grid() {
        let dims = IVec2::new(4, 4);
        assert!(leaves_grid(IVec2::new(4, 1), dims, Vec2::X));
        assert!(leaves_grid(IVec2::new(1, -1), dims, Vec2::new(0.5, -0.5)));
        // outside but coming back in
        assert!(!leaves_grid(IVec2::new(-3, 1), dims, Vec2::X));
        // parallel to the grid, outside on the other axis
        assert!(leaves_grid(IVec2::new(-1, 2), dims, Vec2::Y));
        assert!(!leaves_grid(IVec2::new(2, 2), dims, Vec2::NEG_X));
    }

    #[test]
    fn walk_ends_when_crossings_stall() {
        // one more unit at 1e8 rounds back to the same f32
        let mut walk = GridWalk {
            tile: IVec2::ZERO,
            step: IVec2::ONE,
            dist_per_crossing: Vec2::ONE,
            next_crossing: Vec2::new(1.0e8, f32::INFINITY),
        };
        assert!(walk.next().is_none());
        assert_eq!(walk.tile(), IVec2::ZERO);
    }

    #[test]
    fn floor_and_ceiling() {
        let map = open_map(4);

        let q = RaycastQuery::new(Vec3::new(1.0, 1.0, 0.5), Vec3::new(1.0, 0.0, -1.0), 10.0);
        let r = raycast_world_z(&map, &q);
        assert!(r.did_impact);
        assert_eq!(r.impact_normal, Vec3::Z);
        assert!(r.impact_position.z.abs() < 1e-6);
        assert!((r.impact_distance - 0.5 * 2f32.sqrt()).abs() < 1e-5);

        let q = RaycastQuery::new(Vec3::new(1.0, 1.0, 0.5), Vec3::Z, 10.0);
        let r = raycast_world_z(&map, &q);
        assert!(r.did_impact);
        assert_eq!(r.impact_normal, Vec3::NEG_Z);
        assert!((r.impact_distance - 0.5).abs() < 1e-6);
    }

    #[test]
    fn slab_misses() {
        let map = open_map(4);
        // level ray
        let q = RaycastQuery::new(Vec3::new(1.0, 1.0, 0.5), Vec3::X, 10.0);
        assert!(!raycast_world_z(&map, &q).did_impact);
        // too short
        let q = RaycastQuery::new(Vec3::new(1.0, 1.0, 0.5), Vec3::NEG_Z, 0.25);
        assert!(!raycast_world_z(&map, &q).did_impact);
        // lands outside the map footprint
        let q = RaycastQuery::new(Vec3::new(3.9, 1.0, 0.5), Vec3::new(1.0, 0.0, -0.1), 10.0);
        assert!(!raycast_world_z(&map, &q).did_impact);
        // starts above the ceiling, going up
        let q = RaycastQuery::new(Vec3::new(1.0, 1.0, 1.5), Vec3::Z, 10.0);
        assert!(!raycast_world_z(&map, &q).did_impact);
    }
}
