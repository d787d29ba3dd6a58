//! Ray queries against the tile grid, the floor/ceiling slab and actors.
//!
//! Three independent sub-casts each produce a candidate impact; the
//! compositor ([`raycast_all`]) keeps the nearest one.
//!
//! | sub-cast            | fn                     | normal                 |
//! |---------------------|------------------------|------------------------|
//! | walls (XY DDA)      | [`raycast_world_xy`]   | `-step` on crossed axis|
//! | floor / ceiling (Z) | [`raycast_world_z`]    | `±Z`                   |
//! | actor cylinders     | [`raycast_actors`]     | cylinder surface       |

mod actors;
mod composite;
mod grid;

pub use actors::{raycast_actors, raycast_vs_z_cylinder};
pub use composite::{nearest_of, raycast_all};
pub use grid::{GridCrossing, GridWalk, leaves_grid, raycast_world_xy, raycast_world_z};

use glam::Vec3;

use crate::sim::ActorHandle;

/// Immutable for the duration of one cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastQuery {
    pub start: Vec3,
    /// Unit length (or zero for a degenerate ray).
    pub direction: Vec3,
    pub max_distance: f32,
}

impl RaycastQuery {
    pub fn new(start: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            start,
            direction: direction.normalize_or_zero(),
            max_distance,
        }
    }

    #[inline]
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.start + self.direction * distance
    }

    /// Unclamped end point of the ray.
    #[inline]
    pub fn end(&self) -> Vec3 {
        self.point_at(self.max_distance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    pub query: RaycastQuery,
    pub did_impact: bool,
    /// `+inf` when nothing was hit.
    pub impact_distance: f32,
    /// Ray end when nothing was hit.
    pub impact_position: Vec3,
    pub impact_normal: Vec3,
}

impl RaycastResult {
    pub fn miss(query: RaycastQuery) -> Self {
        Self {
            query,
            did_impact: false,
            impact_distance: f32::INFINITY,
            impact_position: query.end(),
            impact_normal: Vec3::ZERO,
        }
    }

    pub fn hit(query: RaycastQuery, distance: f32, normal: Vec3) -> Self {
        Self {
            query,
            did_impact: true,
            impact_distance: distance,
            impact_position: query.point_at(distance),
            impact_normal: normal,
        }
    }

    /// Ranking key for compositing: distance from the ray start to the
    /// impact, `+inf` for a miss.
    #[inline]
    pub fn rank(&self) -> f32 {
        if self.did_impact {
            self.query.start.distance(self.impact_position)
        } else {
            f32::INFINITY
        }
    }
}

/// Which sub-cast produced a composite result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactKind {
    Miss,
    Slab,
    Grid,
    Actor,
}

/// Ray result plus the struck actor, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRaycast {
    pub ray: RaycastResult,
    pub kind: ImpactKind,
    pub actor: Option<ActorHandle>,
}

impl MapRaycast {
    pub fn miss(query: RaycastQuery) -> Self {
        Self {
            ray: RaycastResult::miss(query),
            kind: ImpactKind::Miss,
            actor: None,
        }
    }

    /// Wrap a world sub-cast result, tagging hits with `kind`.
    pub fn world(ray: RaycastResult, kind: ImpactKind) -> Self {
        Self {
            kind: if ray.did_impact { kind } else { ImpactKind::Miss },
            ray,
            actor: None,
        }
    }

    #[inline]
    pub fn did_impact(&self) -> bool {
        self.ray.did_impact
    }
}
