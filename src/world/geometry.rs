use glam::{IVec2, Vec2, Vec3};

use crate::defs::TileDef;

/// Integer grid coordinate of one tile.
pub type TileCoord = IVec2;

/// Height of the habitable slab: walls span `z ∈ [0, SLAB_TOP]`.
pub const SLAB_TOP: f32 = 1.0;

/// Runtime snapshot of one map (immutable after load).
///
/// Tiles are stored row-major: index = `x + y * width`.
#[derive(Debug)]
pub struct TileMap {
    pub name: String,
    pub(crate) dims: IVec2,
    pub(crate) tiles: Vec<Tile>,
}

#[derive(Clone, Copy, Debug)]
pub struct Tile {
    pub coords: TileCoord,
    pub def: &'static TileDef,
}

impl Tile {
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.def.is_solid
    }
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb3 {
    /// XY footprint.
    #[inline]
    pub fn xy(&self) -> Aabb2 {
        Aabb2 {
            min: self.min.truncate(),
            max: self.max.truncate(),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

impl Aabb2 {
    #[inline]
    pub fn nearest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
