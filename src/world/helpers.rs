use glam::{IVec2, Vec2, Vec3};

use super::geometry::{Aabb2, Aabb3, SLAB_TOP, Tile, TileCoord, TileMap};
use crate::defs::{self, TileDef};

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("layout has no tiles")]
    Empty,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile glyph `{glyph}` at ({x}, {y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

// ──────────────────────────────────────────────────────────────────────────
//                       TileMap – construction
// ──────────────────────────────────────────────────────────────────────────
impl TileMap {
    /// Map of `dims` tiles, every one of them `def`.
    pub fn filled(name: impl Into<String>, dims: IVec2, def: &'static TileDef) -> Self {
        debug_assert!(dims.x > 0 && dims.y > 0, "tile map must not be empty");
        let tiles = (0..dims.y)
            .flat_map(|y| (0..dims.x).map(move |x| IVec2::new(x, y)))
            .map(|coords| Tile { coords, def })
            .collect();
        Self {
            name: name.into(),
            dims,
            tiles,
        }
    }

    /// Parse a glyph layout, one character per tile.
    ///
    /// * Row `i` of `rows` becomes `y = i`, column `j` becomes `x = j`.
    /// * Glyphs are resolved through [`defs::tile_by_glyph`].
    /// * Every row must have the same width.
    pub fn from_layout(name: impl Into<String>, rows: &[&str]) -> Result<Self, MapError> {
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let def = defs::tile_by_glyph(glyph).ok_or(MapError::UnknownGlyph { glyph, x, y })?;
                tiles.push(Tile {
                    coords: IVec2::new(x as i32, y as i32),
                    def,
                });
            }
        }

        Ok(Self {
            name: name.into(),
            dims: IVec2::new(width as i32, rows.len() as i32),
            tiles,
        })
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       TileMap – queries
// ──────────────────────────────────────────────────────────────────────────
impl TileMap {
    #[inline(always)]
    pub fn dimensions(&self) -> IVec2 {
        self.dims
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.dims.x && y < self.dims.y
    }

    /// Bounds-checked tile lookup.
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<&Tile> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.tiles.get((x + y * self.dims.x) as usize)
    }

    /// Out-of-bounds coordinates are never solid.
    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile_at(x, y).is_some_and(Tile::is_solid)
    }

    /// Unit box of cell `(x, y)`, spanning the slab vertically.
    #[inline]
    pub fn bounds(&self, x: i32, y: i32) -> Aabb3 {
        Aabb3 {
            min: Vec3::new(x as f32, y as f32, 0.0),
            max: Vec3::new((x + 1) as f32, (y + 1) as f32, SLAB_TOP),
        }
    }

    #[inline]
    pub fn bounds_2d(&self, x: i32, y: i32) -> Aabb2 {
        self.bounds(x, y).xy()
    }

    /// Tile containing the world-space point.
    #[inline]
    pub fn tile_coords_of(p: Vec2) -> TileCoord {
        IVec2::new(p.x.floor() as i32, p.y.floor() as i32)
    }

    /// Is `p` inside the map's horizontal extent `[0,w] × [0,h]`?
    #[inline]
    pub fn contains_xy(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.dims.x as f32 && p.y <= self.dims.y as f32
    }

    /// Inside the slab *and* inside a solid tile.
    pub fn is_position_in_solid(&self, p: Vec3) -> bool {
        if !(0.0..SLAB_TOP).contains(&p.z) {
            return false;
        }
        let c = Self::tile_coords_of(p.truncate());
        self.is_solid(c.x, c.y)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Disc / cylinder helpers
// ──────────────────────────────────────────────────────────────────────────

/// Push a disc out of an axis-aligned box.  Returns `true` if it moved.
///
/// A disc whose edge exactly touches the box is left alone.
pub fn push_disc_out_of_aabb2(center: &mut Vec2, radius: f32, aabb: &Aabb2) -> bool {
    let nearest = aabb.nearest_point(*center);
    let offset = *center - nearest;
    let dist_sq = offset.length_squared();
    if dist_sq >= radius * radius {
        return false;
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        *center += offset / dist * (radius - dist);
        return true;
    }

    // centre is inside the box: leave through the closest face
    let to_min = *center - aabb.min;
    let to_max = aabb.max - *center;
    let smallest = to_min.min(to_max).min_element();
    if smallest == to_min.x {
        center.x = aabb.min.x - radius;
    } else if smallest == to_max.x {
        center.x = aabb.max.x + radius;
    } else if smallest == to_min.y {
        center.y = aabb.min.y - radius;
    } else {
        center.y = aabb.max.y + radius;
    }
    true
}

/// Move `mobile` so it no longer overlaps the fixed disc.
/// Coincident centres separate along `+X`.
pub fn push_disc_out_of_disc(
    mobile: &mut Vec2,
    mobile_radius: f32,
    fixed: Vec2,
    fixed_radius: f32,
) -> bool {
    let offset = *mobile - fixed;
    let dist = offset.length();
    let overlap = mobile_radius + fixed_radius - dist;
    if overlap <= 0.0 {
        return false;
    }
    let dir = if dist > 0.0 { offset / dist } else { Vec2::X };
    *mobile += dir * overlap;
    true
}

/// Split the separation evenly between both discs.
/// Coincident centres: `a` moves along `-X`, `b` along `+X`.
pub fn push_discs_out_of_each_other(
    a: &mut Vec2,
    a_radius: f32,
    b: &mut Vec2,
    b_radius: f32,
) -> bool {
    let offset = *b - *a;
    let dist = offset.length();
    let overlap = a_radius + b_radius - dist;
    if overlap <= 0.0 {
        return false;
    }
    let dir = if dist > 0.0 { offset / dist } else { Vec2::X };
    let half = dir * (overlap * 0.5);
    *a -= half;
    *b += half;
    true
}

/// Do two vertical cylinders (base at `pos.z`) overlap?
pub fn z_cylinders_overlap(
    a_pos: Vec3,
    a_height: f32,
    a_radius: f32,
    b_pos: Vec3,
    b_height: f32,
    b_radius: f32,
) -> bool {
    if a_pos.z >= b_pos.z + b_height || b_pos.z >= a_pos.z + a_height {
        return false;
    }
    a_pos.truncate().distance_squared(b_pos.truncate()) < (a_radius + b_radius).powi(2)
}
