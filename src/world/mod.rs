mod geometry;
mod helpers;

pub use geometry::{Aabb2, Aabb3, SLAB_TOP, Tile, TileCoord, TileMap};

pub use helpers::{
    MapError, push_disc_out_of_aabb2, push_disc_out_of_disc, push_discs_out_of_each_other,
    z_cylinders_overlap,
};
