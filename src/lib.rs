//! Tile-world raycasting and collision core.
//!
//! * [`world`] – the solid/empty tile grid and disc push-out helpers.
//! * [`raycast`] – wall, floor/ceiling and actor casts plus the compositor.
//! * [`sim`] – actor registry, physics, collision resolution, frame runner.
//! * [`defs`] – static actor and tile definitions.
//! * [`config`] – JSON-loadable simulation settings.

pub mod config;
pub mod defs;
pub mod raycast;
pub mod sim;
pub mod world;
