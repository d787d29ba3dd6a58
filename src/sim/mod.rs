mod ai;
mod collision;
mod components;
mod lifecycle;
mod physics;
mod registry;
mod sight;
mod spawn;
mod tic;
mod weapon;

pub use ai::ai_system;
pub use collision::{
    collide_actors, collide_actors_with_map, collide_bodies, collide_body_with_map,
    collide_projectiles,
};
pub use components::{Actor, Body, Controller, Orientation};
pub use lifecycle::lifecycle_system;
pub use physics::{integrate, physics_system, shortest_angle, wrap_angle};
pub use registry::{ActorHandle, ActorRegistry, MAX_ACTOR_SALT, MAX_ACTOR_SLOTS, RegistryError};
pub use sight::{find_visible_target, has_line_of_sight, is_point_inside_oriented_sector_2d};
pub use spawn::{spawn_actor, spawn_projectile, spawn_projectile_aimed};
pub use tic::{Simulation, TickReport};
pub use weapon::{
    HitscanWeapon, MAX_WEAPON_RANGE, ProjectileWeapon, fire_hitscan, fire_projectile,
    in_melee_reach, strike_melee,
};
