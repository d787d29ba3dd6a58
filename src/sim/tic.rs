use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::time::Instant;

use super::ai::ai_system;
use super::collision::{collide_actors, collide_actors_with_map, collide_projectiles};
use super::lifecycle::lifecycle_system;
use super::physics::physics_system;
use super::{
    ActorHandle, ActorRegistry, Orientation, RegistryError, fire_hitscan, fire_projectile,
    spawn_actor,
};
use crate::config::SimConfig;
use crate::defs::ActorDef;
use crate::raycast::{MapRaycast, RaycastQuery, raycast_all};
use crate::world::TileMap;

/// Summary of one fixed step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub frame: u64,
    pub projectile_hits: usize,
    pub swept: usize,
}

/// Owns the map and the actors and drives all game-logic systems.
pub struct Simulation {
    map: TileMap,
    actors: ActorRegistry,
    config: SimConfig,
    /// Weapon spread; seeded from the config so runs repeat.
    rng: Pcg32,
    last: Instant,
    frame: u64,
}

impl Simulation {
    pub fn new(map: TileMap, config: SimConfig) -> Self {
        log::info!(
            "simulation on '{}' ({}x{}) at {} Hz",
            map.name,
            map.dimensions().x,
            map.dimensions().y,
            config.tick_rate
        );
        Self {
            map,
            actors: ActorRegistry::with_limit(config.max_actors),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            last: Instant::now(),
            frame: 0,
        }
    }

    #[inline]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    #[inline]
    pub fn actors(&self) -> &ActorRegistry {
        &self.actors
    }

    #[inline]
    pub fn actors_mut(&mut self) -> &mut ActorRegistry {
        &mut self.actors
    }

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks run so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /* ---------------------------------------------------------------- */
    /* spawning and weapons                                             */
    /* ---------------------------------------------------------------- */

    pub fn spawn(
        &mut self,
        def: &'static ActorDef,
        position: Vec3,
        orientation: Orientation,
    ) -> Result<ActorHandle, RegistryError> {
        spawn_actor(&mut self.actors, def, position, orientation)
    }

    /// Launch `def` from `owner` with the configured launcher.  `Ok(None)`
    /// while `owner` is still cooling down.
    pub fn launch(
        &mut self,
        owner: ActorHandle,
        def: &'static ActorDef,
    ) -> Result<Option<ActorHandle>, RegistryError> {
        let weapon = self.config.projectile;
        fire_projectile(&mut self.actors, def, owner, &weapon, &mut self.rng)
    }

    /// Fire the configured hitscan weapon for `shooter`.  `None` if the
    /// shooter is gone or still cooling down.
    pub fn fire(&mut self, shooter: ActorHandle) -> Option<MapRaycast> {
        fire_hitscan(&mut self.actors, &self.map, shooter, &self.config.hitscan)
    }

    /// Composite raycast against this map and its actors.
    pub fn raycast_all(
        &self,
        start: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: &[ActorHandle],
    ) -> MapRaycast {
        let query = RaycastQuery::new(start, direction, max_distance);
        raycast_all(&self.map, &self.actors, &query, exclude)
    }

    /* ---------------------------------------------------------------- */
    /* stepping                                                         */
    /* ---------------------------------------------------------------- */

    /// Advance enough tics to synchronise the simulation with real time.
    /// Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let tic = self.config.tic_duration();
        let mut ran = 0;
        while self.last.elapsed() >= tic {
            self.tick();
            self.last += tic;
            ran += 1;
        }
        ran
    }

    /// Run one fixed-rate game tic.
    ///
    /// Order: steering → integration → lifecycle → projectile hits →
    /// actor pairs → tiles → sweep.  Raycasts issued after `tick` see
    /// fully resolved positions.
    pub fn tick(&mut self) -> TickReport {
        let dt = self.config.dt();

        if self.config.ai_enabled {
            ai_system(&mut self.actors, &self.map, dt);
        }
        physics_system(&mut self.actors, dt);
        lifecycle_system(&mut self.actors, dt);

        let projectile_hits = collide_projectiles(&mut self.actors);
        collide_actors(&mut self.actors);
        collide_actors_with_map(&mut self.actors, &self.map);

        let swept = self.actors.sweep_dead();
        self.frame += 1;

        TickReport {
            frame: self.frame,
            projectile_hits,
            swept,
        }
    }
}
