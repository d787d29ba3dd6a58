//! Attacks: instant-hit rays, launched projectiles and AI melee strikes.
//!
//! Every attack starts the attacker's refire timer; an actor whose timer
//! has not run out yet cannot attack at all.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::sight::is_point_inside_oriented_sector_2d;
use super::{ActorHandle, ActorRegistry, Orientation, RegistryError, spawn_projectile_aimed};
use crate::defs::{ActorDef, MeleeDef};
use crate::raycast::{MapRaycast, RaycastQuery, raycast_all};
use crate::world::TileMap;

/// Longest ray a configured weapon may cast.
pub const MAX_WEAPON_RANGE: f32 = 1024.0;

/// Instant-hit gun: one composite ray per shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitscanWeapon {
    pub range: f32,
    pub damage: f32,
    /// speed added to a struck actor along the ray
    pub impulse: f32,
    /// seconds between shots
    pub refire_time: f32,
}

impl Default for HitscanWeapon {
    fn default() -> Self {
        Self {
            range: 10.0,
            damage: 10.0,
            impulse: 1.0,
            refire_time: 0.15,
        }
    }
}

/// Launcher: one projectile per shot, scattered inside a cone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileWeapon {
    pub speed: f32,
    /// largest yaw / pitch deviation, degrees
    pub cone: f32,
    pub refire_time: f32,
}

impl Default for ProjectileWeapon {
    fn default() -> Self {
        Self {
            speed: 4.0,
            cone: 1.0,
            refire_time: 0.1,
        }
    }
}

/// Fire from `shooter`'s eye along its view direction.  The shooter is
/// excluded from the cast; a struck actor is pushed along the ray by
/// `weapon.impulse` and takes `weapon.damage`.
///
/// `None` if `shooter` no longer resolves or is still cooling down.
pub fn fire_hitscan(
    actors: &mut ActorRegistry,
    map: &TileMap,
    shooter: ActorHandle,
    weapon: &HitscanWeapon,
) -> Option<MapRaycast> {
    let query = {
        let a = actors.resolve_mut(shooter)?;
        if !a.can_attack() {
            return None;
        }
        a.refire_timer = weapon.refire_time;
        RaycastQuery::new(a.eye(), a.body.orientation.forward(), weapon.range)
    };

    let hit = raycast_all(map, actors, &query, &[shooter]);
    if let Some(victim) = hit.actor.and_then(|h| actors.resolve_mut(h)) {
        log::debug!("hitscan from {shooter:?} hit {}", victim.def.name);
        victim.body.add_impulse(query.direction * weapon.impulse);
        victim.damage(weapon.damage, shooter);
    }
    Some(hit)
}

/// Launch `def` from `owner`, deviating from its view by a random yaw and
/// pitch in `±weapon.cone` degrees.
///
/// `Ok(None)` while the owner is cooling down.
pub fn fire_projectile<R: Rng>(
    actors: &mut ActorRegistry,
    def: &'static ActorDef,
    owner: ActorHandle,
    weapon: &ProjectileWeapon,
    rng: &mut R,
) -> Result<Option<ActorHandle>, RegistryError> {
    let shooter = actors.resolve(owner).ok_or(RegistryError::Stale(owner))?;
    if !shooter.can_attack() {
        return Ok(None);
    }

    let mut aim = shooter.body.orientation;
    if weapon.cone > 0.0 {
        let cone = weapon.cone.to_radians();
        aim = Orientation::new(
            aim.yaw + rng.random_range(-cone..=cone),
            aim.pitch + rng.random_range(-cone..=cone),
        );
    }

    let shot = spawn_projectile_aimed(actors, def, owner, aim, weapon.speed)?;
    if let Some(shooter) = actors.resolve_mut(owner) {
        shooter.refire_timer = weapon.refire_time;
    }
    Ok(Some(shot))
}

/// Is `target` inside `attacker`'s strike arc?
pub fn in_melee_reach(
    actors: &ActorRegistry,
    attacker: ActorHandle,
    target: ActorHandle,
    melee: &MeleeDef,
) -> bool {
    let (Some(a), Some(t)) = (actors.resolve(attacker), actors.resolve(target)) else {
        return false;
    };
    is_point_inside_oriented_sector_2d(
        t.body.xy(),
        a.body.xy(),
        a.body.orientation.yaw,
        melee.arc.to_radians(),
        melee.range,
    )
}

/// Strike `target` if it is live, inside the arc and the attacker has
/// cooled down.  The victim is knocked away from the attacker.
/// Returns whether the blow landed.
pub fn strike_melee(
    actors: &mut ActorRegistry,
    attacker: ActorHandle,
    target: ActorHandle,
    melee: &MeleeDef,
) -> bool {
    if attacker == target || !in_melee_reach(actors, attacker, target, melee) {
        return false;
    }
    let Some(a) = actors.resolve_mut(attacker) else {
        return false;
    };
    if !a.can_attack() || !a.body.is_live() {
        return false;
    }
    a.refire_timer = melee.refire_time;
    let from = a.body.xy();

    let Some(victim) = actors.resolve_mut(target) else {
        return false;
    };
    if !victim.body.is_live() {
        return false;
    }
    log::debug!("{attacker:?} strikes {}", victim.def.name);
    let away = (victim.body.xy() - from).normalize_or_zero();
    victim.body.add_impulse(away.extend(0.0) * melee.impulse);
    victim.damage(melee.damage, attacker);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::actor_by_name;
    use crate::raycast::ImpactKind;
    use crate::sim::spawn_actor;
    use glam::Vec3;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn planar(v: Vec3) -> Vec3 {
        Vec3::new(v.x, v.y, 0.0)
    }

    #[test]
    fn hitscan_damages_the_first_actor() {
        let map = TileMap::from_layout("hall", &["......#", "......#", "......#"]).unwrap();
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let demon = actor_by_name("Demon").unwrap();
        let o = Orientation::default();
        let shooter = spawn_actor(&mut reg, marine, Vec3::new(0.5, 1.5, 0.0), o).unwrap();
        let near = spawn_actor(&mut reg, demon, Vec3::new(2.5, 1.5, 0.0), o).unwrap();
        let far = spawn_actor(&mut reg, demon, Vec3::new(4.5, 1.5, 0.0), o).unwrap();

        let gun = HitscanWeapon::default();
        let hit = fire_hitscan(&mut reg, &map, shooter, &gun).unwrap();
        assert_eq!(hit.kind, ImpactKind::Actor);
        assert_eq!(hit.actor, Some(near));
        assert_eq!(reg.resolve(near).unwrap().health, demon.health - gun.damage);
        assert_eq!(reg.resolve(far).unwrap().health, demon.health);
        assert_eq!(reg.resolve(shooter).unwrap().health, marine.health);

        // knocked back along the ray
        let v = reg.resolve(near).unwrap().body.velocity;
        assert!((v - Vec3::X * gun.impulse).length() < 1e-5);
        assert_eq!(planar(reg.resolve(far).unwrap().body.velocity), Vec3::ZERO);
    }

    #[test]
    fn hitscan_stops_at_walls() {
        let map = TileMap::from_layout("hall", &["..#....", "..#....", "..#...."]).unwrap();
        let mut reg = ActorRegistry::new();
        let shooter = spawn_actor(
            &mut reg,
            actor_by_name("Marine").unwrap(),
            Vec3::new(0.5, 1.5, 0.0),
            Orientation::default(),
        )
        .unwrap();
        let demon = actor_by_name("Demon").unwrap();
        let o = Orientation::default();
        let hidden = spawn_actor(&mut reg, demon, Vec3::new(4.5, 1.5, 0.0), o).unwrap();

        let hit = fire_hitscan(&mut reg, &map, shooter, &HitscanWeapon::default()).unwrap();
        assert_eq!(hit.kind, ImpactKind::Grid);
        assert!((hit.ray.impact_position.x - 2.0).abs() < 1e-5);
        assert_eq!(reg.resolve(hidden).unwrap().health, demon.health);

        reg.free(shooter);
        assert!(fire_hitscan(&mut reg, &map, shooter, &HitscanWeapon::default()).is_none());
    }

    #[test]
    fn hitscan_waits_for_refire() {
        let map = TileMap::from_layout("hall", &["....", "....", "...."]).unwrap();
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let start = Vec3::new(0.5, 1.5, 0.0);
        let shooter = spawn_actor(&mut reg, marine, start, Orientation::default()).unwrap();

        let gun = HitscanWeapon::default();
        assert!(fire_hitscan(&mut reg, &map, shooter, &gun).is_some());
        assert_eq!(reg.resolve(shooter).unwrap().refire_timer, gun.refire_time);
        assert!(fire_hitscan(&mut reg, &map, shooter, &gun).is_none());

        reg.resolve_mut(shooter).unwrap().refire_timer = 0.0;
        assert!(fire_hitscan(&mut reg, &map, shooter, &gun).is_some());
    }

    #[test]
    fn projectiles_scatter_inside_the_cone() {
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let plasma = actor_by_name("PlasmaProjectile").unwrap();
        let start = Vec3::new(1.0, 1.0, 0.0);
        let owner = spawn_actor(&mut reg, marine, start, Orientation::default()).unwrap();

        let launcher = ProjectileWeapon {
            cone: 10.0,
            ..ProjectileWeapon::default()
        };
        let limit = launcher.cone.to_radians() + 1e-5;
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spread = false;
        for _ in 0..16 {
            let shot = fire_projectile(&mut reg, plasma, owner, &launcher, &mut rng)
                .unwrap()
                .unwrap();
            let o = reg.resolve(shot).unwrap().body.orientation;
            assert!(o.yaw.abs() <= limit && o.pitch.abs() <= limit);
            spread |= o.yaw != 0.0 || o.pitch != 0.0;

            let v = reg.resolve(shot).unwrap().body.velocity;
            assert!((v.length() - launcher.speed).abs() < 1e-4);
            reg.resolve_mut(owner).unwrap().refire_timer = 0.0;
        }
        assert!(spread);
    }

    #[test]
    fn launcher_respects_refire_and_stale_owner() {
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let plasma = actor_by_name("PlasmaProjectile").unwrap();
        let owner = spawn_actor(&mut reg, marine, Vec3::ONE, Orientation::default()).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);

        let straight = ProjectileWeapon {
            cone: 0.0,
            ..ProjectileWeapon::default()
        };
        let shot = fire_projectile(&mut reg, plasma, owner, &straight, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(reg.resolve(shot).unwrap().body.orientation, Orientation::default());
        assert_eq!(fire_projectile(&mut reg, plasma, owner, &straight, &mut rng), Ok(None));
        assert_eq!(reg.len(), 2);

        reg.free(owner);
        assert_eq!(
            fire_projectile(&mut reg, plasma, owner, &straight, &mut rng),
            Err(RegistryError::Stale(owner))
        );
    }

    #[test]
    fn melee_hits_inside_the_arc_only() {
        let mut reg = ActorRegistry::new();
        let demon_def = actor_by_name("Demon").unwrap();
        let marine_def = actor_by_name("Marine").unwrap();
        let bite = demon_def.melee.unwrap();
        let o = Orientation::default();
        let demon = spawn_actor(&mut reg, demon_def, Vec3::new(1.0, 1.0, 0.0), o).unwrap();
        let front = spawn_actor(&mut reg, marine_def, Vec3::new(1.6, 1.0, 0.0), o).unwrap();
        let behind = spawn_actor(&mut reg, marine_def, Vec3::new(0.4, 1.0, 0.0), o).unwrap();

        assert!(!strike_melee(&mut reg, demon, behind, &bite));
        assert!(reg.resolve(demon).unwrap().can_attack());

        assert!(strike_melee(&mut reg, demon, front, &bite));
        let m = reg.resolve(front).unwrap();
        assert_eq!(m.health, marine_def.health - bite.damage);
        assert!((planar(m.body.velocity) - Vec3::X * bite.impulse).length() < 1e-5);

        // cooling down
        assert!(!strike_melee(&mut reg, demon, front, &bite));
        assert_eq!(reg.resolve(front).unwrap().health, marine_def.health - bite.damage);
        assert_eq!(reg.resolve(behind).unwrap().health, marine_def.health);
    }
}
