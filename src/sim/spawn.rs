use glam::Vec3;

use super::{Actor, ActorHandle, ActorRegistry, Orientation, RegistryError};
use crate::defs::ActorDef;

/// Spawn an actor from its definition and return its handle.
pub fn spawn_actor(
    actors: &mut ActorRegistry,
    def: &'static ActorDef,
    position: Vec3,
    orientation: Orientation,
) -> Result<ActorHandle, RegistryError> {
    actors.allocate(Actor::new(def, position, orientation))
}

/// Launch `def` from `owner`'s eye along its view direction.
///
/// The projectile starts just outside the owner's cylinder, centred on the
/// eye line, and remembers `owner` so it never strikes its shooter.
pub fn spawn_projectile(
    actors: &mut ActorRegistry,
    def: &'static ActorDef,
    owner: ActorHandle,
    speed: f32,
) -> Result<ActorHandle, RegistryError> {
    let aim = actors.resolve(owner).ok_or(RegistryError::Stale(owner))?.body.orientation;
    spawn_projectile_aimed(actors, def, owner, aim, speed)
}

/// Like [`spawn_projectile`], but flying along `aim` instead of the
/// owner's view direction.
pub fn spawn_projectile_aimed(
    actors: &mut ActorRegistry,
    def: &'static ActorDef,
    owner: ActorHandle,
    aim: Orientation,
    speed: f32,
) -> Result<ActorHandle, RegistryError> {
    let shooter = actors.resolve(owner).ok_or(RegistryError::Stale(owner))?;
    let forward = aim.forward();

    let muzzle = shooter.eye() + forward * (shooter.body.radius + def.radius);
    let position = muzzle - Vec3::Z * (def.height * 0.5);

    let mut shot = Actor::new(def, position, aim);
    shot.owner = owner;
    shot.body.velocity = forward * speed;
    actors.allocate(shot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::actor_by_name;

    #[test]
    fn projectile_leaves_from_the_eye() {
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let start = Vec3::new(1.0, 1.0, 0.0);
        let owner = spawn_actor(&mut reg, marine, start, Orientation::default()).unwrap();

        let plasma = actor_by_name("PlasmaProjectile").unwrap();
        let shot = spawn_projectile(&mut reg, plasma, owner, 4.0).unwrap();
        let s = reg.resolve(shot).unwrap();

        assert_eq!(s.owner, owner);
        assert!((s.body.velocity - Vec3::X * 4.0).length() < 1e-6);
        assert!((s.body.center().z - marine.eye_height).abs() < 1e-6);
        assert!(s.body.position.x > 1.0 + marine.radius);
    }

    #[test]
    fn aimed_projectile_ignores_the_owner_view() {
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let start = Vec3::new(1.0, 1.0, 0.0);
        let owner = spawn_actor(&mut reg, marine, start, Orientation::default()).unwrap();

        let plasma = actor_by_name("PlasmaProjectile").unwrap();
        let aim = Orientation::new(std::f32::consts::FRAC_PI_2, 0.0);
        let shot = spawn_projectile_aimed(&mut reg, plasma, owner, aim, 2.0).unwrap();
        let s = reg.resolve(shot).unwrap();

        assert!((s.body.velocity - Vec3::Y * 2.0).length() < 1e-6);
        assert!(s.body.position.y > 1.0 + marine.radius);
        assert_eq!(s.body.orientation, aim);
    }

    #[test]
    fn stale_owner_is_an_error() {
        let mut reg = ActorRegistry::new();
        let marine = actor_by_name("Marine").unwrap();
        let owner = spawn_actor(&mut reg, marine, Vec3::ZERO, Orientation::default()).unwrap();
        reg.free(owner);

        let plasma = actor_by_name("PlasmaProjectile").unwrap();
        assert_eq!(
            spawn_projectile(&mut reg, plasma, owner, 4.0),
            Err(RegistryError::Stale(owner))
        );
    }
}
