//! Static actor / tile definition tables.
//!
//! Stand-ins for the data files a full game would load at startup.  The
//! physics core never mutates any of this – it only reads radius, height
//! and flags through the `&'static` references stored on each actor.

pub mod flags;

pub use self::flags::{BodyFlags, StatusFlags};

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Which side an actor fights for.  Sight queries filter on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Faction {
    Marine,
    Demon,
    Neutral,
}

#[derive(Debug)]
pub struct ActorDef {
    pub name: &'static str,
    pub faction: Faction,
    pub health: f32,
    /// seconds a corpse lingers before it is swept
    pub corpse_lifetime: f32,

    /* collision */
    pub radius: f32,
    pub height: f32,
    pub flags: BodyFlags,
    /// damage dealt to an actor this body runs into (projectiles)
    pub damage_on_collide: f32,
    pub impulse_on_collide: f32,

    /* physics */
    pub drag: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub turn_speed: f32, // degrees / second

    /* camera + AI */
    pub eye_height: f32,
    pub sight_radius: f32,
    pub sight_angle: f32, // full aperture, degrees

    /* attack */
    pub melee: Option<MeleeDef>,
}

/// Close-range strike an AI lands once its target is inside the arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeDef {
    pub range: f32,
    pub arc: f32, // full aperture, degrees
    pub damage: f32,
    /// speed added to the victim, away from the attacker
    pub impulse: f32,
    /// seconds between strikes
    pub refire_time: f32,
}

#[derive(Debug)]
pub struct TileDef {
    pub name: &'static str,
    pub is_solid: bool,
    /// Character used for this tile in text layouts.
    pub glyph: char,
}

const PAWN: BodyFlags = BodyFlags::SIMULATED
    .union(BodyFlags::COLLIDES_WITH_WORLD)
    .union(BodyFlags::COLLIDES_WITH_ACTORS);

pub static ACTOR_DEFS: &[ActorDef] = &[
    ActorDef {
        name: "Marine",
        faction: Faction::Marine,
        health: 100.0,
        corpse_lifetime: 2.0,
        radius: 0.25,
        height: 0.6,
        flags: PAWN,
        damage_on_collide: 0.0,
        impulse_on_collide: 0.0,
        drag: 9.0,
        walk_speed: 1.0,
        run_speed: 4.0,
        turn_speed: 180.0,
        eye_height: 0.5,
        sight_radius: 0.0,
        sight_angle: 0.0,
        melee: None,
    },
    ActorDef {
        name: "Demon",
        faction: Faction::Demon,
        health: 160.0,
        corpse_lifetime: 1.0,
        radius: 0.35,
        height: 0.65,
        flags: PAWN,
        damage_on_collide: 0.0,
        impulse_on_collide: 0.0,
        drag: 9.0,
        walk_speed: 0.5,
        run_speed: 1.0,
        turn_speed: 180.0,
        eye_height: 0.45,
        sight_radius: 64.0,
        sight_angle: 120.0,
        melee: Some(MeleeDef {
            range: 0.75,
            arc: 90.0,
            damage: 8.0,
            impulse: 2.0,
            refire_time: 0.75,
        }),
    },
    ActorDef {
        name: "Pillar",
        faction: Faction::Neutral,
        health: 1.0e6,
        corpse_lifetime: 0.0,
        radius: 0.3,
        height: 1.0,
        flags: BodyFlags::COLLIDES_WITH_ACTORS,
        damage_on_collide: 0.0,
        impulse_on_collide: 0.0,
        drag: 0.0,
        walk_speed: 0.0,
        run_speed: 0.0,
        turn_speed: 0.0,
        eye_height: 0.0,
        sight_radius: 0.0,
        sight_angle: 0.0,
        melee: None,
    },
    ActorDef {
        name: "PlasmaProjectile",
        faction: Faction::Neutral,
        health: 1.0,
        corpse_lifetime: 0.0,
        radius: 0.0625,
        height: 0.125,
        flags: BodyFlags::SIMULATED
            .union(BodyFlags::COLLIDES_WITH_WORLD)
            .union(BodyFlags::PROJECTILE)
            .union(BodyFlags::FLYING),
        damage_on_collide: 12.0,
        impulse_on_collide: 0.5,
        drag: 0.0,
        walk_speed: 0.0,
        run_speed: 0.0,
        turn_speed: 0.0,
        eye_height: 0.0,
        sight_radius: 0.0,
        sight_angle: 0.0,
        melee: None,
    },
    ActorDef {
        name: "SpawnPoint",
        faction: Faction::Neutral,
        health: 1.0,
        corpse_lifetime: 0.0,
        radius: 0.0,
        height: 0.0,
        flags: BodyFlags::empty(),
        damage_on_collide: 0.0,
        impulse_on_collide: 0.0,
        drag: 0.0,
        walk_speed: 0.0,
        run_speed: 0.0,
        turn_speed: 0.0,
        eye_height: 0.0,
        sight_radius: 0.0,
        sight_angle: 0.0,
        melee: None,
    },
];

pub static TILE_DEFS: &[TileDef] = &[
    TileDef {
        name: "BrickFloor",
        is_solid: false,
        glyph: '.',
    },
    TileDef {
        name: "StoneWall",
        is_solid: true,
        glyph: '#',
    },
    TileDef {
        name: "RockWall",
        is_solid: true,
        glyph: 'R',
    },
    TileDef {
        name: "Grate",
        is_solid: false,
        glyph: ',',
    },
];

static ACTORS_BY_NAME: Lazy<HashMap<&'static str, &'static ActorDef>> =
    Lazy::new(|| ACTOR_DEFS.iter().map(|def| (def.name, def)).collect());

static TILES_BY_GLYPH: Lazy<HashMap<char, &'static TileDef>> =
    Lazy::new(|| TILE_DEFS.iter().map(|def| (def.glyph, def)).collect());

pub fn actor_by_name(name: &str) -> Option<&'static ActorDef> {
    ACTORS_BY_NAME.get(name).copied()
}

pub fn tile_by_name(name: &str) -> Option<&'static TileDef> {
    TILE_DEFS.iter().find(|def| def.name == name)
}

pub fn tile_by_glyph(glyph: char) -> Option<&'static TileDef> {
    TILES_BY_GLYPH.get(&glyph).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_resolve_known_names() {
        let marine = actor_by_name("Marine").unwrap();
        assert_eq!(marine.faction, Faction::Marine);
        assert!(marine.flags.contains(BodyFlags::SIMULATED));
        assert!(actor_by_name("Cyberdemon").is_none());

        assert!(tile_by_glyph('#').unwrap().is_solid);
        assert!(!tile_by_glyph('.').unwrap().is_solid);
        assert_eq!(tile_by_name("Grate").unwrap().glyph, ',');
    }

    #[test]
    fn only_demons_bite() {
        let demon = actor_by_name("Demon").unwrap().melee.unwrap();
        // reaches past the contact distance with a marine
        assert!(demon.range > 0.35 + 0.25);
        assert!(demon.refire_time > 0.0);
        assert!(actor_by_name("Marine").unwrap().melee.is_none());
    }

    #[test]
    fn glyphs_are_unique() {
        assert_eq!(TILES_BY_GLYPH.len(), TILE_DEFS.len());
    }
}
