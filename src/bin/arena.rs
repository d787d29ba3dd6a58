//! arena.rs - headless run of the simulation on a small tile map.
//!
//! USAGE:
//! ```bash
//! RUST_LOG=debug cargo run --bin arena -- --frames 600 --config sim.json
//! ```

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec3;
use std::{fs, path::PathBuf};

use tilecast::{
    config::SimConfig,
    defs::actor_by_name,
    raycast::ImpactKind,
    sim::{ActorHandle, Controller, Orientation, Simulation},
    world::TileMap,
};

const BUILTIN_LAYOUT: &[&str] = &[
    "############",
    "#..........#",
    "#..R.......#",
    "#..........#",
    "#......#...#",
    "#......#...#",
    "#..........#",
    "############",
];

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// JSON file overriding the default simulation settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Glyph layout, one row per line (`#`/`R` solid, `.`/`,` floor)
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Number of fixed steps to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Fire the hitscan weapon every N frames
    #[arg(long, default_value_t = 20)]
    fire_every: u64,

    /// Number of demons to spawn
    #[arg(long, default_value_t = 3)]
    demons: usize,
}

fn load_map(path: Option<&PathBuf>) -> anyhow::Result<TileMap> {
    let Some(path) = path else {
        return Ok(TileMap::from_layout("builtin", BUILTIN_LAYOUT)?);
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "layout".into());
    Ok(TileMap::from_layout(name, &rows)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let config = match &opts.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    let map = load_map(opts.layout.as_ref())?;
    let mut sim = Simulation::new(map, config);

    let (Some(marine_def), Some(demon_def), Some(plasma_def)) = (
        actor_by_name("Marine"),
        actor_by_name("Demon"),
        actor_by_name("PlasmaProjectile"),
    ) else {
        bail!("built-in actor definitions missing");
    };

    let marine = sim.spawn(marine_def, Vec3::new(1.5, 1.5, 0.0), Orientation::default())?;
    sim.actors_mut()
        .resolve_mut(marine)
        .context("marine vanished after spawning")?
        .controller = Some(Controller::Player { index: 0 });

    let dims = sim.map().dimensions();
    let mut demons = Vec::new();
    for i in 0..opts.demons {
        // spread along the far wall, skipping solid tiles
        let x = dims.x as f32 - 2.5;
        let y = 1.5 + (i as f32 * 2.0) % (dims.y as f32 - 2.0).max(1.0);
        let pos = Vec3::new(x, y, 0.0);
        if sim.map().is_position_in_solid(pos) {
            log::warn!("skipping demon {i}: spawn point {pos} is inside a wall");
            continue;
        }
        let demon = sim.spawn(demon_def, pos, Orientation::new(std::f32::consts::PI, 0.0))?;
        if let Some(actor) = sim.actors_mut().resolve_mut(demon) {
            actor.controller = Some(Controller::Ai {
                target: ActorHandle::INVALID,
            });
        }
        demons.push(demon);
    }

    let mut kills = 0;
    for frame in 0..opts.frames {
        if !sim.actors().contains(marine) {
            log::info!("marine is gone after {frame} frames");
            break;
        }

        // aim at the nearest remaining demon
        let aim = demons
            .iter()
            .filter_map(|h| sim.actors().resolve(*h))
            .filter(|a| a.body.is_live())
            .map(|a| a.body.xy())
            .min_by(|a, b| {
                let from = sim.actors().resolve(marine).map(|m| m.body.xy()).unwrap_or_default();
                from.distance_squared(*a).total_cmp(&from.distance_squared(*b))
            });
        if let (Some(target), Some(me)) = (aim, sim.actors_mut().resolve_mut(marine)) {
            let to = target - me.body.xy();
            me.body.orientation.yaw = to.to_angle();
        }

        if opts.fire_every > 0 && frame % opts.fire_every == 0 {
            if let Some(hit) = sim.fire(marine) {
                match hit.kind {
                    ImpactKind::Actor => {
                        let killed = hit
                            .actor
                            .and_then(|h| sim.actors().resolve(h))
                            .is_some_and(|a| a.body.is_corpse());
                        if killed {
                            kills += 1;
                        }
                        log::info!(
                            "frame {frame}: hit {:?} at {:.2}{}",
                            hit.actor,
                            hit.ray.impact_distance,
                            if killed { " (kill)" } else { "" }
                        );
                    }
                    kind => {
                        let at = hit.ray.impact_position;
                        log::debug!("frame {frame}: shot hit {kind:?} at {at}");
                    }
                }
            }
        }
        let launch_now = frame % (opts.fire_every.max(1) * 3) == 1;
        if launch_now && sim.launch(marine, plasma_def)?.is_none() {
            log::debug!("frame {frame}: launcher still cooling down");
        }

        let report = sim.tick();
        if report.projectile_hits > 0 {
            log::info!("frame {}: {} projectile hit(s)", report.frame, report.projectile_hits);
        }
    }

    let survivors = demons.iter().filter(|h| sim.actors().contains(**h)).count();
    log::info!(
        "done after {} frames: {kills} hitscan kills, {survivors}/{} demons left, {} actors live",
        sim.frame(),
        demons.len(),
        sim.actors().len()
    );
    Ok(())
}
