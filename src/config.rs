//! Runtime knobs for the simulation, loadable from JSON.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::sim::{HitscanWeapon, MAX_ACTOR_SLOTS, MAX_WEAPON_RANGE, ProjectileWeapon};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Every field has a default, so a config file only lists what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed simulation steps per second.
    pub tick_rate: u32,
    /// Upper bound on registry slots.
    pub max_actors: usize,
    pub hitscan: HitscanWeapon,
    pub projectile: ProjectileWeapon,
    /// Run the chase AI each frame.
    pub ai_enabled: bool,
    /// Seed for weapon spread.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            max_actors: MAX_ACTOR_SLOTS,
            hitscan: HitscanWeapon::default(),
            projectile: ProjectileWeapon::default(),
            ai_enabled: true,
            seed: 0,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive"));
        }
        if self.max_actors == 0 {
            return Err(ConfigError::Invalid("max_actors must be positive"));
        }
        if !(self.hitscan.range > 0.0) {
            return Err(ConfigError::Invalid("hitscan.range must be positive"));
        }
        if self.hitscan.range > MAX_WEAPON_RANGE {
            return Err(ConfigError::Invalid("hitscan.range is too long"));
        }
        if self.hitscan.damage < 0.0 {
            return Err(ConfigError::Invalid("hitscan.damage must not be negative"));
        }
        if !(self.hitscan.refire_time >= 0.0 && self.projectile.refire_time >= 0.0) {
            return Err(ConfigError::Invalid("refire_time must not be negative"));
        }
        if !(self.projectile.speed > 0.0) {
            return Err(ConfigError::Invalid("projectile.speed must be positive"));
        }
        if !(0.0..=90.0).contains(&self.projectile.cone) {
            return Err(ConfigError::Invalid("projectile.cone must lie in [0, 90] degrees"));
        }
        Ok(())
    }

    /// Seconds per tick.
    #[inline]
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    #[inline]
    pub fn tic_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.tick_rate.max(1)))
    }
}
