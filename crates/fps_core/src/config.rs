//! Simulation settings. Loaded from `sim.ron` at startup.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::ai::AiTuning;
use crate::error::ConfigError;

/// File looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "sim.ron";

/// Accepted simulation rates, in Hz.
pub const TICK_RATE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10_000.0;

/// Everything needed to build a [`crate::Simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Seed for weapon spread.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Fixed simulation rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// How long the headless driver runs, in simulated seconds.
    #[serde(default = "default_run_seconds")]
    pub run_seconds: f64,
    #[serde(default = "default_pool_initial")]
    pub pool_initial: usize,
    #[serde(default = "default_pool_max")]
    pub pool_max: usize,
    /// Projectile-to-enemy distance that counts as a hit.
    #[serde(default = "default_hit_radius")]
    pub hit_radius: f32,
    #[serde(default = "default_player_start")]
    pub player_start: Vec3,
    #[serde(default = "default_player_health")]
    pub player_max_health: f32,
    /// Walk speed in units per second.
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    #[serde(default)]
    pub ai: AiTuning,
    #[serde(default = "default_enemies")]
    pub enemies: Vec<EnemySpawn>,
}

/// One enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub position: Vec3,
    #[serde(default)]
    pub patrol: Vec<Vec3>,
    #[serde(default = "default_detection_range")]
    pub detection_range: f32,
    #[serde(default = "default_attack_range")]
    pub attack_range: f32,
    #[serde(default = "default_enemy_health")]
    pub max_health: f32,
}

impl EnemySpawn {
    /// Stationary enemy with default stats.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            patrol: Vec::new(),
            detection_range: default_detection_range(),
            attack_range: default_attack_range(),
            max_health: default_enemy_health(),
        }
    }

    pub fn with_patrol(mut self, patrol: Vec<Vec3>) -> Self {
        self.patrol = patrol;
        self
    }
}

fn default_seed() -> u64 {
    0x5eed
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_run_seconds() -> f64 {
    120.0
}
fn default_pool_initial() -> usize {
    50
}
fn default_pool_max() -> usize {
    200
}
fn default_hit_radius() -> f32 {
    1.0
}
fn default_player_start() -> Vec3 {
    Vec3::new(5.0, 1.0, 5.0)
}
fn default_player_health() -> f32 {
    100.0
}
fn default_player_speed() -> f32 {
    6.0
}
fn default_detection_range() -> f32 {
    25.0
}
fn default_attack_range() -> f32 {
    3.0
}
fn default_enemy_health() -> f32 {
    100.0
}

/// The reference arena roster. The first two patrollers start on their first
/// waypoint; the pillar centres at (15, 15) and (35, 35) are not walkable.
fn default_enemies() -> Vec<EnemySpawn> {
    vec![
        EnemySpawn::at(Vec3::new(10.0, 1.0, 10.0)).with_patrol(vec![
            Vec3::new(10.0, 1.0, 10.0),
            Vec3::new(20.0, 1.0, 10.0),
            Vec3::new(20.0, 1.0, 20.0),
        ]),
        EnemySpawn::at(Vec3::new(30.0, 1.0, 30.0)).with_patrol(vec![
            Vec3::new(30.0, 1.0, 30.0),
            Vec3::new(40.0, 1.0, 30.0),
            Vec3::new(40.0, 1.0, 40.0),
        ]),
        EnemySpawn::at(Vec3::new(45.0, 1.0, 10.0)),
        EnemySpawn::at(Vec3::new(10.0, 1.0, 45.0)),
        EnemySpawn::at(Vec3::new(25.0, 1.0, 40.0)),
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_rate: default_tick_rate(),
            run_seconds: default_run_seconds(),
            pool_initial: default_pool_initial(),
            pool_max: default_pool_max(),
            hit_radius: default_hit_radius(),
            player_start: default_player_start(),
            player_max_health: default_player_health(),
            player_speed: default_player_speed(),
            ai: AiTuning::default(),
            enemies: default_enemies(),
        }
    }
}

impl SimConfig {
    /// Load config from `sim.ron` in the working directory. If the file is
    /// missing or invalid, returns the default config.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            log::info!("No {} found, using default config", CONFIG_FILE);
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from `path`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = ron::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TICK_RATE_RANGE.contains(&self.tick_rate) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be within {:?} Hz, got {}",
                TICK_RATE_RANGE, self.tick_rate
            )));
        }
        if !(self.run_seconds.is_finite() && self.run_seconds >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "run_seconds must be finite and non-negative, got {}",
                self.run_seconds
            )));
        }
        if !(self.hit_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "hit_radius must be positive, got {}",
                self.hit_radius
            )));
        }
        if !(self.player_max_health > 0.0) {
            return Err(ConfigError::Invalid("player_max_health must be positive".into()));
        }
        for (i, enemy) in self.enemies.iter().enumerate() {
            if !(enemy.max_health > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "enemy {i}: max_health must be positive"
                )));
            }
            if enemy.attack_range < 0.0 || enemy.detection_range < 0.0 {
                return Err(ConfigError::Invalid(format!("enemy {i}: negative range")));
            }
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}
