//! Application configuration, loaded from JSON.

use std::path::Path;

use anyhow::{Context, Result};
use otter_ecs::TickConfig;
use otter_game::{DEFAULT_SPEED_SCALE, OscillatePosition};
use otter_math::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tick loop settings.
    pub tick: TickConfig,
    /// Initial scene.
    pub scene: SceneConfig,
}

impl AppConfig {
    /// Read a configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parse and validate a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.tick.validate()?;
        Ok(config)
    }
}

/// The oscillating entity spawned at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Distance from the origin at which the entity turns around.
    pub oscillate_bound: f32,
    /// Multiplier applied to velocity by the movement system.
    pub speed_scale: f32,
    /// Initial position.
    pub start_position: Vec3,
    /// Initial velocity.
    pub start_velocity: Vec3,
    /// Mesh asset handle.
    pub mesh: u64,
    /// Material asset handle.
    pub material: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            oscillate_bound: OscillatePosition::DEFAULT_BOUND,
            speed_scale: DEFAULT_SPEED_SCALE,
            start_position: Vec3::ZERO,
            start_velocity: Vec3::X,
            mesh: 0,
            material: 0,
        }
    }
}
