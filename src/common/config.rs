//! Tunable gameplay settings.
//!
//! Loaded once at startup from an optional `config.toml`; every value is
//! read-only afterwards. A missing or unreadable file falls back to the
//! compiled defaults so the game never refuses to boot over configuration.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub player_speed: f32,
    pub invincibility_duration: f32,
    pub bullet_speed: f32,
    pub bullet_lifetime: f32,
    pub enemy_default_speed: f32,
    pub enemy_lifetime: f32,
    pub yellow_square_speed_multiplier: f32,
    pub enemy_spawn_interval: f32,
    pub powerup_drop_chance: f32,
    pub explosion_lifetime: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_speed: 420.0,
            invincibility_duration: 5.0,
            bullet_speed: 900.0,
            bullet_lifetime: 10.0,
            enemy_default_speed: 120.0,
            enemy_lifetime: 20.0,
            yellow_square_speed_multiplier: 2.0,
            enemy_spawn_interval: 2.0,
            powerup_drop_chance: 0.20,
            explosion_lifetime: 1.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Load settings from `path`, falling back to defaults on any failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("using default settings, could not load {path:?}: {err}");
                Self::default()
            }
        }
    }
}
