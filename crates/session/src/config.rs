use blockspace_kernel::PhysicsConfig;
use blockspace_persist::{DEFAULT_SAVE_DIR, DEFAULT_SLOT};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Session tunables. Every field has a default, so a config file only needs
/// the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub physics: PhysicsConfig,
    /// Fixed simulation step in seconds.
    pub tick_dt: f32,
    /// Maximum ray length for breaking and placing.
    pub reach: f32,
    /// Eye height above the centre of the player's box.
    pub eye_offset: f32,
    pub half_extents: Vec3,
    /// Centre of the player's box at start.
    pub spawn: Vec3,
    pub max_pitch: f32,
    pub save_dir: PathBuf,
    pub save_slot: String,
    pub default_block: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            tick_dt: 1.0 / 60.0,
            reach: 8.0,
            eye_offset: 0.5,
            half_extents: Vec3::new(0.3, 0.3, 0.9),
            spawn: Vec3::new(0.5, 0.5, 3.0),
            max_pitch: 85.0,
            save_dir: PathBuf::from(DEFAULT_SAVE_DIR),
            save_slot: DEFAULT_SLOT.to_string(),
            default_block: "stone".to_string(),
        }
    }
}

impl SessionConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded session config");
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_dt", self.tick_dt),
            ("reach", self.reach),
            ("half_extents.x", self.half_extents.x),
            ("half_extents.y", self.half_extents.y),
            ("half_extents.z", self.half_extents.z),
            ("physics.skin", self.physics.skin),
            ("physics.ground_epsilon", self.physics.ground_epsilon),
            ("physics.max_speed", self.physics.max_speed),
            ("physics.max_dt", self.physics.max_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !self.spawn.is_finite() || !self.eye_offset.is_finite() {
            return Err(ConfigError::Invalid("spawn and eye_offset must be finite".into()));
        }
        if !(0.0..=90.0).contains(&self.max_pitch) {
            return Err(ConfigError::Invalid("max_pitch must be within [0, 90]".into()));
        }
        Ok(())
    }
}
