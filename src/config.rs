//! Serializable configuration for the backdrop and the orb field.
//!
//! Every struct uses `#[serde(default)]`, so a config file only needs the
//! keys it wants to change:
//!
//! ```json
//! { "engine": { "particle_count": 300, "strategy": "binned" } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::connections::{ConnectionStrategy, DEFAULT_CONNECTION_DISTANCE};
use crate::error::ConfigError;
use crate::layout::{PlacementConfig, Skill};
use crate::spawn::SpawnRanges;
use crate::visuals::{Palette, VisualConfig};

/// Default number of backdrop particles.
pub const DEFAULT_PARTICLE_COUNT: usize = 120;

/// Particle engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of particles, fixed for the life of the engine.
    pub particle_count: usize,
    /// Colors particles are tinted from.
    pub palette: Palette,
    /// Distance below which particles are joined by a line.
    pub connection_distance: f32,
    /// How connection pairs are found.
    pub strategy: ConnectionStrategy,
    /// Largest per-axis speed at spawn.
    pub max_speed: f32,
    /// Smallest particle radius.
    pub size_min: f32,
    /// Largest particle radius (exclusive).
    pub size_max: f32,
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Non-particle visuals.
    pub visuals: VisualConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let ranges = SpawnRanges::default();
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            palette: Palette::default(),
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            strategy: ConnectionStrategy::default(),
            max_speed: ranges.max_speed,
            size_min: ranges.size_min,
            size_max: ranges.size_max,
            seed: None,
            visuals: VisualConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Spawn ranges derived from this config.
    pub fn spawn_ranges(&self) -> SpawnRanges {
        SpawnRanges {
            max_speed: self.max_speed,
            size_min: self.size_min,
            size_max: self.size_max,
        }
    }
}

/// Window settings for the interactive host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title prefix; the fps counter is appended.
    pub title: String,
    /// Initial inner width in logical pixels.
    pub width: u32,
    /// Initial inner height in logical pixels.
    pub height: u32,
    /// Whether the custom cursor follower is drawn.
    pub cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "driftfield".into(),
            width: 1280,
            height: 720,
            cursor: true,
        }
    }
}

/// Everything a [`crate::Backdrop`] needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Particle engine.
    pub engine: EngineConfig,
    /// Orb placement.
    pub placement: PlacementConfig,
    /// Orbs to scatter. Empty disables the orb layer.
    pub skills: Vec<Skill>,
    /// Window.
    pub window: WindowConfig,
}

impl BackdropConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.particle_count, 120);
        assert_eq!(config.connection_distance, 150.0);
        assert_eq!(config.palette.len(), 5);
        assert_eq!(config.spawn_ranges(), SpawnRanges::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BackdropConfig::from_json(
            r##"{ "engine": { "particle_count": 300, "strategy": "binned", "palette": ["#ff0000"] } }"##,
        )
        .unwrap();
        assert_eq!(config.engine.particle_count, 300);
        assert_eq!(config.engine.strategy, ConnectionStrategy::Binned);
        assert_eq!(config.engine.palette.len(), 1);
        assert_eq!(config.engine.connection_distance, 150.0);
        assert_eq!(config.placement, PlacementConfig::default());
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let err = BackdropConfig::from_json(r#"{ "engine": { "palette": ["blue"] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_default_round_trips_through_json() {
        let config = BackdropConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(BackdropConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"{{ "skills": [{{ "name": "Rust", "level": 90, "category": "language", "color": "#dea584" }}] }}"##
        )
        .unwrap();

        let config = BackdropConfig::load(file.path()).unwrap();
        assert_eq!(config.skills.len(), 1);
        assert_eq!(config.skills[0].name, "Rust");
        assert_eq!(config.skills[0].level, 90);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BackdropConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
