//! Board and movement tuning, loaded from `assets/board.ron`.

use std::fs;
use std::io;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_PATH: &str = "assets/board.ron";

const DEFAULT_ACTIONS_PATH: &str = "assets/actions.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: ron::de::SpannedError,
    },
    #[error("{field} must be at least 3 (got {value})")]
    TooFewTiles { field: &'static str, value: u32 },
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
}

/// Fully determines the board geometry plus the pacing of token movement.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub horizontal_tiles: u32,
    pub vertical_tiles: u32,
    pub tile_size: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
    /// Token speed while hopping between tiles, in layout units per second.
    pub move_speed: f32,
    /// Pause between single-tile hops, in seconds.
    pub step_delay: f32,
    pub actions_path: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizontal_tiles: 7,
            vertical_tiles: 5,
            tile_size: 72.0,
            horizontal_spacing: 22.0,
            vertical_spacing: 8.0,
            move_speed: 500.0,
            step_delay: 0.1,
            actions_path: DEFAULT_ACTIONS_PATH.to_string(),
        }
    }
}

impl GameConfig {
    /// Reads the RON config, falling back to defaults when the file is absent.
    /// A file that exists but fails to parse or validate is an error: starting
    /// with a silently wrong board is worse than not starting.
    pub fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        let config = match fs::read_to_string(path) {
            Ok(text) => ron::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_string(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_string(),
                    source,
                });
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizontal_tiles < 3 {
            return Err(ConfigError::TooFewTiles {
                field: "horizontal_tiles",
                value: self.horizontal_tiles,
            });
        }
        if self.vertical_tiles < 3 {
            return Err(ConfigError::TooFewTiles {
                field: "vertical_tiles",
                value: self.vertical_tiles,
            });
        }
        for (field, value) in [("tile_size", self.tile_size), ("move_speed", self.move_speed)] {
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
            ("step_delay", self.step_delay),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Number of tiles on the outer perimeter ring.
    pub fn tile_count(&self) -> usize {
        (self.horizontal_tiles as usize) * 2 + (self.vertical_tiles as usize - 2) * 2
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = GameConfig::load_or_default("does/not/exist.ron").unwrap();
        assert_eq!(config.horizontal_tiles, 7);
        assert_eq!(config.vertical_tiles, 5);
        assert_eq!(config.tile_count(), 20);
    }

    #[test]
    fn partial_ron_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(horizontal_tiles: 4, vertical_tiles: 3)").unwrap();
        let config = GameConfig::load_or_default(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.horizontal_tiles, 4);
        assert_eq!(config.vertical_tiles, 3);
        assert_eq!(config.tile_count(), 10);
        // untouched fields keep their defaults
        assert_eq!(config.actions_path, DEFAULT_ACTIONS_PATH);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "(horizontal_tiles: \"many\")").unwrap();
        let err = GameConfig::load_or_default(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_rings_thinner_than_three_tiles() {
        let config = GameConfig {
            horizontal_tiles: 2,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewTiles { field: "horizontal_tiles", .. })
        ));

        let config = GameConfig {
            vertical_tiles: 1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooFewTiles { field: "vertical_tiles", .. })
        ));
    }

    #[test]
    fn rejects_non_positive_geometry() {
        let config = GameConfig {
            tile_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "tile_size", .. })
        ));

        let config = GameConfig {
            horizontal_spacing: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "horizontal_spacing", .. })
        ));
    }
}
