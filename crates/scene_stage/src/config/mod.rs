//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Stage configuration
///
/// World sizing, camera defaults, framing factors and interaction tuning,
/// all overridable by the embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Extent of the world along each horizontal axis
    pub world_size: f32,

    /// Default camera azimuth in degrees
    pub default_alpha_deg: f32,

    /// Default camera polar angle in degrees
    pub default_beta_deg: f32,

    /// Default camera distance
    pub default_radius: f32,

    /// Vertical field of view in degrees
    pub fov_deg: f32,

    /// Scale applied to the minimal framing distance
    pub zoom_factor: f32,

    /// Reframe automatically whenever the scene context changes
    pub auto_zoom: bool,

    /// Enable idle auto-rotation of the camera
    pub auto_spin: bool,

    /// Per-frame approach ratio for ghost and camera interpolation
    pub dragging_ratio: f32,

    /// Hide ghost followers once both channels have converged
    pub auto_hide: bool,

    /// Drop-position snapping grid size; `None` passes positions through
    pub snap: Option<f32>,

    /// Horizontal jitter radius for the shuffling controller
    pub shuffle_radius: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            world_size: 100.0,
            default_alpha_deg: 45.0,
            default_beta_deg: 45.0,
            default_radius: 45.0,
            fov_deg: 45.0,
            zoom_factor: 1.0,
            auto_zoom: false,
            auto_spin: false,
            dragging_ratio: 0.1,
            auto_hide: false,
            snap: None,
            shuffle_radius: 3.0,
        }
    }
}

impl Config for StageConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = StageConfig::default();
        assert_eq!(config.world_size, 100.0);
        assert_eq!(config.default_radius, 45.0);
        assert_eq!(config.dragging_ratio, 0.1);
        assert!(config.snap.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: StageConfig = toml::from_str("world_size = 50.0\nsnap = 1.0\n").unwrap();
        assert_eq!(config.world_size, 50.0);
        assert_eq!(config.snap, Some(1.0));
        assert_eq!(config.default_alpha_deg, 45.0);
    }
}
