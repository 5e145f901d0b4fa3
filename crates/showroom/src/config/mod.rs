//! Configuration system
//!
//! Every tunable constant of the showroom lives in [`ShowroomConfig`]. The
//! defaults reproduce the stock demo; a TOML or RON file can override any
//! subset of fields.

pub use serde::{Deserialize, Serialize};

use std::path::Path;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
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

/// Top-level showroom configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowroomConfig {
    /// Host window settings
    pub window: WindowConfig,
    /// Asset locations
    pub assets: AssetPaths,
    /// Physics world settings
    pub physics: PhysicsConfig,
    /// Spawner and pool settings
    pub spawn: SpawnConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Hover highlight settings
    pub hover: HoverConfig,
}

impl Config for ShowroomConfig {}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Showroom".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Where the three stock assets live
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    /// Root directory the other paths are relative to
    pub root: String,
    /// Equirectangular EXR environment map
    pub background: String,
    /// Sofa GLB model
    pub sofa: String,
    /// Logo GLB model (also the spawn template)
    pub logo: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            root: "assets".to_string(),
            background: "background.exr".to_string(),
            sofa: "untitled.glb".to_string(),
            logo: "aphos.glb".to_string(),
        }
    }
}

/// Physics world configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (m/s²)
    pub gravity: [f32; 3],
    /// Fixed simulation step per rendered frame, in seconds
    pub time_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, -9.82, 0.0],
            time_step: 1.0 / 60.0,
        }
    }
}

/// Spawner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Minimum time between two creations while the trigger is held
    pub creation_delay_ms: u64,
    /// Time after creation at which the oldest pair is evicted
    pub lifetime_ms: u64,
    /// Body mass
    pub mass: f32,
    /// Cylinder radius
    pub radius: f32,
    /// Cylinder height
    pub height: f32,
    /// Initial angular velocity (rad/s)
    pub angular_velocity: [f32; 3],
    /// Linear damping
    pub linear_damping: f32,
    /// Angular damping
    pub angular_damping: f32,
    /// Contact friction
    pub friction: f32,
    /// Contact restitution
    pub restitution: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            creation_delay_ms: 100,
            lifetime_ms: 10_000,
            mass: 1000.0,
            radius: 1.0,
            height: 0.3,
            angular_velocity: [4.0, 10.0, 10.0],
            linear_damping: 0.1,
            angular_damping: 0.1,
            friction: 0.1,
            restitution: 0.3,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Initial camera position
    pub position: [f32; 3],
    /// Orbit target
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [25.0, 10.0, 20.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Hover highlight configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Colour applied while the pointer ray touches the tracked object
    pub highlight_color: u32,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            highlight_color: 0x0000ff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_demo() {
        let config = ShowroomConfig::default();
        assert_eq!(config.spawn.creation_delay_ms, 100);
        assert_eq!(config.spawn.lifetime_ms, 10_000);
        assert_eq!(config.spawn.angular_velocity, [4.0, 10.0, 10.0]);
        assert!((config.physics.time_step - 1.0 / 60.0).abs() < f32::EPSILON);
        assert_eq!(config.hover.highlight_color, 0x0000ff);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = ShowroomConfig::from_toml_str(
            r#"
            [spawn]
            lifetime_ms = 2500

            [window]
            title = "Test"
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.spawn.lifetime_ms, 2500);
        assert_eq!(config.spawn.creation_delay_ms, 100);
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 1280);
    }

    #[test]
    fn test_toml_and_ron_files_round_trip_through_disk() {
        let dir = std::env::temp_dir().join(format!("showroom-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");

        let mut config = ShowroomConfig::default();
        config.spawn.mass = 42.0;

        for name in ["showroom.toml", "showroom.ron"] {
            let path = dir.join(name);
            config.save_to_file(&path).expect("save");
            let loaded = ShowroomConfig::load_from_file(&path).expect("load");
            assert_eq!(loaded, config);
        }

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = ShowroomConfig::default()
            .save_to_file("showroom.yaml")
            .expect_err("yaml is not supported");
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }
}
