//! Engine configuration loaded from YAML.
//!
//! Every field has a default, so an empty document (or no file at all) is a valid config.

use notdoom_input::{Controls, DEFAULT_FULL_ROTATION};
use notdoom_ecs::PhysicsComponent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub physics: PhysicsConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "not-doom".into(),
            width: 800,
            height: 600,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub near: f32,
    pub far: f32,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            near: 0.5,
            far: 500.0,
            fov_degrees: 75.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Units dropped per step by gravity-affected bodies.
    pub gravity: f32,
    /// Walking speed factor. Input is scaled by `speed * dt` into velocity and then
    /// by `dt` again into position, so per-frame travel is `speed * dt^2`.
    pub movement_speed: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: PhysicsComponent::K_GRAVITY,
            movement_speed: 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse units for one full turn.
    pub mouse_full_rotation: f32,
    pub controls: Controls,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_full_rotation: DEFAULT_FULL_ROTATION,
            controls: Controls::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Largest on-screen edge, in pixels, of one tessellated sprite cell.
    pub tile_length: f32,
    /// Instance matrices the batched renderer may emit per frame.
    pub max_instances: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_length: 32.0,
            max_instances: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub asset_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
        }
    }
}

impl EngineConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values that would make projection or tessellation degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.window.width == 0 || self.window.height == 0 {
            return invalid(format!(
                "window size {}x{} must be non-zero",
                self.window.width, self.window.height
            ));
        }
        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return invalid(format!(
                "camera planes must satisfy 0 < near < far (near={}, far={})",
                camera.near, camera.far
            ));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            ));
        }
        if self.input.mouse_full_rotation == 0.0 {
            return invalid("mouse_full_rotation must be non-zero".into());
        }
        if !(self.render.tile_length >= 1.0) {
            return invalid(format!(
                "tile_length must be at least one pixel, got {}",
                self.render.tile_length
            ));
        }
        if self.render.max_instances == 0 {
            return invalid("max_instances must be positive".into());
        }
        Ok(())
    }
}
