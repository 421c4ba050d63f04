//! # Unified Configuration System
//!
//! All engine configuration structures live here. Every section is
//! serde-serializable so an application can keep its settings in a TOML or RON
//! file and load them through the [`Config`] trait.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging, frame pacing, fixed timestep
//! - **Animation Config**: Playback defaults and the skinning uniform name
//! - **Camera Config**: Projection parameters for the auto-created main camera

use serde::{Serialize, Deserialize};

// Re-export from the config module for compatibility
pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core engine behavior: logging and main loop pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine (`error`, `warn`, `info`, `debug`, `trace`)
    pub log_level: String,
    /// Fixed timestep for `fixed_update` in seconds
    pub fixed_timestep: f32,
    /// Ceiling applied to a single frame delta in seconds
    pub max_frame_delta: f32,
    /// Stop the main loop after this many frames (unlimited when unset)
    pub max_frames: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            fixed_timestep: 1.0 / 60.0,
            max_frame_delta: 0.25,
            max_frames: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the fixed timestep
    pub fn with_fixed_timestep(mut self, step: f32) -> Self {
        self.fixed_timestep = step;
        self
    }

    /// Limit the number of frames the main loop runs
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.fixed_timestep.is_nan() || self.fixed_timestep <= 0.0 {
            return Err("Fixed timestep must be positive".to_string());
        }
        if self.max_frame_delta.is_nan() || self.max_frame_delta < self.fixed_timestep {
            return Err("Max frame delta must be at least one fixed timestep".to_string());
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Animation Configuration
///
/// Defaults applied when building animation data and uploading skinning data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Ticks per second used when a clip does not author its own rate
    pub default_ticks_per_second: f32,
    /// Shader uniform receiving the bone matrix palette
    pub palette_uniform: String,
}

impl AnimationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_ticks_per_second.is_nan() || self.default_ticks_per_second <= 0.0 {
            return Err("Default ticks per second must be positive".to_string());
        }
        if self.palette_uniform.is_empty() {
            return Err("Palette uniform name cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_ticks_per_second: 25.0,
            palette_uniform: crate::animation::BONE_PALETTE_UNIFORM.to_string(),
        }
    }
}

/// # Camera Configuration
///
/// Projection parameters for the camera every scene creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Width / height
    pub aspect_ratio: f32,
    /// Near clip plane distance
    pub near: f32,
    /// Far clip plane distance
    pub far: f32,
}

impl CameraConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(1.0..180.0).contains(&self.fov_degrees) {
            return Err(format!("Field of view {} out of range", self.fov_degrees));
        }
        if self.aspect_ratio.is_nan() || self.aspect_ratio <= 0.0 {
            return Err("Aspect ratio must be positive".to_string());
        }
        if self.near.is_nan() || self.far.is_nan() || self.near <= 0.0 || self.far <= self.near {
            return Err("Clip planes must satisfy 0 < near < far".to_string());
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Animation defaults
    pub animation: AnimationConfig,
    /// Main camera projection
    pub camera: CameraConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate().map_err(ConfigError::Invalid)?;
        self.animation.validate().map_err(ConfigError::Invalid)?;
        self.camera.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
