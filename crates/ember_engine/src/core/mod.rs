//! # Core Engine Module
//!
//! Shared abstractions every other subsystem builds on.
//!
//! ## Organization
//!
//! - **Object**: Instance identity and active state for engine entities
//! - **Config**: Unified configuration for engine, animation and camera defaults

pub mod config;
pub mod object;

pub use object::{InstanceId, Object};

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    AnimationConfig,
    CameraConfig,
    Config,
    ConfigError,
};
