//! # Rendering Interface
//!
//! The scene graph does not talk to a GPU API directly. Components that need to
//! draw (the camera, the skinned mesh renderer) push named shader uniforms
//! through the [`Renderer`] trait, which a backend implements on top of its own
//! pipeline and buffer management.
//!
//! ## Architecture
//!
//! ```text
//! SceneManager::render
//!      ↓
//! Scene → World → Component::render(RenderContext)
//!      ↓
//! dyn Renderer (backend)
//! ```
//!
//! [`UniformRecorder`] is a headless backend that stores the latest value of
//! every uniform; it backs the demo application and the test suite.

mod recorder;

pub use recorder::UniformRecorder;

use crate::foundation::math::{Mat4, Vec3, Vec4};
use thiserror::Error;

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Value of a shader uniform
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// Single float
    Float(f32),
    /// Three component vector
    Vec3(Vec3),
    /// Four component vector
    Vec4(Vec4),
    /// 4x4 matrix
    Mat4(Mat4),
    /// Array of 4x4 matrices (bone palettes)
    Mat4Array(Vec<Mat4>),
}

/// Uniform upload capability exposed by a rendering backend
///
/// Uniform names follow the `u_camelCase` convention used by the engine's
/// shaders. Backends may reject names their active program does not declare.
pub trait Renderer {
    /// Upload a single value under `name`
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> RenderResult<()>;

    /// Upload a float uniform
    fn set_uniform_f32(&mut self, name: &str, value: f32) -> RenderResult<()> {
        self.set_uniform(name, UniformValue::Float(value))
    }

    /// Upload a vec3 uniform
    fn set_uniform_vec3(&mut self, name: &str, value: Vec3) -> RenderResult<()> {
        self.set_uniform(name, UniformValue::Vec3(value))
    }

    /// Upload a vec4 uniform
    fn set_uniform_vec4(&mut self, name: &str, value: Vec4) -> RenderResult<()> {
        self.set_uniform(name, UniformValue::Vec4(value))
    }

    /// Upload a mat4 uniform
    fn set_uniform_mat4(&mut self, name: &str, value: Mat4) -> RenderResult<()> {
        self.set_uniform(name, UniformValue::Mat4(value))
    }

    /// Upload an array of mat4 uniforms
    fn set_uniform_mat4_array(&mut self, name: &str, values: &[Mat4]) -> RenderResult<()> {
        self.set_uniform(name, UniformValue::Mat4Array(values.to_vec()))
    }
}

/// Comprehensive error types for renderer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The active shader program has no uniform with this name
    #[error("Unknown uniform: {0}")]
    UnknownUniform(String),

    /// The uniform exists but the value has the wrong shape
    #[error("Uniform {name} expects {expected}")]
    TypeMismatch {
        /// Uniform name
        name: String,
        /// Expected value shape
        expected: String,
    },

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    BackendError(String),
}
