//! Built-in components
//!
//! Components are the building blocks attached to game objects. The transform
//! is present on every object; the camera is attached to each scene's main
//! camera object. Animation components live in [`crate::animation`].

pub mod camera;
pub mod transform;

pub use camera::Camera;
pub use transform::Transform;
