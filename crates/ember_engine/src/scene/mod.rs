//! Scene management
//!
//! A [`Scene`] owns one [`World`](crate::ecs::World) of game objects and a
//! boxed [`SceneBehavior`] with the user's hooks. The [`SceneManager`] owns
//! every scene, hands out build indices and forwards frames to the active one.
//!
//! ```text
//! SceneManager ──update/render──▶ active Scene ──▶ World ──▶ Components
//! ```

#[allow(clippy::module_inception)]
mod scene;
mod scene_manager;

pub use scene::{EmptyScene, Scene, SceneBehavior, MAIN_CAMERA_NAME};
pub use scene_manager::{SceneError, SceneManager, SceneResult};

#[cfg(test)]
mod tests;
