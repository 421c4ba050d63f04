//! # Ember Engine
//!
//! A component-based scene graph with skeletal animation.
//!
//! ## Features
//!
//! - **Scene Graph**: Game objects in a per-scene arena, each owning one
//!   component per concrete type plus an ordered list of children
//! - **Messaging**: Typed messages delivered to subscribed components, to a
//!   single object, up the ancestor chain or one level down
//! - **Skeletal Animation**: Keyframe curves, clips, an animator component and
//!   matrix-palette skinning
//! - **Headless Rendering**: Uniform uploads go through the [`render::Renderer`]
//!   trait; [`render::UniformRecorder`] captures them for tests and tools
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ember_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let index = engine.scenes_mut().create_scene::<EmptyScene>("Main")?;
//!         engine.scenes_mut().set_active_scene(index)?;
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::headless(ApplicationConfig::default())?;
//!     engine.run_frames(&mut MyApp, 60, 1.0 / 60.0)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;

pub mod foundation;
pub mod events;
pub mod ecs;
pub mod scene;
pub mod animation;
pub mod assets;
pub mod render;

mod application;
mod engine;

pub use application::{Application, AppError};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Application, AppError,
        Engine, EngineError,
        animation::{AnimationClip, Animator, SkinnedMeshRenderer, WrapMode},
        assets::{BoneTable, ClipDescription},
        core::config::{ApplicationConfig, Config},
        ecs::{Camera, Component, ComponentContext, GameObjectId, RenderContext, Transform, World},
        events::{Message, MessageType},
        foundation::math::{Mat4, Quat, Vec3},
        render::{Renderer, UniformRecorder},
        scene::{EmptyScene, Scene, SceneBehavior, SceneManager},
    };
}
