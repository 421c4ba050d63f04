//! Component-based scene graph
//!
//! Game objects live in a per-scene [`World`] arena and own their components
//! by concrete type. Component hooks get a [`ComponentContext`] that borrows
//! the rest of the world; structural changes made from hooks are deferred
//! through the [`CommandQueue`].

pub mod commands;
pub mod component;
pub mod components;
pub mod context;
pub mod game_object;
pub mod world;

pub use commands::{CommandQueue, WorldCommand};
pub use component::{AsAny, Component, ComponentClone};
pub use components::{Camera, Transform};
pub use context::{ComponentContext, RenderContext};
pub use game_object::{GameObject, GameObjectId};
pub use world::{World, WorldError, WorldResult};
