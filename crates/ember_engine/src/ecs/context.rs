//! Contexts handed to component hooks

use super::commands::CommandQueue;
use super::component::Component;
use super::components::Transform;
use super::game_object::{GameObject, GameObjectId};
use super::world::World;
use crate::events::Message;
use crate::foundation::math::Mat4;
use crate::render::Renderer;

/// Access to the world from inside `update`, `fixed_update` and `on_message`
///
/// The component whose hook is running is detached from its slot for the
/// duration of the call, so looking up its own type on the owner yields `None`.
/// Component state and transforms may be changed freely; structural changes go
/// through [`ComponentContext::commands`].
pub struct ComponentContext<'a> {
    world: &'a mut World,
    owner: GameObjectId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(world: &'a mut World, owner: GameObjectId) -> Self {
        Self { world, owner }
    }

    /// Game object owning the running component
    pub fn owner(&self) -> GameObjectId {
        self.owner
    }

    /// Read-only view of the whole world
    pub fn world(&self) -> &World {
        self.world
    }

    /// The owning game object
    pub fn game_object(&self) -> Option<&GameObject> {
        self.world.get(self.owner)
    }

    /// Transform of any game object
    pub fn transform_of(&self, id: GameObjectId) -> Option<&Transform> {
        self.world.get(id).map(GameObject::transform)
    }

    /// Mutable transform of any game object
    pub fn transform_of_mut(&mut self, id: GameObjectId) -> Option<&mut Transform> {
        self.world.get_mut(id).map(GameObject::transform_mut)
    }

    /// Component of type `T` on any game object
    pub fn get_component<T: Component>(&self, id: GameObjectId) -> Option<&T> {
        self.world.get(id)?.get_component::<T>()
    }

    /// Mutable component of type `T` on any game object
    pub fn get_component_mut<T: Component>(&mut self, id: GameObjectId) -> Option<&mut T> {
        self.world.get_mut(id)?.get_component_mut::<T>()
    }

    /// World matrix of any game object
    pub fn local_to_world_matrix(&self, id: GameObjectId) -> Option<Mat4> {
        self.world.local_to_world_matrix(id)
    }

    /// Deliver a message to another object's subscribers
    pub fn send_message(&mut self, target: GameObjectId, message: &Message) -> usize {
        self.world.send_message(target, message)
    }

    /// Queue for deferred structural changes
    pub fn commands(&mut self) -> &mut CommandQueue {
        self.world.commands_mut()
    }
}

/// Access to the world and the renderer from inside `render`
pub struct RenderContext<'a> {
    world: &'a World,
    owner: GameObjectId,
    renderer: &'a mut dyn Renderer,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(world: &'a World, owner: GameObjectId, renderer: &'a mut dyn Renderer) -> Self {
        Self {
            world,
            owner,
            renderer,
        }
    }

    /// Game object owning the running component
    pub fn owner(&self) -> GameObjectId {
        self.owner
    }

    /// Read-only view of the whole world
    pub fn world(&self) -> &World {
        self.world
    }

    /// Backend receiving uniform uploads
    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }
}
