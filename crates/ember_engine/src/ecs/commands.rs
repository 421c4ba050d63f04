//! Deferred structural changes
//!
//! Component hooks run while the world is being traversed, so they must not
//! create or remove game objects or components directly. They queue a
//! [`WorldCommand`] instead; the scene applies the queue once per frame after
//! its late-update hook.

use std::any::TypeId;

use super::component::{type_key, Component};
use super::game_object::GameObjectId;

/// A structural change waiting for the end of the frame
pub enum WorldCommand {
    /// Create a game object
    Spawn {
        /// Name of the new object
        name: String,
        /// Optional parent
        parent: Option<GameObjectId>,
    },
    /// Destroy a game object and its subtree
    Destroy(GameObjectId),
    /// Attach a component
    AddComponent(GameObjectId, TypeId, Box<dyn Component>),
    /// Detach a component by concrete type
    RemoveComponent(GameObjectId, TypeId),
    /// Toggle a game object's active flag
    SetActive(GameObjectId, bool),
}

impl std::fmt::Debug for WorldCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn { name, parent } => write!(f, "Spawn({name:?}, parent: {parent:?})"),
            Self::Destroy(id) => write!(f, "Destroy({id:?})"),
            Self::AddComponent(id, _, component) => write!(f, "AddComponent({id:?}, {})", component.type_name()),
            Self::RemoveComponent(id, key) => write!(f, "RemoveComponent({id:?}, {key:?})"),
            Self::SetActive(id, active) => write!(f, "SetActive({id:?}, {active})"),
        }
    }
}

/// Queue of deferred structural changes
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<WorldCommand>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue creation of a game object
    pub fn spawn(&mut self, name: impl Into<String>, parent: Option<GameObjectId>) {
        self.commands.push(WorldCommand::Spawn {
            name: name.into(),
            parent,
        });
    }

    /// Queue destruction of a game object
    pub fn destroy(&mut self, id: GameObjectId) {
        self.commands.push(WorldCommand::Destroy(id));
    }

    /// Queue attaching a component
    pub fn add_component<T: Component>(&mut self, id: GameObjectId, component: T) {
        self.commands
            .push(WorldCommand::AddComponent(id, type_key::<T>(), Box::new(component)));
    }

    /// Queue detaching the component of type `T`
    pub fn remove_component<T: Component>(&mut self, id: GameObjectId) {
        self.commands.push(WorldCommand::RemoveComponent(id, type_key::<T>()));
    }

    /// Queue toggling a game object's active flag
    pub fn set_active(&mut self, id: GameObjectId, active: bool) {
        self.commands.push(WorldCommand::SetActive(id, active));
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<WorldCommand> {
        std::mem::take(&mut self.commands)
    }
}
