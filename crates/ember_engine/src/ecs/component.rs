//! Component trait and per-object component storage

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::context::{ComponentContext, RenderContext};
use super::game_object::GameObjectId;
use crate::core::Object;
use crate::events::Message;

/// Upcast helper so boxed components can be downcast to their concrete type
pub trait AsAny: Any {
    /// View as `&dyn Any`
    fn as_any(&self) -> &dyn Any;
    /// View as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Object-safe cloning for boxed components
pub trait ComponentClone {
    /// Deep copy into a new box
    fn clone_box(&self) -> Box<dyn Component>;
}

impl<T: Component + Clone> ComponentClone for T {
    fn clone_box(&self) -> Box<dyn Component> {
        Box::new(self.clone())
    }
}

/// A unit of behavior attached to exactly one game object
///
/// Every hook has a no-op default so plain data components only implement
/// what they need. Hooks receive a context scoped to the owning game object;
/// structural changes (spawning, destroying, attaching components) requested
/// from a hook are queued and applied at the end of the frame.
pub trait Component: AsAny + ComponentClone + Send + Sync {
    /// Name used for the component's identity and in log output
    fn type_name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Called when the component goes from inactive to active
    fn on_enable(&mut self) {}

    /// Called when the component goes from active to inactive
    fn on_disable(&mut self) {}

    /// Called exactly once before the component is dropped by its owner
    fn on_destroy(&mut self) {}

    /// Per-frame update
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {}

    /// Fixed-rate update
    fn fixed_update(&mut self, _ctx: &mut ComponentContext<'_>, _step: f32) {}

    /// Per-frame render
    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    /// Handle a message of a type this component subscribed to
    fn on_message(&mut self, _ctx: &mut ComponentContext<'_>, _message: &Message) {}

    /// Rewrite game object references after the owning subtree was cloned
    ///
    /// `mapping` maps every original id in the cloned subtree to its copy.
    /// References outside the subtree are left alone.
    fn remap_references(&mut self, _mapping: &HashMap<GameObjectId, GameObjectId>) {}
}

/// Storage slot for one attached component
///
/// The component box is temporarily taken out while one of its hooks runs so
/// the hook can borrow the rest of the world mutably.
pub(crate) struct ComponentSlot {
    pub(crate) object: Object,
    owner: GameObjectId,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new(owner: GameObjectId, component: Box<dyn Component>) -> Self {
        Self {
            object: Object::new(component.type_name()),
            owner,
            component: Some(component),
        }
    }

    /// Game object this component was attached to
    pub(crate) fn owner(&self) -> GameObjectId {
        self.owner
    }

    pub(crate) fn get(&self) -> Option<&dyn Component> {
        self.component.as_deref()
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut (dyn Component + 'static)> {
        self.component.as_deref_mut()
    }

    /// Copy for a cloned game object, with a fresh identity
    pub(crate) fn duplicate(&self) -> Option<Self> {
        let component = self.get()?.clone_box();
        Some(Self {
            object: self.object.duplicate(),
            owner: self.owner,
            component: Some(component),
        })
    }

    /// Attach a freshly duplicated slot to its new game object
    pub(crate) fn set_owner(&mut self, owner: GameObjectId) {
        self.owner = owner;
    }

    /// Run the destroy hook if the component is present
    pub(crate) fn destroy(mut self) {
        if let Some(component) = self.component.as_deref_mut() {
            log::debug!("Destroying component {} {}", component.type_name(), self.object.id());
            component.on_destroy();
        }
    }
}

/// Concrete type key of a component
pub(crate) fn type_key<T: Component>() -> TypeId {
    TypeId::of::<T>()
}
