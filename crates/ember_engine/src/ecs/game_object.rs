//! Game objects: named scene nodes owning components and children

use std::any::TypeId;
use std::collections::HashMap;

use super::component::{type_key, AsAny, Component, ComponentSlot};
use super::components::Transform;
use crate::core::{InstanceId, Object};
use crate::events::MessageType;

slotmap::new_key_type! {
    /// Handle of a game object inside its scene's world
    pub struct GameObjectId;
}

/// A node in the scene tree
///
/// Owns its components (at most one per concrete type) and the list of its
/// children. The parent link and the scene index are lookups only; they never
/// keep anything alive. Every game object carries exactly one [`Transform`],
/// which is created with the object and cannot be removed.
pub struct GameObject {
    object: Object,
    id: GameObjectId,
    scene: usize,
    parent: Option<GameObjectId>,
    children: Vec<GameObjectId>,
    transform: Transform,
    components: HashMap<TypeId, ComponentSlot>,
    subscribers: HashMap<MessageType, Vec<TypeId>>,
}

impl GameObject {
    pub(crate) fn new(id: GameObjectId, name: impl Into<String>, scene: usize, parent: Option<GameObjectId>) -> Self {
        Self {
            object: Object::new(name),
            id,
            scene,
            parent,
            children: Vec::new(),
            transform: Transform::default(),
            components: HashMap::new(),
            subscribers: HashMap::new(),
        }
    }

    /// Deep copy of this node's own state (not its children)
    ///
    /// The copy has no arena id yet; [`GameObject::with_id`] assigns it once
    /// the copy is inserted.
    pub(crate) fn duplicate(&self, parent: Option<GameObjectId>) -> Self {
        let components = self
            .components
            .iter()
            .filter_map(|(key, slot)| slot.duplicate().map(|copy| (*key, copy)))
            .collect();

        Self {
            object: self.object.duplicate(),
            id: GameObjectId::default(),
            scene: self.scene,
            parent,
            children: Vec::new(),
            transform: self.transform.clone(),
            components,
            subscribers: self.subscribers.clone(),
        }
    }

    pub(crate) fn with_id(mut self, id: GameObjectId) -> Self {
        self.id = id;
        for slot in self.components.values_mut() {
            slot.set_owner(id);
        }
        self
    }

    /// Arena handle of this object
    pub fn id(&self) -> GameObjectId {
        self.id
    }

    /// Process-unique instance id
    pub fn instance_id(&self) -> InstanceId {
        self.object.id()
    }

    /// Display name
    pub fn name(&self) -> &str {
        self.object.name()
    }

    /// Rename the object
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.object.set_name(name);
    }

    /// Whether the object takes part in update and render traversals
    pub fn is_active(&self) -> bool {
        self.object.is_active()
    }

    /// Build index of the owning scene
    pub fn scene_index(&self) -> usize {
        self.scene
    }

    /// Parent object, if any
    pub fn parent(&self) -> Option<GameObjectId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[GameObjectId] {
        &self.children
    }

    /// The object's transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the object's transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Attach a component
    ///
    /// Fails and returns `None` if a component of the same concrete type is
    /// already attached; the existing instance is left untouched.
    pub fn add_component<T: Component>(&mut self, component: T) -> Option<&mut T> {
        let key = type_key::<T>();
        if !self.insert_boxed(key, Box::new(component)) {
            return None;
        }
        self.get_component_mut::<T>()
    }

    /// Attach an already boxed component under its concrete type
    pub(crate) fn insert_boxed(&mut self, key: TypeId, component: Box<dyn Component>) -> bool {
        if key == type_key::<Transform>() || self.components.contains_key(&key) {
            log::warn!(
                "GameObject '{}' already has a {} component",
                self.name(),
                component.type_name()
            );
            return false;
        }
        log::trace!("GameObject '{}': added {}", self.name(), component.type_name());
        self.components.insert(key, ComponentSlot::new(self.id, component));
        true
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: Component>(&self) -> bool {
        let key = type_key::<T>();
        key == type_key::<Transform>() || self.components.contains_key(&key)
    }

    /// Look up the component of exact type `T`
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        if type_key::<T>() == type_key::<Transform>() {
            return self.transform.as_any().downcast_ref::<T>();
        }
        self.components
            .get(&type_key::<T>())?
            .get()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// Mutable lookup of the component of exact type `T`
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        if type_key::<T>() == type_key::<Transform>() {
            return self.transform.as_any_mut().downcast_mut::<T>();
        }
        self.components
            .get_mut(&type_key::<T>())?
            .get_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Detach and destroy the component of type `T`
    ///
    /// Fails if no such component is attached. The transform cannot be removed.
    /// Message subscriptions held by the component are dropped with it.
    pub fn remove_component<T: Component>(&mut self) -> bool {
        self.remove_by_key(type_key::<T>())
    }

    pub(crate) fn remove_by_key(&mut self, key: TypeId) -> bool {
        if key == type_key::<Transform>() {
            log::warn!("GameObject '{}': the transform cannot be removed", self.name());
            return false;
        }
        let Some(slot) = self.components.remove(&key) else {
            log::warn!("GameObject '{}': no such component to remove", self.name());
            return false;
        };
        for subscribers in self.subscribers.values_mut() {
            subscribers.retain(|k| *k != key);
        }
        slot.destroy();
        true
    }

    /// Whether the component of type `T` is active
    pub fn is_component_active<T: Component>(&self) -> Option<bool> {
        if type_key::<T>() == type_key::<Transform>() {
            return Some(true);
        }
        self.components.get(&type_key::<T>()).map(|slot| slot.object.is_active())
    }

    /// Enable or disable the component of type `T`
    ///
    /// Runs `on_enable`/`on_disable` when the flag actually changes. Returns
    /// false if no such component is attached.
    pub fn set_component_active<T: Component>(&mut self, active: bool) -> bool {
        let Some(slot) = self.components.get_mut(&type_key::<T>()) else {
            return false;
        };
        if slot.object.set_active(active) {
            if let Some(component) = slot.get_mut() {
                if active {
                    component.on_enable();
                } else {
                    component.on_disable();
                }
            }
        }
        true
    }

    /// Subscribe the attached component of type `T` to `message_type`
    ///
    /// Returns false if no such component is attached. Subscribing twice is a
    /// no-op.
    pub fn subscribe<T: Component>(&mut self, message_type: MessageType) -> bool {
        let key = type_key::<T>();
        if !self.components.contains_key(&key) {
            log::warn!(
                "GameObject '{}': cannot subscribe a missing component to {message_type:?}",
                self.name()
            );
            return false;
        }
        let subscribers = self.subscribers.entry(message_type).or_default();
        if !subscribers.contains(&key) {
            subscribers.push(key);
        }
        true
    }

    /// Remove the subscription of component `T` to `message_type`
    pub fn unsubscribe<T: Component>(&mut self, message_type: MessageType) -> bool {
        let key = type_key::<T>();
        match self.subscribers.get_mut(&message_type) {
            Some(subscribers) => {
                let before = subscribers.len();
                subscribers.retain(|k| *k != key);
                subscribers.len() != before
            }
            None => false,
        }
    }

    /// Whether component `T` is subscribed to `message_type`
    pub fn is_subscribed<T: Component>(&self, message_type: MessageType) -> bool {
        self.subscribers
            .get(&message_type)
            .is_some_and(|subscribers| subscribers.contains(&type_key::<T>()))
    }

    /// Number of attached components, not counting the transform
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn set_active_flag(&mut self, active: bool) -> bool {
        self.object.set_active(active)
    }

    pub(crate) fn set_parent_link(&mut self, parent: Option<GameObjectId>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: GameObjectId) {
        self.children.push(child);
    }

    pub(crate) fn detach_child(&mut self, child: GameObjectId) {
        self.children.retain(|c| *c != child);
    }

    pub(crate) fn component_keys(&self) -> Vec<TypeId> {
        self.components.keys().copied().collect()
    }

    pub(crate) fn active_component_keys(&self) -> Vec<TypeId> {
        self.components
            .iter()
            .filter(|(_, slot)| slot.object.is_active())
            .map(|(key, _)| *key)
            .collect()
    }

    pub(crate) fn subscriber_keys(&self, message_type: MessageType) -> Vec<TypeId> {
        self.subscribers.get(&message_type).cloned().unwrap_or_default()
    }

    pub(crate) fn slot_mut(&mut self, key: TypeId) -> Option<&mut ComponentSlot> {
        self.components.get_mut(&key)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut ComponentSlot> {
        self.components.values_mut()
    }

    /// Tear down all components, running their destroy hooks
    pub(crate) fn destroy_components(&mut self) {
        log::debug!("Destroying GameObject '{}' {}", self.name(), self.instance_id());
        self.subscribers.clear();
        for (_, slot) in self.components.drain() {
            slot.destroy();
        }
    }
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name())
            .field("instance_id", &self.instance_id())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("components", &self.components.len())
            .finish()
    }
}
