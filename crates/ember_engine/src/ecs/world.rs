//! The game object arena of one scene
//!
//! `World` owns every game object of a scene in a slotmap and keeps their
//! creation order. Parent and child links are ids into the same arena, so the
//! tree never holds strong cycles and destruction is a plain pre-order walk.

use std::any::TypeId;
use std::collections::HashMap;

use slotmap::SlotMap;
use thiserror::Error;

use super::commands::{CommandQueue, WorldCommand};
use super::component::Component;
use super::context::{ComponentContext, RenderContext};
use super::game_object::{GameObject, GameObjectId};
use crate::events::Message;
use crate::foundation::math::{checked_inverse, MathError, Mat4, Point3, Quat, Vec3};
use crate::render::Renderer;

/// Failures of world-level operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorldError {
    /// The id does not name a live game object
    #[error("unknown game object {0:?}")]
    UnknownGameObject(GameObjectId),

    /// Re-parenting would make an object its own ancestor
    #[error("cannot parent {child:?} under its own descendant {parent:?}")]
    HierarchyCycle {
        /// Object being moved
        child: GameObjectId,
        /// Requested parent
        parent: GameObjectId,
    },

    /// A transform could not be inverted
    #[error("math error: {0}")]
    Math(#[from] MathError),
}

/// Result type for world operations
pub type WorldResult<T> = Result<T, WorldError>;

/// Owner of all game objects in one scene
pub struct World {
    scene: usize,
    objects: SlotMap<GameObjectId, GameObject>,
    order: Vec<GameObjectId>,
    main_camera: Option<GameObjectId>,
    commands: CommandQueue,
}

impl World {
    /// Create an empty world for the scene with the given build index
    pub fn new(scene: usize) -> Self {
        Self {
            scene,
            objects: SlotMap::with_key(),
            order: Vec::new(),
            main_camera: None,
            commands: CommandQueue::new(),
        }
    }

    /// Build index of the owning scene
    pub fn scene_index(&self) -> usize {
        self.scene
    }

    /// Create a game object, optionally under `parent`
    ///
    /// An unknown parent is logged and the object is created as a root.
    pub fn create_game_object(&mut self, name: impl Into<String>, parent: Option<GameObjectId>) -> GameObjectId {
        let name = name.into();
        let parent = match parent {
            Some(p) if self.objects.contains_key(p) => Some(p),
            Some(p) => {
                log::warn!("Creating '{name}' as a root: parent {p:?} does not exist");
                None
            }
            None => None,
        };

        let scene = self.scene;
        let id = self
            .objects
            .insert_with_key(|id| GameObject::new(id, name, scene, parent));
        if let Some(p) = parent {
            self.objects[p].push_child(id);
        }
        self.order.push(id);
        log::debug!("Created GameObject '{}' {:?}", self.objects[id].name(), id);
        id
    }

    /// Look up a game object
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.objects.get(id)
    }

    /// Mutable lookup of a game object
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.objects.get_mut(id)
    }

    /// Whether `id` names a live game object
    pub fn contains(&self, id: GameObjectId) -> bool {
        self.objects.contains_key(id)
    }

    /// Number of live game objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the world holds no game objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Ids of all game objects in creation order
    pub fn ids(&self) -> &[GameObjectId] {
        &self.order
    }

    /// Game objects without a parent, in creation order
    pub fn roots(&self) -> impl Iterator<Item = GameObjectId> + '_ {
        self.order
            .iter()
            .copied()
            .filter(|id| self.objects.get(*id).is_some_and(|o| o.parent().is_none()))
    }

    /// First game object with the given name, in creation order
    pub fn find(&self, name: &str) -> Option<GameObjectId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.objects.get(*id).is_some_and(|o| o.name() == name))
    }

    /// The auto-created camera object
    pub fn main_camera(&self) -> Option<GameObjectId> {
        self.main_camera
    }

    pub(crate) fn set_main_camera(&mut self, id: GameObjectId) {
        self.main_camera = Some(id);
    }

    /// Queue for deferred structural changes
    pub fn commands_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    /// Ancestors of `id`, nearest first
    pub fn ancestors(&self, id: GameObjectId) -> Vec<GameObjectId> {
        let mut result = Vec::new();
        let mut current = self.objects.get(id).and_then(GameObject::parent);
        while let Some(p) = current {
            result.push(p);
            current = self.objects.get(p).and_then(GameObject::parent);
        }
        result
    }

    /// `id` and all its descendants in pre-order
    pub fn subtree(&self, id: GameObjectId) -> Vec<GameObjectId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(object) = self.objects.get(current) else {
                continue;
            };
            result.push(current);
            stack.extend(object.children().iter().rev().copied());
        }
        result
    }

    /// Destroy a game object together with its subtree
    ///
    /// Component destroy hooks run parent first. Returns false if `id` is not
    /// a live game object.
    pub fn destroy(&mut self, id: GameObjectId) -> bool {
        if !self.objects.contains_key(id) {
            log::warn!("destroy: {}", WorldError::UnknownGameObject(id));
            return false;
        }

        if let Some(parent) = self.objects[id].parent() {
            if let Some(p) = self.objects.get_mut(parent) {
                p.detach_child(id);
            }
        }

        let doomed = self.subtree(id);
        for victim in &doomed {
            if let Some(mut object) = self.objects.remove(*victim) {
                object.destroy_components();
            }
            if self.main_camera == Some(*victim) {
                self.main_camera = None;
            }
        }
        self.order.retain(|o| !doomed.contains(o));
        true
    }

    /// Clone the subtree rooted at `original` as a new root object
    ///
    /// Optional `position` and `rotation` override the clone's world-space
    /// pose. The clone takes the original's world scale, as computed by
    /// [`World::world_scale`]. Component references into the cloned subtree are rewired to the
    /// copies.
    pub fn instantiate(
        &mut self,
        original: GameObjectId,
        position: Option<Vec3>,
        rotation: Option<Quat>,
    ) -> Option<GameObjectId> {
        if !self.objects.contains_key(original) {
            log::warn!("instantiate: {}", WorldError::UnknownGameObject(original));
            return None;
        }

        // Preserve the original's world pose on the new root.
        let world_matrix = self.local_to_world_matrix(original)?;
        let world_rotation = self.world_rotation(original)?;
        let world_scale = self.world_scale(original)?;

        let mut mapping = HashMap::new();
        let mut created = Vec::new();
        for source in self.subtree(original) {
            let parent = self.objects[source].parent().and_then(|p| mapping.get(&p).copied());
            let copy = self.objects[source].duplicate(parent);
            let id = self.objects.insert_with_key(|id| copy.with_id(id));
            if let Some(p) = parent {
                self.objects[p].push_child(id);
            }
            mapping.insert(source, id);
            created.push(id);
        }

        for id in &created {
            if let Some(object) = self.objects.get_mut(*id) {
                for slot in object.slots_mut() {
                    if let Some(component) = slot.get_mut() {
                        component.remap_references(&mapping);
                    }
                }
            }
        }
        self.order.extend(created.iter().copied());

        let root = mapping[&original];
        let transform = self.objects[root].transform_mut();
        transform.position = position.unwrap_or_else(|| world_matrix.transform_point(&Point3::origin()).coords);
        transform.rotation = rotation.unwrap_or(world_rotation);
        transform.scale = world_scale;

        log::debug!("Instantiated {:?} as {:?} ({} objects)", original, root, created.len());
        Some(root)
    }

    /// Move `child` under `parent`, or make it a root with `None`
    ///
    /// The local transform is kept as-is. Fails for unknown ids and when
    /// `parent` is `child` or one of its descendants.
    pub fn set_parent(&mut self, child: GameObjectId, parent: Option<GameObjectId>) -> bool {
        match self.try_set_parent(child, parent) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("set_parent: {err}");
                false
            }
        }
    }

    fn try_set_parent(&mut self, child: GameObjectId, parent: Option<GameObjectId>) -> WorldResult<()> {
        let old_parent = self
            .objects
            .get(child)
            .ok_or(WorldError::UnknownGameObject(child))?
            .parent();

        if let Some(p) = parent {
            if !self.objects.contains_key(p) {
                return Err(WorldError::UnknownGameObject(p));
            }
            if p == child || self.ancestors(p).contains(&child) {
                return Err(WorldError::HierarchyCycle { child, parent: p });
            }
        }

        if let Some(old) = old_parent {
            if let Some(o) = self.objects.get_mut(old) {
                o.detach_child(child);
            }
        }
        if let Some(p) = parent {
            self.objects[p].push_child(child);
        }
        self.objects[child].set_parent_link(parent);
        Ok(())
    }

    /// Activate or deactivate a game object
    ///
    /// Runs `on_enable`/`on_disable` on its active components when the flag
    /// changes. Returns false for an unknown id.
    pub fn set_active(&mut self, id: GameObjectId, active: bool) -> bool {
        let Some(object) = self.objects.get_mut(id) else {
            log::warn!("set_active: {}", WorldError::UnknownGameObject(id));
            return false;
        };
        if object.set_active_flag(active) {
            for slot in object.slots_mut() {
                if !slot.object.is_active() {
                    continue;
                }
                if let Some(component) = slot.get_mut() {
                    if active {
                        component.on_enable();
                    } else {
                        component.on_disable();
                    }
                }
            }
        }
        true
    }

    /// Attach a component to a game object
    pub fn add_component<T: Component>(&mut self, id: GameObjectId, component: T) -> Option<&mut T> {
        match self.objects.get_mut(id) {
            Some(object) => object.add_component(component),
            None => {
                log::warn!("add_component: {}", WorldError::UnknownGameObject(id));
                None
            }
        }
    }

    /// Component of type `T` on `id`
    pub fn get_component<T: Component>(&self, id: GameObjectId) -> Option<&T> {
        self.objects.get(id)?.get_component::<T>()
    }

    /// Mutable component of type `T` on `id`
    pub fn get_component_mut<T: Component>(&mut self, id: GameObjectId) -> Option<&mut T> {
        self.objects.get_mut(id)?.get_component_mut::<T>()
    }

    /// First component of type `T` on an immediate child of `id`
    pub fn get_component_in_children<T: Component>(&self, id: GameObjectId) -> Option<&T> {
        self.objects
            .get(id)?
            .children()
            .iter()
            .find_map(|child| self.objects.get(*child)?.get_component::<T>())
    }

    /// First component of type `T` on an ancestor of `id`, nearest first
    pub fn get_component_in_parent<T: Component>(&self, id: GameObjectId) -> Option<&T> {
        self.ancestors(id)
            .into_iter()
            .find_map(|ancestor| self.objects.get(ancestor)?.get_component::<T>())
    }

    /// Deliver `message` to the subscribers of `target`
    ///
    /// Returns the number of components that received it.
    pub fn send_message(&mut self, target: GameObjectId, message: &Message) -> usize {
        if !self.objects.contains_key(target) {
            log::warn!("send_message: {}", WorldError::UnknownGameObject(target));
            return 0;
        }
        self.deliver(target, message)
    }

    /// Deliver `message` to `target` and then to each of its ancestors
    pub fn send_message_upwards(&mut self, target: GameObjectId, message: &Message) -> usize {
        if !self.objects.contains_key(target) {
            log::warn!("send_message_upwards: {}", WorldError::UnknownGameObject(target));
            return 0;
        }
        let mut delivered = self.deliver(target, message);
        for ancestor in self.ancestors(target) {
            delivered += self.deliver(ancestor, message);
        }
        delivered
    }

    /// Deliver `message` to `target` and to its immediate children
    ///
    /// Grandchildren are not reached.
    pub fn broadcast_message(&mut self, target: GameObjectId, message: &Message) -> usize {
        let Some(object) = self.objects.get(target) else {
            log::warn!("broadcast_message: {}", WorldError::UnknownGameObject(target));
            return 0;
        };
        let children = object.children().to_vec();
        let mut delivered = self.deliver(target, message);
        for child in children {
            delivered += self.deliver(child, message);
        }
        delivered
    }

    fn deliver(&mut self, id: GameObjectId, message: &Message) -> usize {
        let Some(object) = self.objects.get(id) else {
            return 0;
        };
        let keys = object.subscriber_keys(message.message_type());
        let mut delivered = 0;
        for key in keys {
            if self.with_component(id, key, |component, ctx| component.on_message(ctx, message)) {
                delivered += 1;
            }
        }
        log::trace!("{:?} delivered to {delivered} component(s) on {id:?}", message.message_type());
        delivered
    }

    /// Run `f` on one component with the rest of the world borrowed mutably
    fn with_component<F>(&mut self, id: GameObjectId, key: TypeId, f: F) -> bool
    where
        F: FnOnce(&mut dyn Component, &mut ComponentContext<'_>),
    {
        let Some(mut component) = self
            .objects
            .get_mut(id)
            .and_then(|o| o.slot_mut(key))
            .and_then(|slot| slot.component.take())
        else {
            return false;
        };

        f(&mut *component, &mut ComponentContext::new(self, id));

        match self.objects.get_mut(id).and_then(|o| o.slot_mut(key)) {
            Some(slot) => {
                debug_assert_eq!(slot.owner(), id);
                slot.component = Some(component);
            }
            None => component.on_destroy(),
        }
        true
    }

    /// Per-frame update of every active component on every active object
    pub fn update(&mut self, delta_time: f32) {
        for id in self.order.clone() {
            self.for_each_active_component(id, |component, ctx| component.update(ctx, delta_time));
        }
    }

    /// Fixed-rate update of every active component on every active object
    pub fn fixed_update(&mut self, step: f32) {
        for id in self.order.clone() {
            self.for_each_active_component(id, |component, ctx| component.fixed_update(ctx, step));
        }
    }

    fn for_each_active_component<F>(&mut self, id: GameObjectId, mut f: F)
    where
        F: FnMut(&mut dyn Component, &mut ComponentContext<'_>),
    {
        let Some(object) = self.objects.get(id).filter(|o| o.is_active()) else {
            return;
        };
        for key in object.active_component_keys() {
            self.with_component(id, key, &mut f);
        }
    }

    /// Render every active component on every active object
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        for id in self.order.clone() {
            let Some(object) = self.objects.get(id).filter(|o| o.is_active()) else {
                continue;
            };
            for key in object.active_component_keys() {
                self.render_component(id, key, renderer);
            }
        }
    }

    fn render_component(&mut self, id: GameObjectId, key: TypeId, renderer: &mut dyn Renderer) {
        let Some(mut component) = self
            .objects
            .get_mut(id)
            .and_then(|o| o.slot_mut(key))
            .and_then(|slot| slot.component.take())
        else {
            return;
        };

        component.render(&mut RenderContext::new(self, id, renderer));

        if let Some(slot) = self.objects.get_mut(id).and_then(|o| o.slot_mut(key)) {
            slot.component = Some(component);
        }
    }

    /// Apply structural changes queued by component hooks
    pub fn apply_commands(&mut self) {
        let commands = self.commands.take();
        if commands.is_empty() {
            return;
        }
        log::trace!("Applying {} deferred command(s)", commands.len());
        for command in commands {
            match command {
                WorldCommand::Spawn { name, parent } => {
                    self.create_game_object(name, parent);
                }
                WorldCommand::Destroy(id) => {
                    self.destroy(id);
                }
                WorldCommand::AddComponent(id, key, component) => match self.objects.get_mut(id) {
                    Some(object) => {
                        object.insert_boxed(key, component);
                    }
                    None => log::warn!("deferred add_component: {}", WorldError::UnknownGameObject(id)),
                },
                WorldCommand::RemoveComponent(id, key) => match self.objects.get_mut(id) {
                    Some(object) => {
                        object.remove_by_key(key);
                    }
                    None => log::warn!("deferred remove_component: {}", WorldError::UnknownGameObject(id)),
                },
                WorldCommand::SetActive(id, active) => {
                    self.set_active(id, active);
                }
            }
        }
    }

    /// Local-to-world matrix of `id`
    pub fn local_to_world_matrix(&self, id: GameObjectId) -> Option<Mat4> {
        let object = self.objects.get(id)?;
        let mut matrix = object.transform().local_matrix();
        let mut current = object.parent();
        while let Some(p) = current {
            let parent = self.objects.get(p)?;
            matrix = parent.transform().local_matrix() * matrix;
            current = parent.parent();
        }
        Some(matrix)
    }

    /// World-to-local matrix of `id`
    pub fn world_to_local_matrix(&self, id: GameObjectId) -> WorldResult<Mat4> {
        let matrix = self
            .local_to_world_matrix(id)
            .ok_or(WorldError::UnknownGameObject(id))?;
        Ok(checked_inverse(&matrix)?)
    }

    /// World-space position of `id`
    pub fn world_position(&self, id: GameObjectId) -> Option<Vec3> {
        let matrix = self.local_to_world_matrix(id)?;
        Some(matrix.transform_point(&Point3::origin()).coords)
    }

    /// World-space rotation of `id`, ignoring non-uniform scale
    pub fn world_rotation(&self, id: GameObjectId) -> Option<Quat> {
        let object = self.objects.get(id)?;
        let mut rotation = object.transform().rotation;
        for ancestor in self.ancestors(id) {
            rotation = self.objects.get(ancestor)?.transform().rotation * rotation;
        }
        Some(rotation)
    }

    /// World-space scale of `id` as the per-axis product of local scales
    ///
    /// Exact when ancestors are unrotated or uniformly scaled; shear from a
    /// rotated non-uniform parent is not represented.
    pub fn world_scale(&self, id: GameObjectId) -> Option<Vec3> {
        let object = self.objects.get(id)?;
        let mut scale = object.transform().scale;
        for ancestor in self.ancestors(id) {
            scale.component_mul_assign(&self.objects.get(ancestor)?.transform().scale);
        }
        Some(scale)
    }

    /// Move `id` so that its world-space position becomes `position`
    pub fn set_world_position(&mut self, id: GameObjectId, position: Vec3) -> WorldResult<()> {
        let parent = self
            .objects
            .get(id)
            .ok_or(WorldError::UnknownGameObject(id))?
            .parent();
        let local = match parent {
            Some(p) => self
                .world_to_local_matrix(p)?
                .transform_point(&Point3::from(position))
                .coords,
            None => position,
        };
        self.objects[id].transform_mut().position = local;
        Ok(())
    }

    /// Rotate `id` so that its world-space rotation becomes `rotation`
    pub fn set_world_rotation(&mut self, id: GameObjectId, rotation: Quat) -> WorldResult<()> {
        let parent = self
            .objects
            .get(id)
            .ok_or(WorldError::UnknownGameObject(id))?
            .parent();
        let local = match parent {
            Some(p) => {
                let parent_rotation = self.world_rotation(p).ok_or(WorldError::UnknownGameObject(p))?;
                parent_rotation.inverse() * rotation
            }
            None => rotation,
        };
        self.objects[id].transform_mut().rotation = local;
        Ok(())
    }

    /// Destroy every game object, running component destroy hooks
    pub fn clear(&mut self) {
        for id in self.roots().collect::<Vec<_>>() {
            self.destroy(id);
        }
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("scene", &self.scene)
            .field("objects", &self.objects.len())
            .field("main_camera", &self.main_camera)
            .field("pending_commands", &self.commands.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Transform;
    use crate::events::MessageType;
    use crate::foundation::math::constants::HALF_PI;
    use crate::render::UniformRecorder;
    use approx::assert_relative_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Counter {
        updates: usize,
        messages: usize,
    }

    impl Component for Counter {
        fn update(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) {
            self.updates += 1;
        }

        fn on_message(&mut self, _ctx: &mut ComponentContext<'_>, _message: &Message) {
            self.messages += 1;
        }
    }

    #[derive(Clone)]
    struct DestroyProbe(Arc<AtomicUsize>);

    impl Component for DestroyProbe {
        fn on_destroy(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone)]
    struct Painter;

    impl Component for Painter {
        fn render(&mut self, ctx: &mut RenderContext<'_>) {
            let _ = ctx.renderer().set_uniform_f32("u_tint", 1.0);
        }
    }

    #[derive(Clone, Default)]
    struct Toggles {
        enabled: Arc<AtomicUsize>,
        disabled: Arc<AtomicUsize>,
    }

    impl Component for Toggles {
        fn on_enable(&mut self) {
            self.enabled.fetch_add(1, Ordering::SeqCst);
        }

        fn on_disable(&mut self) {
            self.disabled.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone)]
    struct Follow {
        target: GameObjectId,
    }

    impl Component for Follow {
        fn remap_references(&mut self, mapping: &HashMap<GameObjectId, GameObjectId>) {
            if let Some(new) = mapping.get(&self.target) {
                self.target = *new;
            }
        }
    }

    #[derive(Clone, Default)]
    struct Spawner;

    impl Component for Spawner {
        fn update(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) {
            let owner = ctx.owner();
            ctx.commands().spawn("Spawned", Some(owner));
        }
    }

    #[test]
    fn test_create_and_find() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));

        assert_eq!(world.len(), 2);
        assert_eq!(world.find("Child"), Some(child));
        assert_eq!(world.get(child).and_then(GameObject::parent), Some(root));
        assert_eq!(world.get(root).map(|o| o.children().to_vec()), Some(vec![child]));
        assert_eq!(world.roots().collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_destroy_cascades_and_runs_hooks() {
        let destroyed = Arc::new(AtomicUsize::new(0));
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));
        let grandchild = world.create_game_object("Grandchild", Some(child));
        world.add_component(root, DestroyProbe(destroyed.clone()));
        world.add_component(grandchild, DestroyProbe(destroyed.clone()));

        assert!(world.destroy(root));
        assert!(world.is_empty());
        assert!(world.ids().is_empty());
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
        assert!(!world.destroy(root));
    }

    #[test]
    fn test_destroy_detaches_from_parent() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));

        assert!(world.destroy(child));
        assert!(world.get(root).is_some_and(|o| o.children().is_empty()));
    }

    #[test]
    fn test_update_skips_inactive() {
        let mut world = World::new(0);
        let a = world.create_game_object("A", None);
        let b = world.create_game_object("B", None);
        world.add_component(a, Counter::default());
        world.add_component(b, Counter::default());
        world.set_active(b, false);

        world.update(0.016);
        world.update(0.016);

        assert_eq!(world.get_component::<Counter>(a).map(|c| c.updates), Some(2));
        assert_eq!(world.get_component::<Counter>(b).map(|c| c.updates), Some(0));
    }

    #[test]
    fn test_inactive_component_not_updated() {
        let mut world = World::new(0);
        let a = world.create_game_object("A", None);
        world.add_component(a, Counter::default());
        world.get_mut(a).map(|o| o.set_component_active::<Counter>(false));

        world.update(0.016);

        assert_eq!(world.get_component::<Counter>(a).map(|c| c.updates), Some(0));
    }

    #[test]
    fn test_render_skips_inactive_object() {
        let mut world = World::new(0);
        let a = world.create_game_object("A", None);
        world.add_component(a, Painter);
        world.set_active(a, false);

        let mut recorder = UniformRecorder::new();
        world.render(&mut recorder);
        assert_eq!(recorder.upload_count(), 0);

        world.set_active(a, true);
        world.render(&mut recorder);
        assert_eq!(recorder.upload_count(), 1);
    }

    #[test]
    fn test_render_skips_inactive_component() {
        let mut world = World::new(0);
        let a = world.create_game_object("A", None);
        world.add_component(a, Painter);
        world.get_mut(a).map(|o| o.set_component_active::<Painter>(false));

        let mut recorder = UniformRecorder::new();
        world.render(&mut recorder);

        assert_eq!(recorder.upload_count(), 0);
        assert!(recorder.get("u_tint").is_none());
    }

    #[test]
    fn test_active_toggles_run_hooks() {
        let toggles = Toggles::default();
        let (enabled, disabled) = (toggles.enabled.clone(), toggles.disabled.clone());
        let mut world = World::new(0);
        let a = world.create_game_object("A", None);
        world.add_component(a, toggles);

        assert!(world.set_active(a, false));
        assert!(world.set_active(a, false));
        assert_eq!(disabled.load(Ordering::SeqCst), 1);
        assert!(world.set_active(a, true));
        assert_eq!(enabled.load(Ordering::SeqCst), 1);

        let object = world.get_mut(a).unwrap();
        assert!(object.set_component_active::<Toggles>(false));
        assert_eq!(object.is_component_active::<Toggles>(), Some(false));
        assert_eq!(disabled.load(Ordering::SeqCst), 2);

        // Inactive components are not notified when their object toggles
        world.set_active(a, false);
        world.set_active(a, true);
        assert_eq!(disabled.load(Ordering::SeqCst), 2);
        assert_eq!(enabled.load(Ordering::SeqCst), 1);

        world.get_mut(a).map(|o| o.set_component_active::<Toggles>(true));
        assert_eq!(enabled.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_message_upwards_reaches_every_ancestor() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let mid = world.create_game_object("Mid", Some(root));
        let leaf = world.create_game_object("Leaf", Some(mid));
        for id in [root, mid, leaf] {
            world.add_component(id, Counter::default());
            world.get_mut(id).map(|o| o.subscribe::<Counter>(MessageType::Damage));
        }

        let delivered = world.send_message_upwards(leaf, &Message::new(MessageType::Damage));

        assert_eq!(delivered, 3);
        for id in [root, mid, leaf] {
            assert_eq!(world.get_component::<Counter>(id).map(|c| c.messages), Some(1));
        }
    }

    #[test]
    fn test_message_only_reaches_subscribers_of_type() {
        let mut world = World::new(0);
        let id = world.create_game_object("A", None);
        world.add_component(id, Counter::default());
        world.get_mut(id).map(|o| o.subscribe::<Counter>(MessageType::Collision));

        assert_eq!(world.send_message(id, &Message::new(MessageType::Trigger)), 0);
        assert_eq!(world.send_message(id, &Message::new(MessageType::Collision)), 1);
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));

        assert!(!world.set_parent(root, Some(child)));
        assert!(!world.set_parent(root, Some(root)));
        assert!(world.set_parent(child, None));
        assert!(world.get(root).is_some_and(|o| o.children().is_empty()));
        assert_eq!(world.get(child).and_then(GameObject::parent), None);
    }

    #[test]
    fn test_world_matrices_compose_parents() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));
        world.get_mut(root).map(|o| *o.transform_mut() = Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));
        world.get_mut(child).map(|o| *o.transform_mut() = Transform::from_position(Vec3::new(0.0, 2.0, 0.0)));

        let position = world.world_position(child).unwrap();
        assert_relative_eq!(position, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-6);

        let to_local = world.world_to_local_matrix(child).unwrap();
        let back = to_local.transform_point(&Point3::new(1.0, 2.0, 0.0));
        assert_relative_eq!(back.coords, Vec3::zeros(), epsilon = 1e-6);
    }

    #[test]
    fn test_set_world_position_under_rotated_parent() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));
        world.get_mut(root).map(|o| {
            o.transform_mut().rotation = Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI);
        });

        world.set_world_position(child, Vec3::new(0.0, 3.0, 0.0)).unwrap();

        let local = world.get(child).unwrap().transform().position;
        assert_relative_eq!(local, Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(world.world_position(child).unwrap(), Vec3::new(0.0, 3.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_instantiate_clones_subtree_and_remaps() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let child = world.create_game_object("Child", Some(root));
        world.add_component(root, Follow { target: child });
        world.add_component(child, Counter::default());

        let copy = world.instantiate(root, Some(Vec3::new(5.0, 0.0, 0.0)), None).unwrap();

        assert_eq!(world.len(), 4);
        let copy_children = world.get(copy).unwrap().children().to_vec();
        assert_eq!(copy_children.len(), 1);
        assert_ne!(copy_children[0], child);
        assert_eq!(world.get_component::<Follow>(copy).map(|f| f.target), Some(copy_children[0]));
        assert!(world.get_component::<Counter>(copy_children[0]).is_some());
        assert_ne!(
            world.get(copy).unwrap().instance_id(),
            world.get(root).unwrap().instance_id()
        );
        assert_relative_eq!(world.world_position(copy).unwrap(), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_instantiate_keeps_world_scale() {
        let mut world = World::new(0);
        let parent = world.create_game_object("Parent", None);
        let child = world.create_game_object("Child", Some(parent));
        if let Some(object) = world.get_mut(parent) {
            object.transform_mut().scale = Vec3::new(2.0, 2.0, 2.0);
            object.transform_mut().position = Vec3::new(0.0, 1.0, 0.0);
        }
        if let Some(object) = world.get_mut(child) {
            object.transform_mut().scale = Vec3::new(1.5, 1.0, 0.5);
            object.transform_mut().position = Vec3::new(1.0, 0.0, 0.0);
        }

        let copy = world.instantiate(child, None, None).unwrap();

        assert!(world.get(copy).unwrap().parent().is_none());
        assert_relative_eq!(world.world_scale(copy).unwrap(), Vec3::new(3.0, 2.0, 1.0));
        assert_relative_eq!(
            world.local_to_world_matrix(copy).unwrap(),
            world.local_to_world_matrix(child).unwrap(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_deferred_spawn_applied_after_update() {
        let mut world = World::new(0);
        let id = world.create_game_object("Spawner", None);
        world.add_component(id, Spawner);

        world.update(0.016);
        assert_eq!(world.len(), 1);
        assert_eq!(world.commands_mut().len(), 1);

        world.apply_commands();
        assert_eq!(world.len(), 2);
        assert!(world.get(id).is_some_and(|o| o.children().len() == 1));
    }

    #[test]
    fn test_component_lookup_in_relatives() {
        let mut world = World::new(0);
        let root = world.create_game_object("Root", None);
        let mid = world.create_game_object("Mid", Some(root));
        let leaf = world.create_game_object("Leaf", Some(mid));
        world.add_component(root, Counter::default());
        world.add_component(leaf, Counter::default());

        assert!(world.get_component_in_parent::<Counter>(leaf).is_some());
        assert!(world.get_component_in_children::<Counter>(mid).is_some());
        assert!(world.get_component_in_children::<Counter>(root).is_none());
    }
}
