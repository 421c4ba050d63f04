//! Scenes: a world of game objects plus user behavior hooks

use crate::core::{CameraConfig, Object};
use crate::ecs::components::Camera;
use crate::ecs::{GameObjectId, World};
use crate::foundation::math::{Quat, Vec3};
use crate::render::Renderer;

/// Name of the camera object every scene starts with
pub const MAIN_CAMERA_NAME: &str = "MainCamera";

/// User hooks driven by a [`Scene`]
///
/// All hooks default to no-ops; `on_init` and `on_start` default to success.
pub trait SceneBehavior {
    /// One-time setup when the scene is created; returning false discards it
    fn on_init(&mut self, _world: &mut World) -> bool {
        true
    }

    /// Called when the scene is made active; returning false keeps it inactive
    fn on_start(&mut self, _world: &mut World) -> bool {
        true
    }

    /// Runs before the game objects update
    fn on_update(&mut self, _world: &mut World, _delta_time: f32) {}

    /// Runs after the game objects update, before deferred commands apply
    fn on_late_update(&mut self, _world: &mut World, _delta_time: f32) {}

    /// Runs after the fixed-rate component update
    fn on_fixed_update(&mut self, _world: &mut World, _step: f32) {}

    /// Runs before the game objects render
    fn on_pre_render(&mut self, _world: &World, _renderer: &mut dyn Renderer) {}

    /// Runs after the game objects render
    fn on_post_render(&mut self, _world: &World, _renderer: &mut dyn Renderer) {}
}

/// Scene without custom behavior
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScene;

impl SceneBehavior for EmptyScene {}

/// A named collection of game objects with a main camera
pub struct Scene {
    object: Object,
    build_index: usize,
    world: World,
    behavior: Box<dyn SceneBehavior>,
}

impl Scene {
    /// Create a scene containing only its main camera
    pub fn new(
        name: impl Into<String>,
        build_index: usize,
        behavior: Box<dyn SceneBehavior>,
        camera: &CameraConfig,
    ) -> Self {
        let mut world = World::new(build_index);
        let camera_id = world.create_game_object(MAIN_CAMERA_NAME, None);
        world.add_component(camera_id, Camera::from_config(camera));
        world.set_main_camera(camera_id);

        Self {
            object: Object::new(name),
            build_index,
            world,
            behavior,
        }
    }

    /// Scene name, unique within its manager
    pub fn name(&self) -> &str {
        self.object.name()
    }

    /// Build index assigned by the manager
    pub fn build_index(&self) -> usize {
        self.build_index
    }

    /// Whether the scene takes part in update and render
    pub fn is_active(&self) -> bool {
        self.object.is_active()
    }

    /// Pause or resume the scene
    pub fn set_active(&mut self, active: bool) {
        self.object.set_active(active);
    }

    /// The scene's game objects
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the scene's game objects
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The auto-created camera object
    pub fn main_camera(&self) -> Option<GameObjectId> {
        self.world.main_camera()
    }

    /// Create a game object in this scene
    pub fn create_game_object(&mut self, name: impl Into<String>, parent: Option<GameObjectId>) -> GameObjectId {
        self.world.create_game_object(name, parent)
    }

    /// Destroy a game object and its subtree
    pub fn destroy(&mut self, id: GameObjectId) -> bool {
        self.world.destroy(id)
    }

    /// Clone a game object subtree
    pub fn instantiate(
        &mut self,
        original: GameObjectId,
        position: Option<Vec3>,
        rotation: Option<Quat>,
    ) -> Option<GameObjectId> {
        self.world.instantiate(original, position, rotation)
    }

    pub(crate) fn init(&mut self) -> bool {
        self.behavior.on_init(&mut self.world)
    }

    pub(crate) fn start(&mut self) -> bool {
        self.behavior.on_start(&mut self.world)
    }

    /// Advance the scene by one frame
    pub fn update(&mut self, delta_time: f32) {
        self.behavior.on_update(&mut self.world, delta_time);
        self.world.update(delta_time);
        self.behavior.on_late_update(&mut self.world, delta_time);
        self.world.apply_commands();
    }

    /// Advance the scene by one fixed step
    pub fn fixed_update(&mut self, step: f32) {
        self.world.fixed_update(step);
        self.behavior.on_fixed_update(&mut self.world, step);
        self.world.apply_commands();
    }

    /// Render the scene
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        self.behavior.on_pre_render(&self.world, renderer);
        self.world.render(renderer);
        self.behavior.on_post_render(&self.world, renderer);
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name())
            .field("build_index", &self.build_index)
            .field("active", &self.is_active())
            .field("world", &self.world)
            .finish()
    }
}
