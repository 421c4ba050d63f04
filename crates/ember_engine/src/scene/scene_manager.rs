//! Scene Manager - registry of scenes and the active scene
//!
//! Scenes are keyed by a build index handed out in creation order. At most one
//! scene is active; per-frame calls are forwarded to it and ignored otherwise.

use std::collections::BTreeMap;

use thiserror::Error;

use super::scene::{Scene, SceneBehavior};
use crate::core::CameraConfig;
use crate::render::Renderer;

/// Scene registry failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A scene with this name is already registered
    #[error("a scene named '{0}' already exists")]
    DuplicateName(String),

    /// The scene's init hook reported failure
    #[error("scene '{0}' failed to initialize")]
    InitFailed(String),

    /// The scene's start hook reported failure
    #[error("scene '{0}' failed to start")]
    StartFailed(String),

    /// No scene has this build index
    #[error("no scene with build index {0}")]
    UnknownScene(usize),
}

/// Result type for scene registry operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Owns every scene and tracks the active one
pub struct SceneManager {
    scenes: BTreeMap<usize, Scene>,
    next_build_index: usize,
    active: Option<usize>,
    camera: CameraConfig,
}

impl SceneManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self::with_camera_config(CameraConfig::default())
    }

    /// Create an empty manager whose scenes build their main camera from `camera`
    pub fn with_camera_config(camera: CameraConfig) -> Self {
        Self {
            scenes: BTreeMap::new(),
            next_build_index: 0,
            active: None,
            camera,
        }
    }

    /// Create and register a scene with default-constructed behavior
    pub fn create_scene<B>(&mut self, name: &str) -> SceneResult<usize>
    where
        B: SceneBehavior + Default + 'static,
    {
        self.create_scene_with(name, B::default())
    }

    /// Create and register a scene driven by `behavior`
    ///
    /// Fails if the name is taken or the init hook fails; in both cases
    /// nothing is registered and no build index is used up.
    pub fn create_scene_with<B>(&mut self, name: &str, behavior: B) -> SceneResult<usize>
    where
        B: SceneBehavior + 'static,
    {
        if self.scene_by_name(name).is_some() {
            let err = SceneError::DuplicateName(name.to_string());
            log::warn!("{err}");
            return Err(err);
        }

        let build_index = self.next_build_index;
        let mut scene = Scene::new(name, build_index, Box::new(behavior), &self.camera);
        if !scene.init() {
            let err = SceneError::InitFailed(name.to_string());
            log::error!("{err}");
            return Err(err);
        }

        self.next_build_index += 1;
        self.scenes.insert(build_index, scene);
        log::info!("Created scene '{name}' with build index {build_index}");
        Ok(build_index)
    }

    /// Look up a scene by name
    pub fn scene_by_name(&self, name: &str) -> Option<&Scene> {
        self.scenes.values().find(|scene| scene.name() == name)
    }

    /// Mutable lookup of a scene by name
    pub fn scene_by_name_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.values_mut().find(|scene| scene.name() == name)
    }

    /// Look up a scene by build index
    pub fn scene_by_build_index(&self, build_index: usize) -> Option<&Scene> {
        self.scenes.get(&build_index)
    }

    /// Mutable lookup of a scene by build index
    pub fn scene_by_build_index_mut(&mut self, build_index: usize) -> Option<&mut Scene> {
        self.scenes.get_mut(&build_index)
    }

    /// Number of registered scenes
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// Run the scene's start hook and make it the active scene
    ///
    /// The previously active scene, if any, is left registered and untouched.
    pub fn set_active_scene(&mut self, build_index: usize) -> SceneResult<()> {
        let Some(scene) = self.scenes.get_mut(&build_index) else {
            let err = SceneError::UnknownScene(build_index);
            log::warn!("{err}");
            return Err(err);
        };
        if !scene.start() {
            let err = SceneError::StartFailed(scene.name().to_string());
            log::error!("{err}");
            return Err(err);
        }
        log::info!("Active scene is now '{}'", scene.name());
        self.active = Some(build_index);
        Ok(())
    }

    /// Build index of the active scene
    pub fn active_build_index(&self) -> Option<usize> {
        self.active
    }

    /// The active scene
    pub fn active_scene(&self) -> Option<&Scene> {
        self.scenes.get(&self.active?)
    }

    /// Mutable access to the active scene
    pub fn active_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.get_mut(&self.active?)
    }

    /// Unregister and destroy a scene
    pub fn remove_scene(&mut self, build_index: usize) -> bool {
        match self.scenes.remove(&build_index) {
            Some(scene) => {
                if self.active == Some(build_index) {
                    self.active = None;
                }
                log::info!("Removed scene '{}'", scene.name());
                true
            }
            None => {
                log::warn!("{}", SceneError::UnknownScene(build_index));
                false
            }
        }
    }

    /// Advance the active scene by one frame
    pub fn update(&mut self, delta_time: f32) {
        if let Some(scene) = self.running_scene() {
            scene.update(delta_time);
        }
    }

    /// Advance the active scene by one fixed step
    pub fn fixed_update(&mut self, step: f32) {
        if let Some(scene) = self.running_scene() {
            scene.fixed_update(step);
        }
    }

    /// Render the active scene
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        if let Some(scene) = self.running_scene() {
            scene.render(renderer);
        }
    }

    fn running_scene(&mut self) -> Option<&mut Scene> {
        self.active_scene_mut().filter(|scene| scene.is_active())
    }
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}
