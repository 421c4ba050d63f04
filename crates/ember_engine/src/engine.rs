//! Core engine implementation

use crate::{
    application::Application,
    core::ApplicationConfig,
    config::ConfigError,
    foundation::time::FrameClock,
    render::{Renderer, UniformRecorder},
    scene::{SceneError, SceneManager},
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the scene registry, the frame clock and the rendering backend, and
/// drives them once per frame: fixed steps first, then the variable update,
/// then render.
pub struct Engine {
    /// Scene registry
    scenes: SceneManager,

    /// Backend receiving uniform uploads
    renderer: Box<dyn Renderer>,

    /// Frame timing and fixed-step accumulator
    clock: FrameClock,

    /// Engine configuration
    config: ApplicationConfig,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: ApplicationConfig, renderer: Box<dyn Renderer>) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!("Initializing engine...");

        let clock = FrameClock::new(config.engine.fixed_timestep, config.engine.max_frame_delta);
        let scenes = SceneManager::with_camera_config(config.camera.clone());

        Ok(Self {
            scenes,
            renderer,
            clock,
            config,
            running: true,
        })
    }

    /// Engine that records uniform uploads instead of talking to a GPU
    pub fn headless(config: ApplicationConfig) -> Result<Self, EngineError> {
        Self::new(config, Box::new(UniformRecorder::new()))
    }

    /// Run the main loop on the wall clock until quit or the frame limit
    pub fn run<T: Application>(&mut self, app: &mut T) -> Result<(), EngineError> {
        self.run_with(app, |clock| clock.tick())
    }

    /// Run the main loop with a constant frame delta
    pub fn run_frames<T: Application>(&mut self, app: &mut T, frames: u64, delta_time: f32) -> Result<(), EngineError> {
        self.config.engine.max_frames = Some(frames);
        self.run_with(app, |clock| clock.advance(delta_time))
    }

    fn run_with<T, F>(&mut self, app: &mut T, mut advance: F) -> Result<(), EngineError>
    where
        T: Application,
        F: FnMut(&mut FrameClock) -> f32,
    {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        self.running = true;

        while self.running && !self.frame_limit_reached() {
            let delta_time = advance(&mut self.clock);

            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            self.frame(delta_time);
        }

        app.cleanup(self);

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            self.clock.frame_count(),
            self.clock.average_fps()
        );
        Ok(())
    }

    /// Advance the clock by `delta_time` and run one frame
    pub fn step(&mut self, delta_time: f32) {
        let delta_time = self.clock.advance(delta_time);
        self.frame(delta_time);
    }

    fn frame(&mut self, delta_time: f32) {
        let step = self.clock.fixed_step();
        for _ in 0..self.clock.drain_fixed_steps() {
            self.scenes.fixed_update(step);
        }
        self.scenes.update(delta_time);
        self.scenes.render(self.renderer.as_mut());
        log::trace!("Frame {} done ({delta_time:.4}s)", self.clock.frame_count());
    }

    fn frame_limit_reached(&self) -> bool {
        self.config
            .engine
            .max_frames
            .is_some_and(|limit| self.clock.frame_count() >= limit)
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the scene registry
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Get mutable access to the scene registry
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Get the rendering backend
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Get mutable access to the rendering backend
    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    /// Get the engine configuration
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Get the frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.clock.delta_time()
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed to load or validate
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scene registry error
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
