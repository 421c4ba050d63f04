//! Playback state of one clip inside an animator

use std::sync::Arc;

use super::clip::{AnimationClip, PoseSink};
use super::curve::{wrap_time, WrapMode};

/// How a state's pose combines with others
///
/// Only plain blending exists; one clip plays at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Overwrite the bound transforms with the sampled pose
    #[default]
    Blend,
}

/// Runtime playback of a shared clip
#[derive(Debug, Clone)]
pub struct AnimationState {
    clip: Arc<AnimationClip>,
    speed: f32,
    time: f32,
    wrap_mode: WrapMode,
    blend_mode: BlendMode,
    active: bool,
}

impl AnimationState {
    /// State at time zero, playing at the clip's authored rate
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            speed: clip.ticks_per_second(),
            wrap_mode: clip.wrap_mode(),
            clip,
            time: 0.0,
            blend_mode: BlendMode::Blend,
            active: true,
        }
    }

    /// The clip being played
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Ticks advanced per second of frame time
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the playback rate
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// Current playback time in ticks
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Jump to a playback time in ticks
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Rewind to tick zero
    pub fn reset(&mut self) {
        self.time = 0.0;
    }

    /// How time outside the clip window is handled
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    /// Override the clip's loop flag
    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.wrap_mode = wrap_mode;
    }

    /// Blend mode
    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// Whether time advances on update
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pause or resume playback
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Progress through the clip window in `[0, 1]`
    pub fn normalized_time(&self) -> f32 {
        let duration = self.clip.duration();
        if duration <= 0.0 {
            return 0.0;
        }
        let wrapped = wrap_time(self.time, self.clip.start_time(), self.clip.end_time(), self.wrap_mode);
        (wrapped - self.clip.start_time()) / duration
    }

    /// Whether a clamped clip has reached its last tick
    pub fn is_finished(&self) -> bool {
        self.wrap_mode == WrapMode::Clamp && self.time >= self.clip.end_time()
    }

    /// Advance by `delta_time` seconds and write the new pose to `sink`
    ///
    /// Inactive states neither advance nor sample. Returns whether a pose
    /// was produced.
    pub fn update(&mut self, delta_time: f32, sink: &mut dyn PoseSink) -> bool {
        if !self.active {
            return false;
        }
        self.time += delta_time * self.speed;
        self.clip.sample_animation(self.time, self.wrap_mode, sink)
    }
}
