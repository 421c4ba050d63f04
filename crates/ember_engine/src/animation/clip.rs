//! Animation clips and per-bone transform curves

use crate::foundation::math::{quat_from_xyzw, Quat, Vec3, EPSILON};

use super::curve::{wrap_time, AnimationCurve, WrapMode};

/// Sampled local pose of one bone
///
/// Channels whose curve cannot be sampled are `None` and leave the bone's
/// current value alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BonePose {
    /// Index of the bone in the skeleton's bone table
    pub bone: usize,
    /// Local translation
    pub translation: Option<Vec3>,
    /// Local rotation
    pub rotation: Option<Quat>,
    /// Local scale
    pub scale: Option<Vec3>,
}

/// Destination for sampled bone poses
pub trait PoseSink {
    /// Write one bone's pose
    fn apply_pose(&mut self, pose: &BonePose);
}

impl<F: FnMut(&BonePose)> PoseSink for F {
    fn apply_pose(&mut self, pose: &BonePose) {
        self(pose)
    }
}

/// Translation, rotation and scale curves driving one bone
///
/// Rotation keys are quaternions stored as `(x, y, z, w)`; they are blended
/// component-wise and renormalized after sampling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformCurve {
    /// Index of the driven bone
    pub bone: usize,
    /// Local translation keys
    pub translation: AnimationCurve<3>,
    /// Local rotation keys, `(x, y, z, w)`
    pub rotation: AnimationCurve<4>,
    /// Local scale keys
    pub scale: AnimationCurve<3>,
}

impl TransformCurve {
    /// Empty curves for `bone`
    pub fn new(bone: usize) -> Self {
        Self {
            bone,
            ..Self::default()
        }
    }

    /// Sample all three channels at `time`
    pub fn sample(&self, time: f32, wrap: WrapMode) -> BonePose {
        BonePose {
            bone: self.bone,
            translation: self
                .translation
                .is_sampleable()
                .then(|| self.translation.sample(time, wrap)),
            rotation: self
                .rotation
                .is_sampleable()
                .then(|| quat_from_xyzw(&self.rotation.sample(time, wrap))),
            scale: self.scale.is_sampleable().then(|| self.scale.sample(time, wrap)),
        }
    }
}

/// A named, time-bounded set of bone curves
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    name: String,
    start_time: f32,
    end_time: f32,
    looping: bool,
    ticks_per_second: f32,
    curves: Vec<TransformCurve>,
}

impl AnimationClip {
    /// Empty clip spanning `[start_time, end_time]` ticks
    pub fn new(name: impl Into<String>, start_time: f32, end_time: f32, looping: bool, ticks_per_second: f32) -> Self {
        Self {
            name: name.into(),
            start_time,
            end_time,
            looping,
            ticks_per_second,
            curves: Vec::new(),
        }
    }

    /// Clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First tick of the clip
    pub fn start_time(&self) -> f32 {
        self.start_time
    }

    /// Last tick of the clip
    pub fn end_time(&self) -> f32 {
        self.end_time
    }

    /// Length in ticks
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    /// Whether playback repeats
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Wrap mode implied by the loop flag
    pub fn wrap_mode(&self) -> WrapMode {
        if self.looping {
            WrapMode::Loop
        } else {
            WrapMode::Clamp
        }
    }

    /// Authored playback rate
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Bone curves
    pub fn curves(&self) -> &[TransformCurve] {
        &self.curves
    }

    /// Add the curves for one bone
    pub fn add_curve(&mut self, curve: TransformCurve) {
        self.curves.push(curve);
    }

    /// Builder form of [`AnimationClip::add_curve`]
    pub fn with_curve(mut self, curve: TransformCurve) -> Self {
        self.add_curve(curve);
        self
    }

    /// Sample every bone curve at `time` and hand the poses to `sink`
    ///
    /// Does nothing for a zero-length or NaN window and returns false.
    pub fn sample_animation(&self, time: f32, wrap: WrapMode, sink: &mut dyn PoseSink) -> bool {
        let duration = self.duration();
        if duration.is_nan() || duration.abs() <= EPSILON {
            return false;
        }
        let time = wrap_time(time, self.start_time, self.end_time, wrap);
        for curve in &self.curves {
            sink.apply_pose(&curve.sample(time, wrap));
        }
        true
    }
}
