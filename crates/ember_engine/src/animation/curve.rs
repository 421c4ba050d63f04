//! Keyframed curves
//!
//! An [`AnimationCurve`] holds time-ordered keyframes of an N-component value
//! and samples them with constant or linear interpolation. Malformed curves
//! (fewer than two keys, keys out of order) sample to zero instead of failing
//! so playback never interrupts a frame.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

/// How a curve fills the gap between two keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interpolation {
    /// Hold the value of the earlier key
    Constant,
    /// Straight-line blend between neighbouring keys
    #[default]
    Linear,
    /// Tangent-based spline; not implemented, samples to zero
    Cubic,
}

/// How sample times outside the curve's domain are brought back into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WrapMode {
    /// Clamp to the first or last key
    #[default]
    Clamp,
    /// Repeat the domain
    Loop,
}

/// Bring `time` into `[start, end]` (clamp) or `[start, end)` (loop)
///
/// An empty, inverted or NaN window returns `start`.
pub fn wrap_time(time: f32, start: f32, end: f32, mode: WrapMode) -> f32 {
    let length = end - start;
    if length.is_nan() || length <= 0.0 {
        return start;
    }
    match mode {
        WrapMode::Clamp => time.clamp(start, end),
        WrapMode::Loop => {
            let offset = time - start;
            let wrapped = offset - (offset / length).floor() * length;
            // Rounding of `floor` can overshoot for offsets just below a period.
            if wrapped >= length {
                start
            } else {
                start + wrapped
            }
        }
    }
}

/// One sample point of a curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrame<const N: usize> {
    /// Time of the key, in ticks
    pub time: f32,
    /// Value at `time`
    pub value: SVector<f32, N>,
    /// Incoming tangent, reserved for cubic interpolation
    pub in_tangent: SVector<f32, N>,
    /// Outgoing tangent, reserved for cubic interpolation
    pub out_tangent: SVector<f32, N>,
}

impl<const N: usize> KeyFrame<N> {
    /// Key with flat tangents
    pub fn new(time: f32, value: SVector<f32, N>) -> Self {
        Self {
            time,
            value,
            in_tangent: SVector::zeros(),
            out_tangent: SVector::zeros(),
        }
    }

    /// Key with explicit tangents
    pub fn with_tangents(
        time: f32,
        value: SVector<f32, N>,
        in_tangent: SVector<f32, N>,
        out_tangent: SVector<f32, N>,
    ) -> Self {
        Self {
            time,
            value,
            in_tangent,
            out_tangent,
        }
    }
}

/// Time-ordered keyframes with an interpolation mode
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationCurve<const N: usize> {
    keys: Vec<KeyFrame<N>>,
    interpolation: Interpolation,
}

impl<const N: usize> Default for AnimationCurve<N> {
    fn default() -> Self {
        Self::new(Interpolation::default())
    }
}

impl<const N: usize> AnimationCurve<N> {
    /// Empty curve
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            keys: Vec::new(),
            interpolation,
        }
    }

    /// Curve over the given keys, which must be in non-decreasing time order
    pub fn from_keys(keys: Vec<KeyFrame<N>>, interpolation: Interpolation) -> Self {
        Self { keys, interpolation }
    }

    /// Append a key; keys must be added in non-decreasing time order
    pub fn add_key(&mut self, key: KeyFrame<N>) {
        if self.keys.last().is_some_and(|last| key.time < last.time) {
            log::warn!("AnimationCurve: key at {} added out of order", key.time);
        }
        self.keys.push(key);
    }

    /// All keys
    pub fn keys(&self) -> &[KeyFrame<N>] {
        &self.keys
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the curve has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Interpolation mode
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Change the interpolation mode
    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }

    /// Time of the first key
    pub fn start_time(&self) -> f32 {
        self.keys.first().map_or(0.0, |k| k.time)
    }

    /// Time of the last key
    pub fn end_time(&self) -> f32 {
        self.keys.last().map_or(0.0, |k| k.time)
    }

    /// Whether the curve has enough keys to be sampled
    pub fn is_sampleable(&self) -> bool {
        self.keys.len() >= 2
    }

    /// Sample the curve at `time`
    ///
    /// Curves with fewer than two keys sample to zero.
    pub fn sample(&self, time: f32, wrap: WrapMode) -> SVector<f32, N> {
        let time = wrap_time(time, self.start_time(), self.end_time(), wrap);
        let Some(index) = self.key_index(time, wrap) else {
            return SVector::zeros();
        };
        match self.interpolation {
            Interpolation::Constant => self.keys[index].value,
            Interpolation::Linear => self.sample_linear(index, time),
            Interpolation::Cubic => SVector::zeros(),
        }
    }

    /// Index of the key at or before `time`
    ///
    /// Clamped curves pin the result to `[0, len - 2]` so there is always a
    /// following key to blend toward.
    pub fn key_index(&self, time: f32, wrap: WrapMode) -> Option<usize> {
        let len = self.keys.len();
        if len <= 1 {
            return None;
        }
        if wrap == WrapMode::Clamp {
            if time <= self.keys[0].time {
                return Some(0);
            }
            if time >= self.keys[len - 2].time {
                return Some(len - 2);
            }
        }
        (0..len).rev().find(|&i| self.keys[i].time <= time)
    }

    fn sample_linear(&self, index: usize, time: f32) -> SVector<f32, N> {
        let (Some(current), Some(next)) = (self.keys.get(index), self.keys.get(index + 1)) else {
            return SVector::zeros();
        };
        let delta = next.time - current.time;
        if delta.is_nan() || delta <= 0.0 {
            return SVector::zeros();
        }
        let t = (time - current.time) / delta;
        current.value + (next.value - current.value) * t
    }
}
