//! Animation clip descriptions
//!
//! Clips are authored as RON documents naming bones and listing their keys.
//! A description is validated, then built into an [`AnimationClip`] whose
//! curves refer to bones through a [`BoneTable`].

use std::collections::HashSet;
use std::path::Path;

use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};

use super::skeleton::BoneTable;
use super::ImportError;
use crate::animation::{AnimationClip, AnimationCurve, Interpolation, KeyFrame, TransformCurve};
use crate::foundation::math::{Vec3, Vec4};

/// Translation or scale key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorKey {
    /// Time in ticks
    pub time: f32,
    /// `[x, y, z]`
    pub value: [f32; 3],
}

/// Rotation key
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationKey {
    /// Time in ticks
    pub time: f32,
    /// Quaternion as `[x, y, z, w]`
    pub value: [f32; 4],
}

/// Keys for one bone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelDescription {
    /// Bone name, resolved through the bone table
    pub bone: String,
    /// Translation keys
    #[serde(default)]
    pub translation: Vec<VectorKey>,
    /// Rotation keys
    #[serde(default)]
    pub rotation: Vec<RotationKey>,
    /// Scale keys
    #[serde(default)]
    pub scale: Vec<VectorKey>,
}

/// Serialized form of an animation clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipDescription {
    /// Clip name
    pub name: String,
    /// First tick
    #[serde(default)]
    pub start_time: f32,
    /// Last tick
    pub end_time: f32,
    /// Whether playback repeats
    #[serde(default)]
    pub looping: bool,
    /// Authored playback rate; the importer default applies when absent
    #[serde(default)]
    pub ticks_per_second: Option<f32>,
    /// Interpolation for every curve in the clip
    #[serde(default)]
    pub interpolation: Interpolation,
    /// Per-bone keys
    pub channels: Vec<ChannelDescription>,
}

impl ClipDescription {
    /// Parse a RON document
    ///
    /// Optional fields may be written bare (`ticks_per_second: 2.0`) or
    /// wrapped (`ticks_per_second: Some(2.0)`).
    pub fn from_ron_str(contents: &str) -> Result<Self, ImportError> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(contents)
            .map_err(|e| ImportError::Parse(e.to_string()))
    }

    /// Read and parse a RON file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ImportError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Check the description for data the sampler cannot use
    pub fn validate(&self) -> Result<(), ImportError> {
        let invalid = |reason: String| Err(ImportError::InvalidClip {
            clip: self.name.clone(),
            reason,
        });

        if !self.start_time.is_finite() || !self.end_time.is_finite() {
            return invalid("clip window must be finite".to_string());
        }
        if self.end_time < self.start_time {
            return invalid(format!("end time {} precedes start time {}", self.end_time, self.start_time));
        }
        if let Some(rate) = self.ticks_per_second {
            if rate <= 0.0 {
                return invalid(format!("ticks per second must be positive, got {rate}"));
            }
        }

        let mut seen = HashSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.bone.as_str()) {
                return invalid(format!("bone '{}' has more than one channel", channel.bone));
            }
            let tracks = [
                ("translation", channel.translation.iter().map(|k| k.time).collect::<Vec<_>>()),
                ("rotation", channel.rotation.iter().map(|k| k.time).collect()),
                ("scale", channel.scale.iter().map(|k| k.time).collect()),
            ];
            for (track, times) in tracks {
                if times.iter().any(|t| !t.is_finite()) || times.windows(2).any(|pair| pair[1] < pair[0]) {
                    return Err(ImportError::UnsortedKeys {
                        bone: channel.bone.clone(),
                        track: track.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate and build the clip, registering bone names in `bones`
    pub fn build(&self, bones: &mut BoneTable, default_ticks_per_second: f32) -> Result<AnimationClip, ImportError> {
        self.validate()?;

        let mut clip = AnimationClip::new(
            self.name.clone(),
            self.start_time,
            self.end_time,
            self.looping,
            self.ticks_per_second.unwrap_or(default_ticks_per_second),
        );
        for channel in &self.channels {
            let mut curve = TransformCurve::new(bones.get_or_insert(&channel.bone));
            curve.translation = vector_curve(&channel.translation, self.interpolation);
            curve.scale = vector_curve(&channel.scale, self.interpolation);
            curve.rotation = AnimationCurve::from_keys(
                channel
                    .rotation
                    .iter()
                    .map(|k| KeyFrame::new(k.time, Vec4::from(k.value)))
                    .collect(),
                self.interpolation,
            );
            clip.add_curve(curve);
        }

        log::debug!(
            "Imported clip '{}' with {} channel(s) over [{}, {}]",
            self.name,
            self.channels.len(),
            self.start_time,
            self.end_time
        );
        Ok(clip)
    }
}

fn vector_curve(keys: &[VectorKey], interpolation: Interpolation) -> AnimationCurve<3> {
    AnimationCurve::from_keys(
        keys.iter().map(|k| KeyFrame::new(k.time, Vec3::from(k.value))).collect(),
        interpolation,
    )
}
