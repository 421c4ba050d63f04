//! Animation asset import
//!
//! Turns authored clip descriptions into runtime clips and resolves bone names
//! to game objects.

pub mod clip_loader;
pub mod skeleton;

pub use clip_loader::{ChannelDescription, ClipDescription, RotationKey, VectorKey};
pub use skeleton::BoneTable;

use thiserror::Error;

/// Import failures
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid RON for a clip
    #[error("Parse error: {0}")]
    Parse(String),

    /// The clip parsed but its values are unusable
    #[error("Invalid clip '{clip}': {reason}")]
    InvalidClip {
        /// Clip name
        clip: String,
        /// What is wrong
        reason: String,
    },

    /// A track's keys are out of time order
    #[error("{track} keys of bone '{bone}' are not in time order")]
    UnsortedKeys {
        /// Bone name
        bone: String,
        /// Track name
        track: String,
    },
}
