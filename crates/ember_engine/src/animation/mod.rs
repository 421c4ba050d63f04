//! Skeletal animation
//!
//! Clips hold per-bone keyframe curves; an [`Animator`] plays one clip at a
//! time onto bound bone transforms and a [`SkinnedMeshRenderer`] turns the
//! posed hierarchy into a matrix palette for the vertex shader.

pub mod animator;
pub mod clip;
pub mod curve;
pub mod skinning;
pub mod state;

pub use animator::Animator;
pub use clip::{AnimationClip, BonePose, PoseSink, TransformCurve};
pub use curve::{wrap_time, AnimationCurve, Interpolation, KeyFrame, WrapMode};
pub use skinning::{build_matrix_palette, SkinnedMeshRenderer, SkinningError, BONE_PALETTE_UNIFORM, MAX_BONES};
pub use state::{AnimationState, BlendMode};
