//! Transform component
//!
//! Local position, rotation and scale of a game object relative to its
//! parent. World-space matrices depend on the hierarchy, so they are computed
//! by the [`World`](crate::ecs::World) that owns the chain of parents.

use crate::ecs::Component;
use crate::foundation::math::{trs_matrix, Mat4, Quat, Vec3};

/// Local transform of a game object
///
/// Y-up, right-handed. Matrices compose as translation * rotation * scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,

    /// Rotation relative to the parent
    pub rotation: Quat,

    /// Scale relative to the parent
    pub scale: Vec3,
}

impl Component for Transform {}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position, rotation and scale
    pub fn from_parts(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local-to-parent matrix
    pub fn local_matrix(&self) -> Mat4 {
        trs_matrix(&self.position, &self.rotation, &self.scale)
    }

    /// Translate in parent space
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Apply an additional rotation on top of the current one
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
    }
}
