//! Camera component
//!
//! Every scene creates a "MainCamera" game object carrying one of these. At
//! render time the camera uploads its view and projection matrices, derived
//! from its owner's world transform, for the rest of the frame to use.

use crate::core::CameraConfig;
use crate::ecs::{Component, RenderContext};
use crate::foundation::math::{constants::DEG_TO_RAD, Mat4, Mat4Ext, Vec3};
use crate::render::{RenderResult, Renderer};

/// Uniform receiving the world-to-view matrix
pub const VIEW_UNIFORM: &str = "u_view";
/// Uniform receiving the projection matrix
pub const PROJECTION_UNIFORM: &str = "u_projection";
/// Uniform receiving projection * view
pub const VIEW_PROJECTION_UNIFORM: &str = "u_viewProjection";
/// Uniform receiving the camera's world position
pub const CAMERA_POSITION_UNIFORM: &str = "u_cameraPosition";

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect_ratio: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Camera {
    /// Create a camera from explicit projection parameters
    pub fn new(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Create a camera from configuration (field of view in degrees)
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.fov_degrees * DEG_TO_RAD,
            config.aspect_ratio,
            config.near,
            config.far,
        )
    }

    /// Projection matrix with depth mapped to `[0, 1]`
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y, self.aspect_ratio, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Component for Camera {
    fn render(&mut self, ctx: &mut RenderContext<'_>) {
        let owner = ctx.owner();
        let (view, world) = match (ctx.world().world_to_local_matrix(owner), ctx.world().local_to_world_matrix(owner)) {
            (Ok(view), Some(world)) => (view, world),
            (Err(e), _) => {
                log::error!("Camera skipped this frame: {e}");
                return;
            }
            (_, None) => return,
        };
        let projection = self.projection_matrix();
        let position = Vec3::new(world.m14, world.m24, world.m34);

        if let Err(e) = upload_camera_uniforms(ctx.renderer(), view, projection, position) {
            log::warn!("Camera uniform upload failed: {e}");
        }
    }
}

fn upload_camera_uniforms(renderer: &mut dyn Renderer, view: Mat4, projection: Mat4, position: Vec3) -> RenderResult<()> {
    renderer.set_uniform_mat4(VIEW_UNIFORM, view)?;
    renderer.set_uniform_mat4(PROJECTION_UNIFORM, projection)?;
    renderer.set_uniform_mat4(VIEW_PROJECTION_UNIFORM, projection * view)?;
    renderer.set_uniform_vec3(CAMERA_POSITION_UNIFORM, position)
}
