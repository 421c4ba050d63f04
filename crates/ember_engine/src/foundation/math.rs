//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of helpers the scene graph and
//! animation code share: TRS matrix composition, checked inversion and the
//! camera projection builders.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    SVector,
    Unit,
};
use thiserror::Error;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Tolerance used for floating point equality throughout the engine
pub const EPSILON: f32 = 1.0e-5;

/// Errors raised by the math primitives
///
/// These are programmer errors: callers abandon the frame operation that
/// produced them rather than trying to recover.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    /// Attempted to invert a matrix with a zero determinant
    #[error("matrix is singular and cannot be inverted")]
    SingularMatrix,

    /// Component index outside the vector or matrix dimensions
    #[error("component index {index} out of range for dimension {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of components available
        len: usize,
    },
}

/// Compose a translation * rotation * scale matrix
pub fn trs_matrix(position: &Vec3, rotation: &Quat, scale: &Vec3) -> Mat4 {
    Mat4::new_translation(position)
        * rotation.to_homogeneous()
        * Mat4::new_nonuniform_scaling(scale)
}

/// Invert a matrix, reporting singular input instead of producing garbage
pub fn checked_inverse(matrix: &Mat4) -> Result<Mat4, MathError> {
    matrix.try_inverse().ok_or(MathError::SingularMatrix)
}

/// Bounds-checked component read for small vectors
pub fn component<const N: usize>(vector: &SVector<f32, N>, index: usize) -> Result<f32, MathError> {
    vector
        .get(index)
        .copied()
        .ok_or(MathError::IndexOutOfRange { index, len: N })
}

/// Build a unit quaternion from `[x, y, z, w]` storage
///
/// Degenerate (zero length) input collapses to the identity rotation.
pub fn quat_from_xyzw(xyzw: &Vec4) -> Quat {
    let raw = Quaternion::new(xyzw.w, xyzw.x, xyzw.y, xyzw.z);
    Unit::try_new(raw, f32::EPSILON).unwrap_or_else(Quat::identity)
}

/// Store a rotation as `[x, y, z, w]`
pub fn quat_to_xyzw(rotation: &Quat) -> Vec4 {
    rotation.coords
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Extension trait for Mat4 with camera helpers
pub trait Mat4Ext {
    /// Create a perspective projection matrix with depth mapped to `[0, 1]`
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = far / (far - near);
        result[(2, 3)] = -(near * far) / (far - near);
        result[(3, 2)] = 1.0;
        result
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new_translation(&-eye);
        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_trs_inverse_roundtrip() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 0.75);
        let matrix = trs_matrix(&Vec3::new(1.0, 2.0, 3.0), &rotation, &Vec3::new(2.0, 2.0, 2.0));
        let inverse = checked_inverse(&matrix).unwrap();

        assert_relative_eq!(matrix * inverse, Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_singular_matrix_is_reported() {
        let collapsed = trs_matrix(&Vec3::zeros(), &Quat::identity(), &Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(checked_inverse(&collapsed), Err(MathError::SingularMatrix));
    }

    #[test]
    fn test_component_out_of_range() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(component(&v, 2), Ok(3.0));
        assert_eq!(component(&v, 3), Err(MathError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_quat_xyzw_storage() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), constants::HALF_PI);
        let stored = quat_to_xyzw(&rotation);
        let restored = quat_from_xyzw(&stored);
        assert_relative_eq!(restored, rotation, epsilon = EPSILON);

        // zero storage collapses to identity
        assert_relative_eq!(quat_from_xyzw(&Vec4::zeros()), Quat::identity());
    }

    #[test]
    fn test_look_at_moves_eye_to_origin() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::y());
        let eye = view.transform_point(&Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = EPSILON);
    }
}
