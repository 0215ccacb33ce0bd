//! Affine helpers over `nalgebra::Matrix4<f32>`.
//!
//! A transform is the usual homogeneous 4x4: column-major, 16 contiguous
//! floats, `(column * 4 + row)` linear indexing.

use nalgebra::{Matrix4, Rotation3, Unit, Vector3};

/// Applies a 4x4 matrix to 3D points.
pub trait Transform {
    /// Rotation-only application (w = 0).
    fn so3(&self, v: &Vector3<f32>) -> Vector3<f32>;

    /// Rigid/affine application (w = 1), no perspective divide.
    fn se3(&self, v: &Vector3<f32>) -> Vector3<f32>;

    /// Full projective application with perspective divide.
    fn project(&self, v: &Vector3<f32>) -> Vector3<f32>;

    /// Inverse of an affine transform, using the 3x3 block and the
    /// translation column only.
    fn inv_affine(&self) -> Option<Matrix4<f32>>;
}

impl Transform for Matrix4<f32> {
    fn so3(&self, v: &Vector3<f32>) -> Vector3<f32> {
        (self * v.push(0.0)).xyz()
    }

    fn se3(&self, v: &Vector3<f32>) -> Vector3<f32> {
        (self * v.push(1.0)).xyz()
    }

    fn project(&self, v: &Vector3<f32>) -> Vector3<f32> {
        let h = self * v.push(1.0);
        h.xyz() / h.w
    }

    fn inv_affine(&self) -> Option<Matrix4<f32>> {
        let rot = self.fixed_view::<3, 3>(0, 0).clone_owned();
        let inv = rot.try_inverse()?;
        let t = self.fixed_view::<3, 1>(0, 3);
        let mut out = Matrix4::identity();
        out.fixed_view_mut::<3, 3>(0, 0).copy_from(&inv);
        out.fixed_view_mut::<3, 1>(0, 3).copy_from(&(-inv * t));
        Some(out)
    }
}

/// Pure translation.
pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Rotation of `angle` radians around `axis`.
pub fn axis_angle(axis: &Vector3<f32>, angle: f32) -> Matrix4<f32> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle).to_homogeneous()
}
