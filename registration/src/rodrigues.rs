use nalgebra::{Matrix4, Vector3};

/// Expands a Rodrigues vector (axis scaled by angle) into an affine rotation
/// matrix via `I + f0*K + f1*K^2`, `K` being the skew matrix of `v`.
///
/// Below 0.1 rad the sin/cos factors fall back to their first-order Taylor
/// terms.
pub fn rodrigues_to_rotation(v: Vector3<f32>) -> Matrix4<f32> {
    let ang = v.norm();
    #[rustfmt::skip]
    let k = Matrix4::new(
        0.0, -v.z,  v.y, 0.0,
        v.z,  0.0, -v.x, 0.0,
        -v.y, v.x,  0.0, 0.0,
        0.0,  0.0,  0.0, 0.0,
    );
    let (f0, f1) = if ang < 0.1 {
        (1.0, 0.5)
    } else {
        (ang.sin() / ang, (1.0 - ang.cos()) / (ang * ang))
    };
    Matrix4::identity() + k * f0 + k * k * f1
}
