use nalgebra::Vector3;
use pcr_common::{Error, Vec3Accessor};

/// Mean point of an accessor.
pub fn centroid<A: Vec3Accessor>(ra: &A) -> Result<Vector3<f32>, Error> {
    if ra.is_empty() {
        return Err(Error::EmptyRange);
    }
    let mut out = Vector3::zeros();
    for i in 0..ra.len() {
        out += ra.vec3_at(i);
    }
    Ok(out / ra.len() as f32)
}
