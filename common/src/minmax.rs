use nalgebra::Vector3;

use crate::{access::Vec3Accessor, Error};

/// Component-wise bounds of all points in the accessor.
pub fn min_max_vec3<A: Vec3Accessor>(ra: &A) -> Result<(Vector3<f32>, Vector3<f32>), Error> {
    if ra.is_empty() {
        return Err(Error::EmptyRange);
    }
    let mut min = ra.vec3_at(0);
    let mut max = min;
    for i in 1..ra.len() {
        let v = ra.vec3_at(i);
        min = min.inf(&v);
        max = max.sup(&v);
    }
    Ok((min, max))
}
