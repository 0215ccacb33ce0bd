use nalgebra::Vector3;

/// One spatial query hit. A miss is encoded as `id == -1` with `dist_sq`
/// holding the squared search radius.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Neighbor {
    pub id: i32,
    pub dist_sq: f32,
}

impl Neighbor {
    pub fn none(max_range: f32) -> Self {
        Neighbor {
            id: -1,
            dist_sq: max_range * max_range,
        }
    }

    pub fn found(&self) -> bool {
        self.id >= 0
    }
}

/// Spatial index over a fixed set of points.
pub trait Search {
    /// Closest point within `max_range` of `p`.
    fn nearest(&self, p: &Vector3<f32>, max_range: f32) -> Neighbor;

    /// All points strictly within `max_range` of `p`, sorted by ascending
    /// squared distance.
    fn range(&self, p: &Vector3<f32>, max_range: f32) -> Vec<Neighbor>;
}
