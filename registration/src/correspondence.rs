use pcr_common::{Search, Vec3Accessor};

/// A matched pair: base point id, target point id, and their squared
/// distance at match time.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Correspondence {
    pub base_id: usize,
    pub target_id: usize,
    pub dist_sq: f32,
}

/// Pairs every target point with a base point. The base coordinates stay
/// accessible through the [`Vec3Accessor`] supertrait so evaluators can read
/// both ends of a pair.
pub trait Corresponder: Vec3Accessor {
    /// Pairs in target iteration order; unmatched targets are skipped.
    fn pairs<A: Vec3Accessor>(&self, target: &A) -> Vec<Correspondence>;
}

/// Matches each target point to its nearest base point within `max_dist`.
pub struct NearestPointCorresponder<S> {
    base: S,
    max_dist: f32,
}

impl<S: Search + Vec3Accessor> NearestPointCorresponder<S> {
    pub fn new(base: S, max_dist: f32) -> Self {
        NearestPointCorresponder { base, max_dist }
    }
}

impl<S: Vec3Accessor> Vec3Accessor for NearestPointCorresponder<S> {
    fn len(&self) -> usize {
        self.base.len()
    }

    fn vec3_at(&self, i: usize) -> nalgebra::Vector3<f32> {
        self.base.vec3_at(i)
    }
}

impl<S: Search + Vec3Accessor> Corresponder for NearestPointCorresponder<S> {
    fn pairs<A: Vec3Accessor>(&self, target: &A) -> Vec<Correspondence> {
        let n = target.len();
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let neighbor = self.base.nearest(&target.vec3_at(i), self.max_dist);
            if !neighbor.found() {
                continue;
            }
            out.push(Correspondence {
                base_id: neighbor.id as usize,
                target_id: i,
                dist_sq: neighbor.dist_sq,
            });
        }
        out
    }
}
