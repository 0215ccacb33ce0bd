use nalgebra::Vector3;
use pcr_common::Vec3Accessor;
use rand::Rng;

/// Duplicate-free random sampling over an accessor.
///
/// Instead of rolling a die per point, the cursor jumps ahead by
/// exponentially distributed gaps (A-ExpJ), visiting each index at most once
/// in ascending order. A ratio of 0 or less yields nothing; 1 or more visits
/// every point.
pub struct RandomSampleIter<'a, A, R> {
    ra: &'a A,
    rng: R,
    lambda: f32,
    pos: f32,
}

impl<'a, A: Vec3Accessor, R: Rng> RandomSampleIter<'a, A, R> {
    pub fn new(ra: &'a A, ratio: f32, rng: R) -> Self {
        let (lambda, pos) = if ratio <= 0.0 {
            (f32::INFINITY, ra.len() as f32)
        } else if ratio >= 1.0 {
            (f32::INFINITY, 0.0)
        } else {
            let expected_interval = 1.0 / ratio;
            (1.0 / (expected_interval - 1.0), 0.0)
        };
        RandomSampleIter {
            ra,
            rng,
            lambda,
            pos,
        }
    }

    pub fn incr(&mut self) {
        let jump = -(1.0 - self.rng.gen::<f32>()).ln() / self.lambda;
        self.pos += 1.0 + jump;
    }

    pub fn is_valid(&self) -> bool {
        (self.pos as usize) < self.ra.len()
    }

    pub fn vec3(&self) -> Vector3<f32> {
        self.ra.vec3_at(self.pos as usize)
    }

    pub fn raw_index(&self) -> usize {
        self.pos as usize
    }
}
