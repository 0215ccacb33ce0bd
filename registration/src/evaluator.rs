use nalgebra::Vector6;
use pcr_common::{Error, Vec3Accessor};

use crate::correspondence::Corresponder;

pub(crate) const D_X: usize = 0;
pub(crate) const D_Y: usize = 1;
pub(crate) const D_Z: usize = 2;
pub(crate) const D_WX: usize = 3;
pub(crate) const D_WY: usize = 4;
pub(crate) const D_WZ: usize = 5;

/// Error of one registration state: mean squared pair distance, its
/// gradient over `(dx, dy, dz, wx, wy, wz)`, and the RMS distance of the
/// paired target points from the origin.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluated {
    pub value: f32,
    pub gradient: Vector6<f32>,
    pub dist_rms: f32,
}

/// Error function of a registration state.
pub trait Evaluator {
    fn evaluate<A: Vec3Accessor>(&self, target: &A) -> Result<Evaluated, Error>;

    fn has_gradient(&self) -> bool;

    fn has_hessian(&self) -> bool;
}

/// Point-to-point error under the first-order rotation model
/// `dR = I + [w]x`:
///
/// ```text
/// f(pt) = sum w * |(dR*pt + dT) - pb|^2
/// ```
///
/// Each pair contributes the plain squared distance to the value and the
/// linearised partial derivatives to the gradient. Pair weights come from
/// `weight_fn` over the squared pair distance (1 when unset).
pub struct PointToPointEvaluator<C> {
    pub corresponder: C,
    pub min_pairs: usize,
    pub weight_fn: Option<fn(f32) -> f32>,
}

impl<C> PointToPointEvaluator<C> {
    pub fn new(corresponder: C) -> Self {
        PointToPointEvaluator {
            corresponder,
            min_pairs: 6,
            weight_fn: None,
        }
    }

    pub fn with_min_pairs(mut self, min_pairs: usize) -> Self {
        self.min_pairs = min_pairs;
        self
    }

    pub fn with_weight_fn(mut self, weight_fn: fn(f32) -> f32) -> Self {
        self.weight_fn = Some(weight_fn);
        self
    }
}

impl<C: Corresponder> Evaluator for PointToPointEvaluator<C> {
    fn has_gradient(&self) -> bool {
        true
    }

    fn has_hessian(&self) -> bool {
        false
    }

    fn evaluate<A: Vec3Accessor>(&self, target: &A) -> Result<Evaluated, Error> {
        let pairs = self.corresponder.pairs(target);
        if pairs.len() < self.min_pairs {
            return Err(Error::NotEnoughPairs);
        }

        let mut out = Evaluated::default();
        let mut weight_sum = 0.0;
        for pair in &pairs {
            let pb = self.corresponder.vec3_at(pair.base_id);
            let pt = target.vec3_at(pair.target_id);
            let w = self.weight_fn.map_or(1.0, |f| f(pair.dist_sq));
            let (x0, y0, z0) = (pt.x, pt.y, pt.z);
            let (x1, y1, z1) = (pb.x, pb.y, pb.z);

            out.value += w * (pt - pb).norm_squared();
            out.gradient[D_X] += w * 2.0 * (x0 - x1);
            out.gradient[D_Y] += w * 2.0 * (y0 - y1);
            out.gradient[D_Z] += w * 2.0 * (z0 - z1);
            out.gradient[D_WX] += w * 2.0 * (z0 * (y0 - y1) - y0 * (z0 - z1));
            out.gradient[D_WY] += w * 2.0 * (x0 * (z0 - z1) - z0 * (x0 - x1));
            out.gradient[D_WZ] += w * 2.0 * (y0 * (x0 - x1) - x0 * (y0 - y1));
            out.dist_rms += w * pt.norm_squared();
            weight_sum += w;
        }
        if weight_sum > 1.0 {
            out.value /= weight_sum;
            out.gradient /= weight_sum;
            out.dist_rms /= weight_sum;
        }
        out.dist_rms = out.dist_rms.sqrt();

        // The linearisation overshoots on large rotations; cap the
        // rotational components so one step cannot rotate the cloud
        // further than the current error distance.
        let dist = out.value.sqrt();
        let mut limit = 1.0f32;
        for j in D_WX..=D_WZ {
            let swing = (out.gradient[j] * out.dist_rms).abs();
            if swing > dist {
                limit = limit.min(dist / swing);
            }
        }
        for j in D_WX..=D_WZ {
            out.gradient[j] *= limit;
        }

        Ok(out)
    }
}
