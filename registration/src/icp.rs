use nalgebra::Matrix4;
use pcr_common::{Error, Transform, Vec3Accessor};
use thiserror::Error as ThisError;

use crate::{
    evaluator::{Evaluated, Evaluator},
    updater::{Updater, UpdaterFactory},
};

/// Progress of a registration run: iterations spent and the last error
/// evaluation, if any.
#[derive(Debug, Clone, Default)]
pub struct Stat {
    pub iterations: usize,
    pub last: Option<Evaluated>,
}

/// A failed registration still carries the transform and stats accumulated
/// up to the failing iteration.
#[derive(Debug, Clone, ThisError)]
#[error("registration aborted: {source}")]
pub struct FitError {
    pub trans: Matrix4<f32>,
    pub stat: Stat,
    #[source]
    pub source: Error,
}

/// Iterative closest point driver over a pluggable evaluator and updater.
///
/// Each iteration evaluates the error of the transformed target against the
/// evaluator's base cloud, folds the gradient into the transform, and
/// re-transforms the original target, until the updater reports termination.
pub struct PointToPointIcp<E, F> {
    pub evaluator: E,
    pub updater_factory: F,
}

impl<E: Evaluator, F: UpdaterFactory> PointToPointIcp<E, F> {
    pub fn new(evaluator: E, updater_factory: F) -> Self {
        PointToPointIcp {
            evaluator,
            updater_factory,
        }
    }

    pub fn fit<A: Vec3Accessor>(&self, target: &A) -> Result<(Matrix4<f32>, Stat), FitError> {
        let mut trans = Matrix4::identity();
        let mut stat = Stat::default();

        if !self.evaluator.has_gradient() {
            return Err(FitError {
                trans,
                stat,
                source: Error::NeedGradient,
            });
        }

        let mut transformed: Vec<_> = (0..target.len()).map(|i| target.vec3_at(i)).collect();
        let mut updater = self.updater_factory.updater();
        #[cfg(feature = "debug-plot")]
        let mut plot = crate::debug::IterationPlot::new();
        loop {
            let ev = match self.evaluator.evaluate(&transformed) {
                Ok(ev) => ev,
                Err(source) => {
                    return Err(FitError {
                        trans,
                        stat,
                        source,
                    })
                }
            };
            let (next, done) = updater.update(trans, &ev);
            trans = next;
            stat.iterations += 1;
            stat.last = Some(ev);
            if done {
                return Ok((trans, stat));
            }
            for (i, out) in transformed.iter_mut().enumerate() {
                *out = trans.se3(&target.vec3_at(i));
            }
            #[cfg(feature = "debug-plot")]
            plot.show(&transformed);
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Matrix4, Vector3, Vector6};
    use pcr_common::{transforms, Error, Transform, Vec3Accessor};
    use pcr_kdtree::KdTree;

    use super::*;
    use crate::{
        Evaluated, GradientDescentUpdaterFactory, NearestPointCorresponder, PointToPointEvaluator,
    };

    fn base_points() -> Vec<Vector3<f32>> {
        vec![
            Vector3::new(-2.1, 0.0, 0.0),
            Vector3::new(-1.0, 1.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(2.0, 0.0, 0.0),
        ]
    }

    fn icp_over(
        base: Vec<Vector3<f32>>,
    ) -> PointToPointIcp<
        PointToPointEvaluator<NearestPointCorresponder<KdTree<Vec<Vector3<f32>>>>>,
        GradientDescentUpdaterFactory,
    > {
        let evaluator =
            PointToPointEvaluator::new(NearestPointCorresponder::new(KdTree::new(base), 2.0))
                .with_min_pairs(3);
        PointToPointIcp::new(evaluator, GradientDescentUpdaterFactory::default())
    }

    #[test]
    fn converges_on_translated_shuffled_cloud() {
        let base = base_points();
        let delta = transforms::translation(0.25, 0.125, -0.125);
        let order = [3usize, 1, 4, 0, 2];
        let target: Vec<_> = order.iter().map(|&i| delta.se3(&base[i])).collect();

        let icp = icp_over(base.clone());
        let (trans, stat) = icp.fit(&target).unwrap();
        assert!(stat.iterations > 0);
        assert!(stat.last.is_some());

        let mse = { order.iter().enumerate() }
            .map(|(i, &b)| (trans.se3(&target[i]) - base[b]).norm_squared())
            .sum::<f32>()
            / order.len() as f32;
        assert!(mse <= 0.05, "mean squared residual too large: {}", mse);
    }

    #[test]
    fn converges_for_various_offsets() {
        let base = base_points();
        let deltas = [
            transforms::translation(0.0, 0.0, 0.0),
            transforms::translation(0.5, 0.5, 1.0),
            transforms::translation(-0.5, -0.5, 0.0),
            transforms::axis_angle(&Vector3::new(1.0, 0.0, 0.0), 0.2),
            transforms::axis_angle(&Vector3::new(1.0, 0.0, 0.0), -0.2)
                * transforms::translation(0.2, 0.0, 0.0),
        ];
        for delta in deltas {
            let target: Vec<_> = base.iter().map(|p| delta.se3(p)).collect();
            let icp = icp_over(base.clone());
            let (trans, _) = icp.fit(&target).unwrap();
            let residual = (trans * delta).se3(&Vector3::new(1.0, 0.0, 0.0))
                - Vector3::new(1.0, 0.0, 0.0);
            assert!(
                residual.norm() <= 0.05,
                "delta {:?}: residual {}",
                delta,
                residual.norm(),
            );
        }
    }

    #[test]
    fn not_enough_pairs_keeps_partial_state() {
        // the lone base point cannot produce min_pairs correspondences
        let icp = icp_over(vec![Vector3::new(0.0, 0.0, 0.0)]);
        let target = vec![Vector3::new(0.1, 0.0, 0.0)];
        let err = icp.fit(&target).unwrap_err();
        assert_eq!(err.source, Error::NotEnoughPairs);
        assert_eq!(err.trans, Matrix4::identity());
        assert_eq!(err.stat.iterations, 0);
    }

    struct NoGradient;

    impl Evaluator for NoGradient {
        fn evaluate<A: Vec3Accessor>(&self, _target: &A) -> Result<Evaluated, Error> {
            Ok(Evaluated {
                value: 0.0,
                gradient: Vector6::zeros(),
                dist_rms: 0.0,
            })
        }

        fn has_gradient(&self) -> bool {
            false
        }

        fn has_hessian(&self) -> bool {
            false
        }
    }

    #[test]
    fn gradient_free_evaluator_is_rejected() {
        let icp = PointToPointIcp::new(NoGradient, GradientDescentUpdaterFactory::default());
        let err = icp.fit(&vec![Vector3::zeros()]).unwrap_err();
        assert_eq!(err.source, Error::NeedGradient);
    }
}
