//! Point-to-point ICP registration over any spatial index and coordinate
//! source: nearest-point correspondence, a linearised rigid-transform error
//! with 6-vector gradient, and a scaled gradient-descent updater driving the
//! iteration to convergence.

mod center;
mod correspondence;
#[cfg(feature = "debug-plot")]
mod debug;
mod evaluator;
mod icp;
mod rodrigues;
mod updater;

pub use self::{
    center::centroid,
    correspondence::{Corresponder, Correspondence, NearestPointCorresponder},
    evaluator::{Evaluated, Evaluator, PointToPointEvaluator},
    icp::{FitError, PointToPointIcp, Stat},
    rodrigues::rodrigues_to_rotation,
    updater::{GradientDescentUpdater, GradientDescentUpdaterFactory, Updater, UpdaterFactory},
};
