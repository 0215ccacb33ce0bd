use nalgebra::{Matrix4, Vector3, Vector6};
use pcr_common::transforms;

use crate::{
    evaluator::{Evaluated, D_WX, D_WY, D_WZ, D_X, D_Y, D_Z},
    rodrigues::rodrigues_to_rotation,
};

/// Produces a fresh updater state per registration run.
pub trait UpdaterFactory {
    type Updater: Updater;

    fn updater(&self) -> Self::Updater;
}

/// Folds one evaluation into the transform; the flag reports termination
/// (converged or out of iterations).
pub trait Updater {
    fn update(&mut self, trans: Matrix4<f32>, ev: &Evaluated) -> (Matrix4<f32>, bool);
}

/// Scaled gradient descent with a linearly decaying step size.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescentUpdaterFactory {
    pub weight: Vector6<f32>,
    pub threshold: Vector6<f32>,
    pub max_iteration: usize,
}

impl Default for GradientDescentUpdaterFactory {
    fn default() -> Self {
        GradientDescentUpdaterFactory {
            weight: Vector6::repeat(0.3),
            threshold: Vector6::repeat(0.01),
            max_iteration: 20,
        }
    }
}

impl UpdaterFactory for GradientDescentUpdaterFactory {
    type Updater = GradientDescentUpdater;

    fn updater(&self) -> GradientDescentUpdater {
        let mut factory = self.clone();
        if factory.max_iteration == 0 {
            factory.max_iteration = 20;
        }
        GradientDescentUpdater { factory, i: 0 }
    }
}

pub struct GradientDescentUpdater {
    factory: GradientDescentUpdaterFactory,
    i: usize,
}

impl Updater for GradientDescentUpdater {
    fn update(&mut self, trans: Matrix4<f32>, ev: &Evaluated) -> (Matrix4<f32>, bool) {
        let flat = { ev.gradient.iter().zip(self.factory.threshold.iter()) }
            .all(|(g, threshold)| g.abs() <= *threshold);
        if flat {
            return (trans, true);
        }

        // negative: we descend, and the step shrinks as iterations burn down
        let factor = -(1.0 - self.i as f32 / self.factory.max_iteration as f32);
        let delta = factor * self.factory.weight.component_mul(&ev.gradient);
        let delta_trans = transforms::translation(delta[D_X], delta[D_Y], delta[D_Z]);
        // the translational gradient points along the offset, the rotational
        // part against it; the rotation step takes the opposite sign
        let delta_rot =
            rodrigues_to_rotation(-Vector3::new(delta[D_WX], delta[D_WY], delta[D_WZ]));

        let trans = delta_trans * delta_rot * trans;
        self.i += 1;
        (trans, self.i >= self.factory.max_iteration)
    }
}
