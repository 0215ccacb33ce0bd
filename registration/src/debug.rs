//! Per-iteration plotting of the moving target cloud, compiled in only with
//! the `debug-plot` feature.

use pcr_common::Vec3Accessor;
use pcr_gnuplot::{Gnuplot, GnuplotProcess, PointsPlot};

pub(crate) struct IterationPlot {
    sink: Option<GnuplotProcess>,
}

impl IterationPlot {
    pub fn new() -> Self {
        let sink = match GnuplotProcess::new() {
            Ok(mut sink) => {
                sink.write("set xrange [-5:5]");
                sink.write("set yrange [-5:5]");
                sink.write("set zrange [-5:5]");
                Some(sink)
            }
            Err(err) => {
                eprintln!("debug plot disabled, gnuplot not available: {}", err);
                None
            }
        };
        IterationPlot { sink }
    }

    pub fn show<A: Vec3Accessor>(&mut self, points: &A) {
        if let Some(sink) = &mut self.sink {
            let plot = PointsPlot {
                options: "",
                dims: &[],
                points,
            };
            sink.splot(&[&plot]);
        }
    }
}
