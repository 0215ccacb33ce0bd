use std::io::{self, Write};

use pcr_common::Vec3Accessor;

/// One dataset of an `splot` command.
pub trait Plot {
    /// The `"-" u ...` argument naming inline data columns and style.
    fn args(&self) -> String;

    /// The inline data block, terminated by the caller with `e`.
    fn write_data(&self, w: &mut dyn Write) -> io::Result<()>;
}

fn dims_arg(dims: &[usize]) -> String {
    let dims = if dims.is_empty() { &[1, 2, 3][..] } else { dims };
    let dims: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
    dims.join(":")
}

/// Scatter plot of an accessor's points.
pub struct PointsPlot<'a, A> {
    pub options: &'a str,
    pub dims: &'a [usize],
    pub points: &'a A,
}

impl<A: Vec3Accessor> Plot for PointsPlot<'_, A> {
    fn args(&self) -> String {
        let options = if self.options.is_empty() {
            "notitle"
        } else {
            self.options
        };
        format!("\"-\" u {} {}", dims_arg(self.dims), options)
    }

    fn write_data(&self, w: &mut dyn Write) -> io::Result<()> {
        for i in 0..self.points.len() {
            let p = self.points.vec3_at(i);
            writeln!(w, "{} {} {}", p.x, p.y, p.z)?;
        }
        Ok(())
    }
}

/// Segments between corresponding points of two accessors.
pub struct PointPairsPlot<'a, A, B> {
    pub options: &'a str,
    pub dims: &'a [usize],
    pub points: (&'a A, &'a B),
}

impl<A: Vec3Accessor, B: Vec3Accessor> Plot for PointPairsPlot<'_, A, B> {
    fn args(&self) -> String {
        let options = if self.options.is_empty() {
            "w l notitle"
        } else {
            self.options
        };
        format!("\"-\" u {} {}", dims_arg(self.dims), options)
    }

    fn write_data(&self, w: &mut dyn Write) -> io::Result<()> {
        let n = self.points.0.len().min(self.points.1.len());
        for i in 0..n {
            let p0 = self.points.0.vec3_at(i);
            let p1 = self.points.1.vec3_at(i);
            writeln!(w, "{} {} {}\n{} {} {}\n\n", p0.x, p0.y, p0.z, p1.x, p1.y, p1.z)?;
        }
        Ok(())
    }
}
