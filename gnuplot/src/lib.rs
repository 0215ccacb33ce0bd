//! Debug plotting sink driving an external gnuplot process.
//!
//! Only debug builds of the registration crate link this; nothing in the
//! production path reaches it.

mod plot;

use std::{
    io::{self, Write},
    process::{Child, ChildStdin, Command, Stdio},
};

pub use self::plot::{Plot, PointPairsPlot, PointsPlot};

/// A command sink accepting raw gnuplot lines and 3D point plots.
pub trait Gnuplot {
    fn write(&mut self, s: &str);

    fn splot(&mut self, plots: &[&dyn Plot]);

    fn close(&mut self);
}

/// Sink backed by a spawned `gnuplot` process.
pub struct GnuplotProcess {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl GnuplotProcess {
    pub fn new() -> io::Result<Self> {
        Self::with_command("gnuplot", &["-p"])
    }

    pub fn with_command(program: &str, args: &[&str]) -> io::Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()?;
        let stdin = child.stdin.take();
        let mut g = GnuplotProcess { child, stdin };
        g.write("set grid");
        g.write("set size ratio -1");
        g.write("set view equal xyz");
        g.write("set ticslevel 0");
        Ok(g)
    }
}

impl Gnuplot for GnuplotProcess {
    fn write(&mut self, s: &str) {
        // the plot is best-effort; a dead process just drops the lines
        if let Some(stdin) = &mut self.stdin {
            let _ = writeln!(stdin, "{}", s);
        }
    }

    fn splot(&mut self, plots: &[&dyn Plot]) {
        let args: Vec<String> = plots.iter().map(|p| p.args()).collect();
        self.write(&format!("splot {}", args.join(",")));
        for p in plots {
            if let Some(stdin) = &mut self.stdin {
                let _ = p.write_data(stdin);
            }
            self.write("e");
        }
        if let Some(stdin) = &mut self.stdin {
            let _ = stdin.flush();
        }
    }

    fn close(&mut self) {
        // dropping stdin ends the stream so the process can exit
        self.stdin.take();
        let _ = self.child.wait();
    }
}

impl Drop for GnuplotProcess {
    fn drop(&mut self) {
        self.stdin.take();
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
