use std::io::Write;

use pcr_common::PointCloud;

use super::{Format, DEFAULT_VIEWPOINT};
use crate::Error;

/// Writes the cloud as a text header followed by a `binary` body.
pub fn write_pcd<W: Write>(pp: &PointCloud, mut writer: W) -> Result<(), Error> {
    writeln!(writer, "VERSION {:.1}", pp.header.version)?;

    write!(writer, "FIELDS")?;
    for field in &pp.header.fields {
        write!(writer, " {}", field)?;
    }
    writeln!(writer)?;

    write!(writer, "SIZE")?;
    for size in &pp.header.sizes {
        write!(writer, " {}", size)?;
    }
    writeln!(writer)?;

    write!(writer, "TYPE")?;
    for kind in &pp.header.kinds {
        write!(writer, " {}", kind.type_str())?;
    }
    writeln!(writer)?;

    write!(writer, "COUNT")?;
    for count in &pp.header.counts {
        write!(writer, " {}", count)?;
    }
    writeln!(writer)?;

    writeln!(writer, "WIDTH {}", pp.header.width)?;
    writeln!(writer, "HEIGHT {}", pp.header.height)?;

    write!(writer, "VIEWPOINT")?;
    let viewpoint = if pp.header.viewpoint.is_empty() {
        &DEFAULT_VIEWPOINT[..]
    } else {
        &pp.header.viewpoint[..]
    };
    for v in viewpoint {
        write!(writer, " {:.4}", v)?;
    }
    writeln!(writer)?;

    writeln!(writer, "POINTS {}", pp.points)?;
    writeln!(writer, "DATA {}", Format::Binary.type_str())?;

    writer.write_all(&pp.data)?;
    Ok(())
}
