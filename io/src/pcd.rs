//! PCD container: a line-oriented ASCII header followed by an `ascii`,
//! `binary`, or `binary_compressed` body. The reader fills a
//! [`pcr_common::PointCloud`] with a record-major little-endian buffer; the
//! writer emits the header plus a `binary` body.

mod read;
mod write;

pub use self::{read::read_pcd, write::write_pcd};

/// In-body data format named by the `DATA` header line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    Ascii,
    Binary,
    BinaryCompressed,
}

impl Format {
    pub fn type_str(&self) -> &'static str {
        match self {
            Format::Ascii => "ascii",
            Format::Binary => "binary",
            Format::BinaryCompressed => "binary_compressed",
        }
    }
}

/// Viewpoint written when a cloud does not carry one.
pub(crate) const DEFAULT_VIEWPOINT: [f32; 7] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
