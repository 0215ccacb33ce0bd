use std::ops::{Deref, DerefMut};

/// Scalar kind of a schema field, matching the PCD `TYPE` letters.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Unsigned,
    Signed,
}

impl FieldKind {
    pub fn type_str(&self) -> &'static str {
        match self {
            FieldKind::Float => "F",
            FieldKind::Unsigned => "U",
            FieldKind::Signed => "I",
        }
    }

    pub fn from_type_str(s: &str) -> Option<Self> {
        Some(match s {
            "F" => FieldKind::Float,
            "U" => FieldKind::Unsigned,
            "I" => FieldKind::Signed,
            _ => return None,
        })
    }
}

/// Schema of a point record: one entry per field in declared order.
///
/// The invariant `fields.len() == sizes.len() == kinds.len() == counts.len()`
/// must hold for the layout computations below to make sense; constructors in
/// this crate and the PCD reader both validate it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloudHeader {
    pub version: f32,
    pub fields: Vec<String>,
    pub sizes: Vec<usize>,
    pub kinds: Vec<FieldKind>,
    pub counts: Vec<usize>,
    pub width: usize,
    pub height: usize,
    pub viewpoint: Vec<f32>,
}

impl Default for PointCloudHeader {
    fn default() -> Self {
        PointCloudHeader {
            version: 0.7,
            fields: Vec::new(),
            sizes: Vec::new(),
            kinds: Vec::new(),
            counts: Vec::new(),
            width: 0,
            height: 0,
            viewpoint: Vec::new(),
        }
    }
}

impl PointCloudHeader {
    /// Bytes per record.
    pub fn stride(&self) -> usize {
        { self.sizes.iter().zip(&self.counts) }.fold(0, |acc, (size, count)| acc + size * count)
    }

    /// Checks that two clouds have the same field structure.
    pub fn type_equal(&self, other: &PointCloudHeader) -> bool {
        self.fields == other.fields
            && self.sizes == other.sizes
            && self.kinds == other.kinds
            && self.counts == other.counts
    }

    /// Byte offset of a named field within a record, along with its index in
    /// the schema.
    pub fn field_offset(&self, name: &str) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (index, field) in self.fields.iter().enumerate() {
            if field == name {
                return Some((offset, index));
            }
            offset += self.sizes[index] * self.counts[index];
        }
        None
    }
}

/// A point cloud: schema plus a contiguous record-major byte buffer of
/// exactly `points * stride()` bytes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    pub header: PointCloudHeader,
    pub points: usize,
    pub data: Vec<u8>,
}

impl Deref for PointCloud {
    type Target = PointCloudHeader;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

impl DerefMut for PointCloud {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.header
    }
}

impl PointCloud {
    /// Allocates a zeroed cloud of `points` records.
    pub fn new(header: PointCloudHeader, points: usize) -> Self {
        let stride = header.stride();
        PointCloud {
            header,
            points,
            data: vec![0; points * stride],
        }
    }

    /// Wraps an existing buffer, checking it holds exactly `points` records.
    pub fn try_from_parts(
        header: PointCloudHeader,
        points: usize,
        data: Vec<u8>,
    ) -> Result<Self, Vec<u8>> {
        if data.len() == points * header.stride() {
            Ok(PointCloud {
                header,
                points,
                data,
            })
        } else {
            Err(data)
        }
    }

    /// Copies `n` records to `dst`, which must have the same field structure.
    pub fn copy_to(&self, dst: &mut PointCloud, dst_index: usize, src_index: usize, n: usize) {
        assert!(self.header.type_equal(&dst.header));
        let stride = self.stride();
        let si = src_index * stride;
        let di = dst_index * stride;
        let nb = n * stride;
        dst.data[di..di + nb].copy_from_slice(&self.data[si..si + nb]);
    }
}
