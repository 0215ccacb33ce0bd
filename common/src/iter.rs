//! Typed views over the record-major byte buffer of a [`PointCloud`].
//!
//! Every iterator comes in two flavours picked at construction time: an
//! aligned view reinterpreting the buffer as `&[f32]`, and a byte-level
//! little-endian view that works for any stride and offset. Both yield
//! identical bit patterns for the same stored value.

use nalgebra::Vector3;

use crate::{
    access::Vec3Accessor,
    point_cloud::{FieldKind, PointCloud, PointCloudHeader},
    Error,
};

#[inline]
fn read_f32_le(data: &[u8], pos: usize) -> f32 {
    f32::from_le_bytes(data[pos..pos + 4].try_into().unwrap())
}

#[inline]
fn write_f32_le(data: &mut [u8], pos: usize, value: f32) {
    data[pos..pos + 4].copy_from_slice(&value.to_le_bytes());
}

/// Reinterprets the buffer as `f32`s when its address is 4-aligned.
fn aligned_f32(data: &[u8]) -> Option<&[f32]> {
    // Transmuting byte groups to f32 is sound for any bit pattern.
    let (prefix, floats, _) = unsafe { data.align_to::<f32>() };
    prefix.is_empty().then_some(floats)
}

fn aligned_f32_mut(data: &mut [u8]) -> Option<&mut [f32]> {
    let (prefix, floats, _) = unsafe { data.align_to_mut::<f32>() };
    prefix.is_empty().then_some(floats)
}

/// Forward/random-access reader of one `f32` field.
#[derive(Debug, Clone)]
pub enum Float32Iter<'a> {
    Aligned {
        data: &'a [f32],
        pos: usize,
        stride: usize,
    },
    Bytes {
        data: &'a [u8],
        pos: usize,
        stride: usize,
    },
}

impl Float32Iter<'_> {
    pub fn incr(&mut self) {
        match self {
            Float32Iter::Aligned { pos, stride, .. } => *pos += *stride,
            Float32Iter::Bytes { pos, stride, .. } => *pos += *stride,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Float32Iter::Aligned { data, pos, .. } => *pos < data.len(),
            Float32Iter::Bytes { data, pos, .. } => pos + 4 <= data.len(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Float32Iter::Aligned { data, stride, .. } => data.len() / stride,
            Float32Iter::Bytes { data, stride, .. } => data.len() / stride,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn float32(&self) -> f32 {
        match self {
            Float32Iter::Aligned { data, pos, .. } => data[*pos],
            Float32Iter::Bytes { data, pos, .. } => read_f32_le(data, *pos),
        }
    }

    /// Reads relative to the current position.
    pub fn float32_at(&self, j: usize) -> f32 {
        match self {
            Float32Iter::Aligned { data, pos, stride } => data[pos + stride * j],
            Float32Iter::Bytes { data, pos, stride } => read_f32_le(data, pos + stride * j),
        }
    }

    /// Record index this iterator currently points to.
    pub fn raw_index(&self) -> usize {
        match self {
            Float32Iter::Aligned { pos, stride, .. } => pos / stride,
            Float32Iter::Bytes { pos, stride, .. } => pos / stride,
        }
    }

    pub fn raw_index_at(&self, j: usize) -> usize {
        self.raw_index() + j
    }
}

/// Forward/random-access reader-writer of one `f32` field.
#[derive(Debug)]
pub enum Float32IterMut<'a> {
    Aligned {
        data: &'a mut [f32],
        pos: usize,
        stride: usize,
    },
    Bytes {
        data: &'a mut [u8],
        pos: usize,
        stride: usize,
    },
}

impl Float32IterMut<'_> {
    pub fn incr(&mut self) {
        match self {
            Float32IterMut::Aligned { pos, stride, .. } => *pos += *stride,
            Float32IterMut::Bytes { pos, stride, .. } => *pos += *stride,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Float32IterMut::Aligned { data, pos, .. } => *pos < data.len(),
            Float32IterMut::Bytes { data, pos, .. } => pos + 4 <= data.len(),
        }
    }

    pub fn float32(&self) -> f32 {
        match self {
            Float32IterMut::Aligned { data, pos, .. } => data[*pos],
            Float32IterMut::Bytes { data, pos, .. } => read_f32_le(data, *pos),
        }
    }

    pub fn float32_at(&self, j: usize) -> f32 {
        match self {
            Float32IterMut::Aligned { data, pos, stride } => data[pos + stride * j],
            Float32IterMut::Bytes { data, pos, stride } => read_f32_le(data, pos + stride * j),
        }
    }

    pub fn set_float32(&mut self, value: f32) {
        match self {
            Float32IterMut::Aligned { data, pos, .. } => data[*pos] = value,
            Float32IterMut::Bytes { data, pos, .. } => write_f32_le(data, *pos, value),
        }
    }
}

/// Forward/random-access reader of one `u32` field; always byte-level.
#[derive(Debug, Clone)]
pub struct Uint32Iter<'a> {
    data: &'a [u8],
    pos: usize,
    stride: usize,
}

impl Uint32Iter<'_> {
    pub fn incr(&mut self) {
        self.pos += self.stride;
    }

    pub fn is_valid(&self) -> bool {
        self.pos + 4 <= self.data.len()
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn uint32(&self) -> u32 {
        u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().unwrap())
    }

    pub fn uint32_at(&self, j: usize) -> u32 {
        let pos = self.pos + self.stride * j;
        u32::from_le_bytes(self.data[pos..pos + 4].try_into().unwrap())
    }

    pub fn raw_index(&self) -> usize {
        self.pos / self.stride
    }

    pub fn raw_index_at(&self, j: usize) -> usize {
        self.raw_index() + j
    }
}

/// Forward/random-access reader-writer of one `u32` field.
#[derive(Debug)]
pub struct Uint32IterMut<'a> {
    data: &'a mut [u8],
    pos: usize,
    stride: usize,
}

impl Uint32IterMut<'_> {
    pub fn incr(&mut self) {
        self.pos += self.stride;
    }

    pub fn is_valid(&self) -> bool {
        self.pos + 4 <= self.data.len()
    }

    pub fn uint32(&self) -> u32 {
        u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().unwrap())
    }

    pub fn uint32_at(&self, j: usize) -> u32 {
        let pos = self.pos + self.stride * j;
        u32::from_le_bytes(self.data[pos..pos + 4].try_into().unwrap())
    }

    pub fn set_uint32(&mut self, value: u32) {
        self.data[self.pos..self.pos + 4].copy_from_slice(&value.to_le_bytes());
    }
}

/// Forward/random-access reader of the 3D coordinates of each record.
///
/// `Aligned` strides over an `f32` reinterpretation of the whole buffer;
/// `Split` keeps one byte offset per component and works for any layout.
#[derive(Debug, Clone)]
pub enum Vec3Iter<'a> {
    Aligned {
        data: &'a [f32],
        pos: usize,
        stride: usize,
    },
    Split {
        data: &'a [u8],
        pos: [usize; 3],
        stride: usize,
    },
}

impl Vec3Iter<'_> {
    pub fn incr(&mut self) {
        match self {
            Vec3Iter::Aligned { pos, stride, .. } => *pos += *stride,
            Vec3Iter::Split { pos, stride, .. } => {
                pos[0] += *stride;
                pos[1] += *stride;
                pos[2] += *stride;
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Vec3Iter::Aligned { data, pos, .. } => pos + 3 <= data.len(),
            Vec3Iter::Split { data, pos, .. } => pos.iter().all(|&p| p + 4 <= data.len()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Vec3Iter::Aligned { data, stride, .. } => data.len() / stride,
            Vec3Iter::Split { data, stride, .. } => data.len() / stride,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn vec3(&self) -> Vector3<f32> {
        self.vec3_at(0)
    }

    /// Reads relative to the current position.
    pub fn vec3_at(&self, j: usize) -> Vector3<f32> {
        match self {
            Vec3Iter::Aligned { data, pos, stride } => {
                let pos = pos + stride * j;
                Vector3::new(data[pos], data[pos + 1], data[pos + 2])
            }
            Vec3Iter::Split { data, pos, stride } => {
                let off = stride * j;
                Vector3::new(
                    read_f32_le(data, pos[0] + off),
                    read_f32_le(data, pos[1] + off),
                    read_f32_le(data, pos[2] + off),
                )
            }
        }
    }

    pub fn raw_index(&self) -> usize {
        match self {
            Vec3Iter::Aligned { pos, stride, .. } => pos / stride,
            Vec3Iter::Split { pos, stride, .. } => pos[0] / stride,
        }
    }

    pub fn raw_index_at(&self, j: usize) -> usize {
        self.raw_index() + j
    }
}

impl Vec3Accessor for Vec3Iter<'_> {
    fn len(&self) -> usize {
        Vec3Iter::len(self)
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        Vec3Iter::vec3_at(self, i)
    }
}

/// Forward/random-access reader-writer of the 3D coordinates of each record.
#[derive(Debug)]
pub enum Vec3IterMut<'a> {
    Aligned {
        data: &'a mut [f32],
        pos: usize,
        stride: usize,
    },
    Split {
        data: &'a mut [u8],
        pos: [usize; 3],
        stride: usize,
    },
}

impl Vec3IterMut<'_> {
    pub fn incr(&mut self) {
        match self {
            Vec3IterMut::Aligned { pos, stride, .. } => *pos += *stride,
            Vec3IterMut::Split { pos, stride, .. } => {
                pos[0] += *stride;
                pos[1] += *stride;
                pos[2] += *stride;
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Vec3IterMut::Aligned { data, pos, .. } => pos + 3 <= data.len(),
            Vec3IterMut::Split { data, pos, .. } => pos.iter().all(|&p| p + 4 <= data.len()),
        }
    }

    pub fn vec3(&self) -> Vector3<f32> {
        self.vec3_at(0)
    }

    pub fn vec3_at(&self, j: usize) -> Vector3<f32> {
        match self {
            Vec3IterMut::Aligned { data, pos, stride } => {
                let pos = pos + stride * j;
                Vector3::new(data[pos], data[pos + 1], data[pos + 2])
            }
            Vec3IterMut::Split { data, pos, stride } => {
                let off = stride * j;
                Vector3::new(
                    read_f32_le(data, pos[0] + off),
                    read_f32_le(data, pos[1] + off),
                    read_f32_le(data, pos[2] + off),
                )
            }
        }
    }

    pub fn set_vec3(&mut self, v: Vector3<f32>) {
        match self {
            Vec3IterMut::Aligned { data, pos, .. } => {
                data[*pos] = v.x;
                data[*pos + 1] = v.y;
                data[*pos + 2] = v.z;
            }
            Vec3IterMut::Split { data, pos, .. } => {
                write_f32_le(data, pos[0], v.x);
                write_f32_le(data, pos[1], v.y);
                write_f32_le(data, pos[2], v.z);
            }
        }
    }

    pub fn raw_index(&self) -> usize {
        match self {
            Vec3IterMut::Aligned { pos, stride, .. } => pos / stride,
            Vec3IterMut::Split { pos, stride, .. } => pos[0] / stride,
        }
    }
}

impl PointCloudHeader {
    #[inline]
    fn packed_f32_field(&self, index: usize) -> bool {
        self.sizes[index] == 4
            && self.counts[index] == 1
            && self.kinds.get(index) == Some(&FieldKind::Float)
    }

    /// Locates the coordinate components within a record.
    ///
    /// Returns the component byte offsets and whether they form a packed run
    /// of 32-bit floats (the precondition for the aligned fast path).
    fn vec3_offsets(&self) -> Result<([usize; 3], bool), Error> {
        // A single "xyz" field of three elements wins over separate fields.
        let mut offset = 0;
        for i in 0..self.fields.len() {
            if self.fields[i] == "xyz" && self.counts[i] == 3 {
                let size = self.sizes[i];
                let packed = size == 4 && self.kinds.get(i) == Some(&FieldKind::Float);
                return Ok(([offset, offset + size, offset + 2 * size], packed));
            }
            offset += self.sizes[i] * self.counts[i];
        }

        // An uninterrupted x, y, z field run; any other field resets the scan.
        let mut state = 0;
        let mut offsets = [0; 3];
        let mut packed = true;
        let mut offset = 0;
        for i in 0..self.fields.len() {
            state = match (self.fields[i].as_str(), state) {
                ("x", 0) => {
                    offsets[0] = offset;
                    packed = self.packed_f32_field(i);
                    1
                }
                ("y", 1) => {
                    offsets[1] = offset;
                    packed &= self.packed_f32_field(i);
                    2
                }
                ("z", 2) => {
                    offsets[2] = offset;
                    packed &= self.packed_f32_field(i);
                    3
                }
                _ => 0,
            };
            if state == 3 {
                return Ok((offsets, packed));
            }
            offset += self.sizes[i] * self.counts[i];
        }

        // Out-of-order components still work through per-field lookup.
        let mut offsets = [0; 3];
        for (slot, name) in offsets.iter_mut().zip(["x", "y", "z"]) {
            let (offset, _) = self
                .field_offset(name)
                .ok_or_else(|| Error::InvalidField(name.to_owned()))?;
            *slot = offset;
        }
        Ok((offsets, false))
    }
}

impl PointCloud {
    /// Typed `f32` view of a named field.
    pub fn float32_iter(&self, name: &str) -> Result<Float32Iter<'_>, Error> {
        let (offset, _) = self
            .header
            .field_offset(name)
            .ok_or_else(|| Error::InvalidField(name.to_owned()))?;
        let stride = self.header.stride();
        if stride % 4 == 0 && offset % 4 == 0 {
            if let Some(data) = aligned_f32(&self.data) {
                return Ok(Float32Iter::Aligned {
                    data,
                    pos: offset / 4,
                    stride: stride / 4,
                });
            }
        }
        Ok(Float32Iter::Bytes {
            data: &self.data,
            pos: offset,
            stride,
        })
    }

    /// Mutable typed `f32` view of a named field.
    pub fn float32_iter_mut(&mut self, name: &str) -> Result<Float32IterMut<'_>, Error> {
        let (offset, _) = self
            .header
            .field_offset(name)
            .ok_or_else(|| Error::InvalidField(name.to_owned()))?;
        let stride = self.header.stride();
        if stride % 4 == 0 && offset % 4 == 0 && aligned_f32(&self.data).is_some() {
            let data = aligned_f32_mut(&mut self.data).expect("checked above");
            return Ok(Float32IterMut::Aligned {
                data,
                pos: offset / 4,
                stride: stride / 4,
            });
        }
        Ok(Float32IterMut::Bytes {
            data: &mut self.data,
            pos: offset,
            stride,
        })
    }

    /// Typed `u32` view of a named field.
    pub fn uint32_iter(&self, name: &str) -> Result<Uint32Iter<'_>, Error> {
        let (offset, _) = self
            .header
            .field_offset(name)
            .ok_or_else(|| Error::InvalidField(name.to_owned()))?;
        Ok(Uint32Iter {
            data: &self.data,
            pos: offset,
            stride: self.header.stride(),
        })
    }

    /// Mutable typed `u32` view of a named field.
    pub fn uint32_iter_mut(&mut self, name: &str) -> Result<Uint32IterMut<'_>, Error> {
        let (offset, _) = self
            .header
            .field_offset(name)
            .ok_or_else(|| Error::InvalidField(name.to_owned()))?;
        let stride = self.header.stride();
        Ok(Uint32IterMut {
            data: &mut self.data,
            pos: offset,
            stride,
        })
    }

    /// Coordinate view of every record.
    pub fn vec3_iter(&self) -> Result<Vec3Iter<'_>, Error> {
        let (offsets, packed) = self.header.vec3_offsets()?;
        let stride = self.header.stride();
        if packed && stride % 4 == 0 && offsets[0] % 4 == 0 {
            if let Some(data) = aligned_f32(&self.data) {
                return Ok(Vec3Iter::Aligned {
                    data,
                    pos: offsets[0] / 4,
                    stride: stride / 4,
                });
            }
        }
        Ok(Vec3Iter::Split {
            data: &self.data,
            pos: offsets,
            stride,
        })
    }

    /// Mutable coordinate view of every record.
    pub fn vec3_iter_mut(&mut self) -> Result<Vec3IterMut<'_>, Error> {
        let (offsets, packed) = self.header.vec3_offsets()?;
        let stride = self.header.stride();
        if packed && stride % 4 == 0 && offsets[0] % 4 == 0 && aligned_f32(&self.data).is_some() {
            let data = aligned_f32_mut(&mut self.data).expect("checked above");
            return Ok(Vec3IterMut::Aligned {
                data,
                pos: offsets[0] / 4,
                stride: stride / 4,
            });
        }
        Ok(Vec3IterMut::Split {
            data: &mut self.data,
            pos: offsets,
            stride,
        })
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;

    use crate::point_cloud::{FieldKind, PointCloud, PointCloudHeader};
    use crate::Error;

    fn cloud(
        fields: &[&str],
        sizes: &[usize],
        kinds: &[FieldKind],
        counts: &[usize],
        points: usize,
    ) -> PointCloud {
        PointCloud::new(
            PointCloudHeader {
                fields: fields.iter().map(|&f| f.to_owned()).collect(),
                sizes: sizes.to_vec(),
                kinds: kinds.to_vec(),
                counts: counts.to_vec(),
                width: points,
                height: 1,
                ..Default::default()
            },
            points,
        )
    }

    fn xyz_cloud(points: usize) -> PointCloud {
        cloud(
            &["x", "y", "z"],
            &[4, 4, 4],
            &[FieldKind::Float; 3],
            &[1, 1, 1],
            points,
        )
    }

    #[test]
    fn set_vec3_writes_little_endian() {
        let mut pp = xyz_cloud(3);
        let mut it = pp.vec3_iter_mut().unwrap();
        it.set_vec3(Vector3::new(1.0, 2.0, 3.0));
        it.incr();
        it.set_vec3(Vector3::new(4.0, 5.0, 6.0));
        it.incr();
        it.set_vec3(Vector3::new(7.0, 8.0, 9.0));

        let expected: &[u8] = &[
            0x00, 0x00, 0x80, 0x3F, // 1.0
            0x00, 0x00, 0x00, 0x40, // 2.0
            0x00, 0x00, 0x40, 0x40, // 3.0
            0x00, 0x00, 0x80, 0x40, // 4.0
            0x00, 0x00, 0xA0, 0x40, // 5.0
            0x00, 0x00, 0xC0, 0x40, // 6.0
            0x00, 0x00, 0xE0, 0x40, // 7.0
            0x00, 0x00, 0x00, 0x41, // 8.0
            0x00, 0x00, 0x10, 0x41, // 9.0
        ];
        assert_eq!(pp.data, expected);

        let mut it = pp.vec3_iter().unwrap();
        for expected in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        ] {
            assert!(it.is_valid());
            assert_eq!(it.vec3(), expected);
            it.incr();
        }
        assert!(!it.is_valid());
    }

    #[test]
    fn vec3_at_is_relative() {
        let mut pp = xyz_cloud(3);
        let mut it = pp.vec3_iter_mut().unwrap();
        for i in 0..3 {
            it.set_vec3(Vector3::new(i as f32, 0.0, 0.0));
            it.incr();
        }

        let mut it = pp.vec3_iter().unwrap();
        assert_eq!(it.vec3_at(2).x, 2.0);
        it.incr();
        assert_eq!(it.vec3_at(1).x, 2.0);
    }

    #[test]
    fn raw_index_counts_strides() {
        let pp = xyz_cloud(3);
        let mut it = pp.vec3_iter().unwrap();
        let mut i = 0;
        while it.is_valid() {
            assert_eq!(it.raw_index(), i);
            assert_eq!(it.raw_index_at(1), i + 1);
            it.incr();
            i += 1;
        }
        assert_eq!(i, 3);
    }

    #[test]
    fn vec3_through_packed_xyz_field() {
        let mut pp = cloud(&["xyz"], &[4], &[FieldKind::Float], &[3], 2);
        let mut it = pp.vec3_iter_mut().unwrap();
        it.set_vec3(Vector3::new(1.0, 2.0, 3.0));
        it.incr();
        it.set_vec3(Vector3::new(4.0, 5.0, 6.0));

        let it = pp.vec3_iter().unwrap();
        assert!(matches!(it, super::Vec3Iter::Aligned { .. }));
        assert_eq!(it.vec3_at(0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(it.vec3_at(1), Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn vec3_falls_back_to_byte_level_on_odd_stride() {
        // A one-byte tag in front of the coordinates breaks 4-alignment.
        let mut pp = cloud(
            &["tag", "x", "y", "z"],
            &[1, 4, 4, 4],
            &[
                FieldKind::Unsigned,
                FieldKind::Float,
                FieldKind::Float,
                FieldKind::Float,
            ],
            &[1, 1, 1, 1],
            3,
        );
        {
            let mut it = pp.vec3_iter_mut().unwrap();
            assert!(matches!(it, super::Vec3IterMut::Split { .. }));
            let mut i = 0.0;
            while it.is_valid() {
                it.set_vec3(Vector3::new(i, i + 0.5, -i));
                it.incr();
                i += 1.0;
            }
        }
        let it = pp.vec3_iter().unwrap();
        for i in 0..3 {
            let v = it.vec3_at(i);
            assert_eq!(v, Vector3::new(i as f32, i as f32 + 0.5, -(i as f32)));
        }
    }

    #[test]
    fn vec3_handles_out_of_order_components() {
        let mut pp = cloud(
            &["x", "z", "y"],
            &[4, 4, 4],
            &[FieldKind::Float; 3],
            &[1, 1, 1],
            1,
        );
        let mut it = pp.vec3_iter_mut().unwrap();
        it.set_vec3(Vector3::new(1.0, 2.0, 3.0));
        let it = pp.vec3_iter().unwrap();
        assert_eq!(it.vec3(), Vector3::new(1.0, 2.0, 3.0));
        // y landed in the third field, z in the second
        assert_eq!(pp.float32_iter("y").unwrap().float32_at(0), 2.0);
        assert_eq!(pp.float32_iter("z").unwrap().float32_at(0), 3.0);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let pp = cloud(&["x", "y"], &[4, 4], &[FieldKind::Float; 2], &[1, 1], 1);
        assert_eq!(
            pp.float32_iter("w").unwrap_err(),
            Error::InvalidField("w".to_owned()),
        );
        assert_eq!(
            pp.vec3_iter().unwrap_err(),
            Error::InvalidField("z".to_owned()),
        );
    }

    #[test]
    fn float32_matches_little_endian_reassembly() {
        let mut pp = xyz_cloud(4);
        {
            let mut it = pp.float32_iter_mut("y").unwrap();
            let mut v = 0.25;
            while it.is_valid() {
                it.set_float32(v);
                it.incr();
                v *= -3.0;
            }
        }
        let stride = pp.header.stride();
        let (offset, _) = pp.header.field_offset("y").unwrap();
        let it = pp.float32_iter("y").unwrap();
        for i in 0..pp.points {
            let off = i * stride + offset;
            let expected = f32::from_le_bytes(pp.data[off..off + 4].try_into().unwrap());
            assert_eq!(it.float32_at(i).to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn uint32_round_trip() {
        let mut pp = cloud(&["label"], &[4], &[FieldKind::Unsigned], &[1], 3);
        {
            let mut it = pp.uint32_iter_mut("label").unwrap();
            it.set_uint32(1);
            it.incr();
            it.set_uint32(2);
            it.incr();
            it.set_uint32(3);
        }
        let expected: &[u8] = &[
            0x01, 0x00, 0x00, 0x00, //
            0x02, 0x00, 0x00, 0x00, //
            0x03, 0x00, 0x00, 0x00, //
        ];
        assert_eq!(pp.data, expected);

        let mut it = pp.uint32_iter("label").unwrap();
        for expected in [1, 2, 3] {
            assert!(it.is_valid());
            assert_eq!(it.uint32(), expected);
            it.incr();
        }
        let it = pp.uint32_iter("label").unwrap();
        for (i, expected) in [1, 2, 3].into_iter().enumerate() {
            assert_eq!(it.uint32_at(i), expected);
            assert_eq!(it.raw_index_at(i), i);
        }
    }

    #[test]
    fn interleaved_float_and_uint_fields() {
        let mut pp = cloud(
            &["x", "label"],
            &[4, 4],
            &[FieldKind::Float, FieldKind::Unsigned],
            &[1, 1],
            3,
        );
        {
            let mut it = pp.float32_iter_mut("x").unwrap();
            for v in [1.0, 2.0, 3.0] {
                it.set_float32(v);
                it.incr();
            }
        }
        {
            let mut lt = pp.uint32_iter_mut("label").unwrap();
            for v in [1, 2, 3] {
                lt.set_uint32(v);
                lt.incr();
            }
        }
        let expected: &[u8] = &[
            0x00, 0x00, 0x80, 0x3F, 0x01, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x00, 0x40, 0x02, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x40, 0x40, 0x03, 0x00, 0x00, 0x00, //
        ];
        assert_eq!(pp.data, expected);

        let it = pp.float32_iter("x").unwrap();
        let lt = pp.uint32_iter("label").unwrap();
        for i in 0..3 {
            assert_eq!(it.float32_at(i), (i + 1) as f32);
            assert_eq!(lt.uint32_at(i), (i + 1) as u32);
        }
    }

    #[test]
    fn aligned_and_byte_paths_agree_bitwise() {
        let values = [1.5f32, -0.0, f32::MIN_POSITIVE, 1.0e-42, 3.0e38];
        let mut pp = xyz_cloud(values.len());
        {
            let mut it = pp.vec3_iter_mut().unwrap();
            for &v in &values {
                it.set_vec3(Vector3::new(v, v, v));
                it.incr();
            }
        }
        let aligned = pp.vec3_iter().unwrap();
        let split = super::Vec3Iter::Split {
            data: &pp.data,
            pos: [0, 4, 8],
            stride: 12,
        };
        for i in 0..values.len() {
            let a = aligned.vec3_at(i);
            let b = split.vec3_at(i);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }
}
