use nalgebra::Vector3;

/// Random access to 3D coordinates by point index.
pub trait Vec3Accessor {
    fn len(&self) -> usize;

    fn vec3_at(&self, i: usize) -> Vector3<f32>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: Vec3Accessor + ?Sized> Vec3Accessor for &A {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        (**self).vec3_at(i)
    }
}

impl Vec3Accessor for [Vector3<f32>] {
    fn len(&self) -> usize {
        <[_]>::len(self)
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        self[i]
    }
}

impl Vec3Accessor for Vec<Vector3<f32>> {
    fn len(&self) -> usize {
        <[_]>::len(self)
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        self[i]
    }
}

impl<const N: usize> Vec3Accessor for [Vector3<f32>; N] {
    fn len(&self) -> usize {
        N
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        self[i]
    }
}

/// Random access to a `u32` attribute by point index.
pub trait Uint32Accessor {
    fn len(&self) -> usize;

    fn uint32_at(&self, i: usize) -> u32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Uint32Accessor for [u32] {
    fn len(&self) -> usize {
        <[_]>::len(self)
    }

    fn uint32_at(&self, i: usize) -> u32 {
        self[i]
    }
}

impl Uint32Accessor for crate::iter::Uint32Iter<'_> {
    fn len(&self) -> usize {
        crate::iter::Uint32Iter::len(self)
    }

    fn uint32_at(&self, i: usize) -> u32 {
        self.uint32_at(i)
    }
}

/// A sub-view of an accessor selected by an index list.
///
/// `raw_index_at` recovers the index into the backing accessor, so consumers
/// can report hits in the coordinates of the original cloud.
#[derive(Debug, Copy, Clone)]
pub struct Indices<'a, A: ?Sized> {
    indices: &'a [usize],
    inner: &'a A,
}

impl<'a, A> Indices<'a, A> {
    pub fn new(inner: &'a A, indices: &'a [usize]) -> Self {
        Indices { indices, inner }
    }

    pub fn raw_index_at(&self, i: usize) -> usize {
        self.indices[i]
    }
}

impl<A: Vec3Accessor> Vec3Accessor for Indices<'_, A> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn vec3_at(&self, i: usize) -> Vector3<f32> {
        self.inner.vec3_at(self.indices[i])
    }
}

impl<A: Uint32Accessor> Uint32Accessor for Indices<'_, A> {
    fn len(&self) -> usize {
        self.indices.len()
    }

    fn uint32_at(&self, i: usize) -> u32 {
        self.inner.uint32_at(self.indices[i])
    }
}
