use nalgebra::Vector3;
use pcr_common::{minmax::min_max_vec3, Error, PointCloud};

/// Downsamples a cloud onto a regular grid: one output record per occupied
/// voxel, carrying the first record that landed in the voxel with its
/// coordinates replaced by the voxel centroid when several points share it.
///
/// Voxels are emitted in `x + xs * (y + ys * z)` linear order.
pub struct VoxelGrid {
    leaf_size: Vector3<f32>,
}

#[derive(Copy, Clone, Default)]
struct Voxel {
    sum: Vector3<f32>,
    num: usize,
    index: usize,
}

impl VoxelGrid {
    pub fn new(leaf_size: Vector3<f32>) -> Self {
        VoxelGrid { leaf_size }
    }

    pub fn filter(&self, pp: &PointCloud) -> Result<PointCloud, Error> {
        let it = pp.vec3_iter()?;
        let (min, max) = min_max_vec3(&it)?;

        let size = max - min;
        let xs = (size.x / self.leaf_size.x) as usize + 1;
        let ys = (size.y / self.leaf_size.y) as usize + 1;
        let zs = (size.z / self.leaf_size.z) as usize + 1;
        let mut voxels = vec![Voxel::default(); xs * ys * zs];

        let mut n = 0;
        let mut it = pp.vec3_iter()?;
        let mut i = 0;
        while it.is_valid() {
            let p = it.vec3() - min;
            let x = (p.x / self.leaf_size.x) as usize;
            let y = (p.y / self.leaf_size.y) as usize;
            let z = (p.z / self.leaf_size.z) as usize;
            let v = &mut voxels[x + xs * (y + ys * z)];
            if v.num == 0 {
                v.index = i;
                n += 1;
            }
            v.num += 1;
            v.sum += p;
            it.incr();
            i += 1;
        }

        let mut header = pp.header.clone();
        header.width = n;
        header.height = 1;
        let mut out = PointCloud::new(header, n);

        let stride = pp.header.stride();
        let mut averaged = Vec::with_capacity(n);
        let mut j = 0;
        for v in &voxels {
            if v.num > 0 {
                let src = v.index * stride;
                out.data[j * stride..(j + 1) * stride]
                    .copy_from_slice(&pp.data[src..src + stride]);
                averaged.push((v.num > 1).then(|| v.sum / v.num as f32 + min));
                j += 1;
            }
        }
        let mut jt = out.vec3_iter_mut()?;
        for avg in averaged {
            if let Some(avg) = avg {
                jt.set_vec3(avg);
            }
            jt.incr();
        }

        Ok(out)
    }
}
