pub mod random_sample;
pub mod voxel_grid;

pub use self::{random_sample::RandomSampleIter, voxel_grid::VoxelGrid};
