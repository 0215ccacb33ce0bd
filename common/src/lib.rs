pub mod access;
mod error;
pub mod iter;
pub mod minmax;
pub mod point_cloud;
pub mod search;
pub mod transforms;

pub use self::{
    access::{Indices, Uint32Accessor, Vec3Accessor},
    error::Error,
    point_cloud::{FieldKind, PointCloud, PointCloudHeader},
    search::{Neighbor, Search},
    transforms::Transform,
};
