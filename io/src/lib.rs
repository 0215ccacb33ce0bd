mod error;
pub mod lzf;
pub mod pcd;

pub use self::{
    error::Error,
    pcd::{read_pcd, write_pcd},
};
