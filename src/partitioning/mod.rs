//! Spatial partitioning tools.

pub use self::bucket3d::Bucket3d;
pub use self::rtree::{RTree, DEFAULT_MAX_CHILDREN};

mod bucket3d;
mod rtree;
