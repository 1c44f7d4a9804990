//! Closest-point queries on simple features.

pub use self::point_segment::{closest_point_on_segment, closest_points_segment_segment};
pub use self::point_triangle::{closest_point_on_triangle, TriangleFeature};

mod point_segment;
mod point_triangle;
