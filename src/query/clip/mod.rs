//! Clipping of polygons and triangles against half-spaces.

pub use self::clip_halfspace_polygon::{clip_halfspace_polygon, ClippedPolygon};

mod clip_halfspace_polygon;
