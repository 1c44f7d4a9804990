//! Shapes supported by tumble3d.

pub use self::collision_hierarchy::{CollisionHierarchy, Leaves};
pub use self::collision_shape::CollisionShape;
pub use self::convex_hull::{ConvexHull, HullEdge, HullError, HullTopology};
pub use self::deferred::{ArraySource, DeferredArray};
pub use self::parallel_planes::{ParallelPlanes, ParallelPlanesError};
pub use self::plane::Plane;
pub use self::sphere::Sphere;
pub use self::terrain::{Terrain, TerrainError};
pub use self::triangle::Triangle;
pub use self::triangle_list::TriangleList;

mod collision_hierarchy;
mod collision_shape;
mod convex_hull;
mod deferred;
mod mesh_contact;
mod parallel_planes;
mod plane;
mod sphere;
mod terrain;
mod triangle;
mod triangle_list;
