//! Ray-casting related definitions and implementations.

pub use self::ray::{Ray, RayCast, RayIntersection};
pub use self::ray_aabb::ray_aabb_slabs;
pub use self::ray_sphere::ray_toi_with_sphere;
pub use self::ray_triangle::local_ray_intersection_with_triangle;

mod ray;
mod ray_aabb;
mod ray_convex_hull;
mod ray_sphere;
mod ray_triangle;
