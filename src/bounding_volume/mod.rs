//! Bounding volumes.

pub use self::aabb::Aabb;
pub use self::bounding_sphere::BoundingSphere;
pub use self::bounding_volume::BoundingVolume;

mod aabb;
mod bounding_sphere;
mod bounding_volume;
