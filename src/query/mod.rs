//! Non-persistent geometric queries.
//!
//! # General cases
//! The most general method provided by this module is [`query::contact()`],
//! computing the [`Intersection`] between two [`CollisionShape`]s, if any.
//! Every intersection is expressed in the local-space of the first shape,
//! with a normal pointing from the second shape toward the first one.
//!
//! Ray-casting is achieved by importing the [`query::RayCast`] trait.
//!
//! # Specific cases
//! The functions exported by the `details` submodule are more specific versions of the ones described above.
//! For example `contact_sphere_sphere` computes the intersection between two shapes known at compile-time to be spheres.
//! The specific functions have the form `contact_[shape1]_[shape2]()` where:
//!
//! * `[shape1]` is the type of the first shape passed to the function, e.g., `sphere`, or `hull`.
//! * `[shape2]` is the type of the second shape passed to the function, e.g., `aabb`, or `polytope`.
//!
//! [`query::contact()`]: crate::query::contact()
//! [`query::RayCast`]: crate::query::RayCast
//! [`CollisionShape`]: crate::shape::CollisionShape

pub use self::contact::contact;
pub use self::intersection::Intersection;
pub use self::ray::{Ray, RayCast, RayIntersection};

pub mod clip;
mod contact;
mod intersection;
pub mod point;
mod ray;
pub mod sat;

/// Queries dedicated to specific pairs of shapes.
pub mod details {
    pub use super::contact::{
        contact_aabb_aabb, contact_aabb_sphere, contact_hull_aabb, contact_hull_hull,
        contact_hull_sphere, contact_polytope_polytope, contact_reversed, contact_sphere_aabb,
        contact_sphere_sphere,
    };
    pub use super::ray::{
        local_ray_intersection_with_triangle, ray_aabb_slabs, ray_toi_with_sphere,
    };
}
