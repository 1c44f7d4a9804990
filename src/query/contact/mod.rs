//! Implementation details of the `contact` function.

pub use self::contact_aabb_aabb::contact_aabb_aabb;
pub use self::contact_aabb_sphere::{contact_aabb_sphere, contact_sphere_aabb};
pub use self::contact_hull_polytope::{
    contact_hull_aabb, contact_hull_hull, contact_polytope_polytope,
};
pub use self::contact_hull_sphere::contact_hull_sphere;
pub use self::contact_shape_shape::{contact, contact_reversed};
pub use self::contact_sphere_sphere::contact_sphere_sphere;

mod contact_aabb_aabb;
mod contact_aabb_sphere;
mod contact_hull_polytope;
mod contact_hull_sphere;
mod contact_shape_shape;
mod contact_sphere_sphere;
