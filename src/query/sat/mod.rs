//! Application of the Separating Axis Theorem (SAT) for collision detection.
//!
//! Two convex shapes do **not** intersect if and only if there exists an
//! axis onto which their projections do not overlap. For polyhedra the
//! candidate axes are the face normals of both shapes plus the cross
//! products of their edge directions.
//!
//! Every test here works in the local-space of the first shape, with
//! `pos12` bringing the second shape into that space. When all the candidate
//! axes overlap, the axis with the smallest overlap gives the contact normal
//! and depth.

pub use self::sat_aabb_aabb::aabb_aabb_penetration;
pub use self::sat_axis::{axis_penetration, Penetration};
pub use self::sat_contact_point::contact_point_from_features;
pub use self::sat_polytope_polytope::{polytope_polytope_penetration, PolytopeView};

mod sat_aabb_aabb;
mod sat_axis;
mod sat_contact_point;
mod sat_polytope_polytope;
