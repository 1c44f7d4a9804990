/*!
tumble3d
========

**tumble3d** is the collision detection and rigid-body dynamics core of a
real-time 3D engine, written with the rust programming language.

It answers two questions for pairs of solid shapes and moving bodies:
do they overlap (and where, how deeply, along which direction), and how
should their velocities and positions change once they do.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![allow(clippy::type_complexity)] // Complains about closures that are fairly simple.

#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[cfg_attr(test, macro_use)]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod dynamics;
pub mod mass_properties;
pub mod partitioning;
pub mod query;
pub mod shape;
pub mod utils;

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use na::{Isometry3, Matrix3, Point3, Translation3, UnitVector3, Vector3};
    use na::{Matrix4, UnitQuaternion};

    /// The scalar type used throughout this crate.
    pub type Real = f64;

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub type Point = Point3<Real>;

    /// The vector type.
    pub type Vector = Vector3<Real>;

    /// The angular vector type.
    pub type AngVector = Vector3<Real>;

    /// The unit vector type, used for every normal.
    pub type UnitVector = UnitVector3<Real>;

    /// The 3x3 matrix type.
    pub type Matrix = Matrix3<Real>;

    /// The 4x4 homogeneous matrix type.
    pub type HomogeneousMatrix = Matrix4<Real>;

    /// The rigid transformation type: a unit quaternion followed by a translation.
    pub type Isometry = Isometry3<Real>;

    /// The rotation type.
    pub type Rotation = UnitQuaternion<Real>;

    /// The translation type.
    pub type Translation = Translation3<Real>;

    /// The angular inertia of a rigid body.
    pub type AngularInertia = crate::utils::SdpMatrix3;

    /// The principal angular inertia of a rigid body.
    pub type PrincipalAngularInertia = Vector3<Real>;

    /// A matrix that represent the cross product with a given vector.
    pub type CrossMatrix = Matrix3<Real>;
}
