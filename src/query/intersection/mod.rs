//! Penetrating contact description.

pub use self::intersection::Intersection;

mod intersection;
