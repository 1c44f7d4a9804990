use crate::math::{Isometry, Point, Real, UnitVector};

/// Geometric description of a penetrating contact between two shapes.
///
/// An `Intersection` is always expressed in the local-space of the shape the
/// query was run on (called "this" below, the other one being "other"):
///
/// - `point` lies in the middle of the overlap region, halfway between the
///   deepest points of both shapes along `normal`.
/// - `normal` is a unit vector pointing from "other" into "this", i.e., the
///   direction "this" has to move along to separate from "other".
/// - `depth` is the penetration depth along `normal`. It is non-negative for
///   every intersection returned by this crate.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Intersection {
    /// The contact point, in the local-space of "this".
    pub point: Point,
    /// The contact normal, pointing from "other" into "this".
    pub normal: UnitVector,
    /// The penetration depth.
    pub depth: Real,
}

impl Intersection {
    /// Creates a new intersection.
    #[inline]
    pub fn new(point: Point, normal: UnitVector, depth: Real) -> Self {
        Intersection {
            point,
            normal,
            depth,
        }
    }

    /// Re-expresses this intersection in the parent space `pos`.
    #[inline]
    #[must_use]
    pub fn transform_by(&self, pos: &Isometry) -> Self {
        Intersection {
            point: pos * self.point,
            normal: pos * self.normal,
            depth: self.depth,
        }
    }

    /// Negates the contact normal.
    ///
    /// Use this to correct the result of a query computed with its arguments
    /// in reversed order. Because the contact point is centered on the
    /// overlap region it stays valid as-is.
    #[inline]
    pub fn flip_normal(&mut self) {
        self.normal = -self.normal;
    }

    /// Returns a copy of `self` with a negated normal.
    #[inline]
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.flip_normal();
        self
    }
}
