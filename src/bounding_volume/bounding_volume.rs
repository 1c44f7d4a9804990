use crate::math::{Point, Real};

/// A coarse volume enclosing a shape.
///
/// Overlap and inclusion tests between two volumes of the same kind run in
/// constant time, and two volumes merge into one enclosing both.
pub trait BoundingVolume {
    /// A point inside of this volume, ideally its center.
    fn center(&self) -> Point;

    /// Do the two volumes overlap?
    fn intersects(&self, _: &Self) -> bool;

    /// Does this volume enclose `other`?
    fn contains(&self, _: &Self) -> bool;

    /// Grows this volume until it encloses `other`.
    fn merge(&mut self, _: &Self);

    /// The smallest volume of this kind enclosing both volumes.
    fn merged(&self, _: &Self) -> Self;

    /// This volume enlarged by `margin` in every direction.
    fn loosened(&self, _: Real) -> Self;
}
