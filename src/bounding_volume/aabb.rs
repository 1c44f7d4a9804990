//! Axis Aligned Bounding Box.

use crate::bounding_volume::{BoundingSphere, BoundingVolume};
use crate::math::{Isometry, Point, Real, Vector, DIM};
use crate::query::{self, Intersection, Ray};
use crate::shape::Sphere;
use std::ops::{Add, AddAssign};

/// An Axis-Aligned Bounding Box (AABB).
///
/// This is both the bounding volume used throughout the crate and the box
/// collision primitive: a box collider is simply an `Aabb` expressed in the
/// local-space of its owner, and any rotation comes from the owner's pose.
///
/// - **mins**: The point with the smallest coordinates on each axis.
/// - **maxs**: The point with the largest coordinates on each axis.
/// - **Invariant**: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y` and `mins.z ≤ maxs.z`
///   (except for the "invalid" box returned by [`Aabb::new_invalid`]).
///
/// # Example
///
/// ```rust
/// use tumble3d::bounding_volume::Aabb;
/// use tumble3d::math::Point;
///
/// let a = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
/// let b = Aabb::new(Point::new(0.5, 0.5, 0.5), Point::new(2.0, 2.0, 2.0));
/// let c = Aabb::new(Point::new(2.0, 2.0, 2.0), Point::new(3.0, 3.0, 3.0));
///
/// assert!(a.intersects(&b));
/// assert!(!a.intersects(&c));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point,
    /// The point with maximum coordinates.
    pub maxs: Point,
}

impl Aabb {
    /// The vertex indices of each edge of this `Aabb`, as returned by [`Aabb::vertices`].
    pub const EDGES_VERTEX_IDS: [(usize, usize); 12] = [
        (0, 1),
        (1, 2),
        (3, 2),
        (0, 3),
        (4, 5),
        (5, 6),
        (7, 6),
        (4, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];

    /// The vertex indices of each face of this `Aabb`, counter-clockwise seen from the outside.
    pub const FACES_VERTEX_IDS: [(usize, usize, usize, usize); 6] = [
        // Face with normal +X
        (1, 2, 6, 5),
        // Face with normal -X
        (0, 4, 7, 3),
        // Face with normal +Y
        (2, 3, 7, 6),
        // Face with normal -Y
        (0, 1, 5, 4),
        // Face with normal +Z
        (4, 5, 6, 7),
        // Face with normal -Z
        (0, 3, 2, 1),
    ];

    /// Creates a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn new(mins: Point, maxs: Point) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components set to `Real::max_values` and `maxs`components set to `-Real::max_values`.
    ///
    /// This is often used as the initial values of some AABB merging algorithms.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new AABB from its center and its half-extents.
    #[inline]
    pub fn from_half_extents(center: Point, half_extents: Vector) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// A degenerate AABB containing the single point `pt`.
    #[inline]
    pub fn from_point(pt: Point) -> Self {
        Self::new(pt, pt)
    }

    /// The smallest AABB containing `a` and `b`, given in any order.
    #[inline]
    pub fn from_two_points(a: Point, b: Point) -> Self {
        Self::new(a.inf(&b), a.sup(&b))
    }

    /// The smallest AABB containing `a`, `b` and `c`, given in any order.
    #[inline]
    pub fn from_three_points(a: Point, b: Point, c: Point) -> Self {
        Self::new(a.inf(&b).inf(&c), a.sup(&b).sup(&c))
    }

    /// Creates a new AABB from a set of points.
    ///
    /// Returns [`Aabb::new_invalid`] if `pts` is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        pts.into_iter().fold(Self::new_invalid(), |aabb, pt| aabb + pt)
    }

    /// Does this AABB have `mins <= maxs` on every axis?
    #[inline]
    pub fn is_valid(&self) -> bool {
        na::partial_le(&self.mins, &self.maxs)
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector {
        self.maxs - self.mins
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point) {
        self.mins = self.mins.inf(&pt);
        self.maxs = self.maxs.sup(&pt);
    }

    /// The smallest bounding sphere containing this AABB.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        let center = self.center();
        let radius = na::distance(&self.mins, &self.maxs) * 0.5;
        BoundingSphere::new(center, radius)
    }

    /// Does this AABB contain the given point (boundary included)?
    #[inline]
    pub fn contains_point(&self, point: &Point) -> bool {
        (0..DIM).all(|i| point[i] >= self.mins[i] && point[i] <= self.maxs[i])
    }

    /// Does this AABB contain `other` entirely (boundaries included)?
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    /// Do the interiors of `self` and `other` overlap?
    ///
    /// This test is strict: two boxes merely touching along a face, an edge, or
    /// a vertex do not intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.mins[i] < other.maxs[i] && other.mins[i] < self.maxs[i])
    }

    /// Do `self` and `other` overlap, boundaries included?
    ///
    /// Unlike [`Aabb::intersects`], touching boxes overlap. This is the test
    /// to use with flat boxes, such as the bounds of axis-aligned triangles.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (0..DIM).all(|i| self.mins[i] <= other.maxs[i] && other.mins[i] <= self.maxs[i])
    }

    /// Computes the intersection of this AABB and another one.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let result = Aabb {
            mins: self.mins.sup(&other.mins),
            maxs: self.maxs.inf(&other.maxs),
        };

        if result.is_valid() {
            Some(result)
        } else {
            None
        }
    }

    /// Computes the axis-aligned box enclosing `self` transformed by `m`.
    ///
    /// This is conservative: the result is generally larger than `self`, and
    /// transforming back by `m.inverse()` does not give back `self`.
    #[inline]
    #[must_use]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        let rot_mat = m.rotation.to_rotation_matrix();
        let abs_rot = rot_mat.matrix().abs();
        let new_half_extents = abs_rot * self.half_extents();
        let new_center = m * self.center();
        Self::from_half_extents(new_center, new_half_extents)
    }

    /// The eight corners of this AABB.
    ///
    /// ```text
    ///    y             3 - 2
    ///    |           7 − 6 |
    ///    ___ x       |   | 1  (the zero is below 3 and on the left of 1,
    ///   /            4 - 5     hidden by the 4-5-6-7 face.)
    ///  z
    /// ```
    #[inline]
    pub fn vertices(&self) -> [Point; 8] {
        [
            Point::new(self.mins.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.mins.y, self.mins.z),
            Point::new(self.maxs.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.maxs.y, self.mins.z),
            Point::new(self.mins.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.mins.y, self.maxs.z),
            Point::new(self.maxs.x, self.maxs.y, self.maxs.z),
            Point::new(self.mins.x, self.maxs.y, self.maxs.z),
        ]
    }

    /// The corner of this AABB furthest along `dir`.
    #[inline]
    pub fn support_point(&self, dir: &Vector) -> Point {
        Point::new(
            if dir.x >= 0.0 { self.maxs.x } else { self.mins.x },
            if dir.y >= 0.0 { self.maxs.y } else { self.mins.y },
            if dir.z >= 0.0 { self.maxs.z } else { self.mins.z },
        )
    }

    /// Projects this AABB on the given axis, returning the `[min, max]` interval.
    #[inline]
    pub fn project_on_axis(&self, axis: &Vector) -> (Real, Real) {
        let center = self.center().coords.dot(axis);
        let radius = self.half_extents().dot(&axis.abs());
        (center - radius, center + radius)
    }

    /// Intersects a ray with the six slabs of this AABB.
    ///
    /// Returns the `[tmin, tmax]` parameters of the ray's line inside of the
    /// box. The interval is inverted (`tmin > tmax`) if the line misses.
    /// Negative parameters are not discarded.
    #[inline]
    pub fn ray_intersect(&self, ray: &Ray) -> (Real, Real) {
        query::details::ray_aabb_slabs(self, ray)
    }

    /// The first point of the ray inside of this AABB, and its parameter.
    ///
    /// If the ray starts inside of the box, the exit point is returned.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<(Real, Point)> {
        let (tmin, tmax) = self.ray_intersect(ray);

        if tmin > tmax || tmax < 0.0 {
            None
        } else if tmin >= 0.0 {
            Some((tmin, ray.point_at(tmin)))
        } else {
            Some((tmax, ray.point_at(tmax)))
        }
    }

    /// Computes the penetration of `other`, positioned by `pos12` relative
    /// to `self`, using a separating-axis test between the two oriented boxes.
    ///
    /// The result is expressed in the local-space of `self`.
    #[inline]
    pub fn collide(&self, other: &Aabb, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_aabb_aabb(pos12, self, other)
    }

    /// Computes the penetration of a sphere, positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_sphere(&self, sphere: &Sphere, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_aabb_sphere(pos12, self, sphere)
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        self.intersects(other)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        self.contains(other)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }

    #[inline]
    fn loosened(&self, amount: Real) -> Aabb {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        Aabb {
            mins: self.mins + Vector::repeat(-amount),
            maxs: self.maxs + Vector::repeat(amount),
        }
    }
}

impl Add<Aabb> for Aabb {
    type Output = Aabb;

    #[inline]
    fn add(self, rhs: Aabb) -> Aabb {
        self.merged(&rhs)
    }
}

impl AddAssign<Aabb> for Aabb {
    #[inline]
    fn add_assign(&mut self, rhs: Aabb) {
        self.merge(&rhs)
    }
}

impl Add<Point> for Aabb {
    type Output = Aabb;

    #[inline]
    fn add(mut self, rhs: Point) -> Aabb {
        self.take_point(rhs);
        self
    }
}

impl AddAssign<Point> for Aabb {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        self.take_point(rhs)
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::{Isometry, Point, Vector};
    use crate::query::Ray;

    #[test]
    fn touching_boxes_do_not_intersect() {
        let a = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point::new(1.0, 0.0, 0.0), Point::new(2.0, 1.0, 1.0));
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));
    }

    #[test]
    fn union_operators() {
        let mut a = Aabb::from_point(Point::new(1.0, 2.0, 3.0));
        a += Point::new(-1.0, 0.0, 5.0);
        let b = a + Aabb::from_two_points(Point::new(4.0, 4.0, 4.0), Point::new(3.0, -3.0, 3.0));
        assert_eq!(b.mins, Point::new(-1.0, -3.0, 3.0));
        assert_eq!(b.maxs, Point::new(4.0, 4.0, 5.0));
        assert!(b.contains(&a));
    }

    #[test]
    fn from_three_points_any_order() {
        let a = Aabb::from_three_points(
            Point::new(1.0, -1.0, 0.0),
            Point::new(-2.0, 3.0, 1.0),
            Point::new(0.0, 0.0, -4.0),
        );
        assert_eq!(a.mins, Point::new(-2.0, -1.0, -4.0));
        assert_eq!(a.maxs, Point::new(1.0, 3.0, 1.0));
    }

    #[test]
    fn transformed_box_round_trip_is_conservative() {
        let a = Aabb::new(Point::new(-1.0, -0.5, -2.0), Point::new(1.0, 0.5, 2.0));
        let m = Isometry::new(Vector::new(1.0, 2.0, 3.0), Vector::new(0.4, 0.1, -0.7));
        let back = a.transform_by(&m).transform_by(&m.inverse());
        assert!(back.loosened(1.0e-9).contains(&a));
    }

    #[test]
    fn ray_slabs() {
        let a = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x());
        let (tmin, tmax) = a.ray_intersect(&ray);
        assert_relative_eq!(tmin, 4.0);
        assert_relative_eq!(tmax, 6.0);

        let inside = Ray::new(Point::origin(), Vector::y());
        let (t, pt) = a.ray_intersection(&inside).unwrap();
        assert_relative_eq!(t, 1.0);
        assert_relative_eq!(pt, Point::new(0.0, 1.0, 0.0));

        let miss = Ray::new(Point::new(-5.0, 3.0, 0.0), Vector::x());
        let (tmin, tmax) = a.ray_intersect(&miss);
        assert!(tmin > tmax);
        assert!(a.ray_intersection(&miss).is_none());
    }
}
