//! Definition of the triangle shape.

use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::clip::{clip_halfspace_polygon, ClippedPolygon};
use crate::query::point::{closest_point_on_triangle, TriangleFeature};
use crate::query::{details, Ray, RayIntersection};
use crate::shape::Plane;
use arrayvec::ArrayVec;

/// A triangle shape.
///
/// Its normal follows the counter-clockwise winding of `a`, `b`, `c`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(C)]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Triangle {
    /// The triangle first point.
    pub a: Point,
    /// The triangle second point.
    pub b: Point,
    /// The triangle third point.
    pub c: Point,
}

impl Triangle {
    /// Creates a triangle from three points.
    #[inline]
    pub fn new(a: Point, b: Point, c: Point) -> Triangle {
        Triangle { a, b, c }
    }

    /// The vertices of this triangle.
    #[inline]
    pub fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    /// The normal of this triangle, scaled by twice its area.
    #[inline]
    pub fn scaled_normal(&self) -> Vector {
        (self.b - self.a).cross(&(self.c - self.a))
    }

    /// The unit normal of this triangle.
    ///
    /// Returns `None` if the triangle is degenerate.
    #[inline]
    pub fn normal(&self) -> Option<UnitVector> {
        UnitVector::try_new(self.scaled_normal(), 0.0)
    }

    /// The supporting plane of this triangle, `None` if it is degenerate.
    #[inline]
    pub fn plane(&self) -> Option<Plane> {
        self.normal().map(|n| Plane::new(n, self.a))
    }

    /// The area of this triangle.
    #[inline]
    pub fn area(&self) -> Real {
        self.scaled_normal().norm() * 0.5
    }

    /// The center of mass of this triangle.
    #[inline]
    pub fn centroid(&self) -> Point {
        Point::from((self.a.coords + self.b.coords + self.c.coords) / 3.0)
    }

    /// The axis-aligned box enclosing this triangle.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_three_points(self.a, self.b, self.c)
    }

    /// This triangle moved by `m`.
    #[inline]
    #[must_use]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Triangle::new(m * self.a, m * self.b, m * self.c)
    }

    /// Does the orthogonal projection of `pt` on the triangle plane lie inside of the triangle?
    pub fn contains_projection(&self, pt: &Point) -> bool {
        let n = self.scaled_normal();
        let n2 = n.norm_squared();

        if n2 == 0.0 {
            return false;
        }

        let ab = self.b - self.a;
        let ac = self.c - self.a;
        let ap = pt - self.a;
        let v = ap.cross(&ac).dot(&n) / n2;
        let w = ab.cross(&ap).dot(&n) / n2;

        v >= 0.0 && w >= 0.0 && v + w <= 1.0
    }

    /// The point of this triangle closest to `pt`, and the feature it lies on.
    #[inline]
    pub fn closest_point(&self, pt: &Point) -> (Point, TriangleFeature) {
        closest_point_on_triangle(&self.a, &self.b, &self.c, pt)
    }

    /// The intersection of `ray` with this (two-sided) triangle.
    #[inline]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        details::local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray, false)
            .map(|(inter, _)| inter)
    }

    /// The intersection of the whole line of `ray` with this triangle.
    ///
    /// The time of impact is negative if the intersection lies behind the ray origin.
    #[inline]
    pub fn extended_ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        details::local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray, true)
            .map(|(inter, _)| inter)
    }

    /// Keeps the part of this triangle below `plane` (on the side opposite to its normal).
    ///
    /// The kept polygon has up to four vertices, so it is returned as up to
    /// two triangles with the same winding as `self`.
    pub fn split_by_plane(&self, plane: &Plane) -> ArrayVec<Triangle, 2> {
        let mut result = ArrayVec::new();
        let dists = self.vertices().map(|pt| plane.signed_distance(&pt));

        if dists.iter().all(|d| *d <= 0.0) {
            result.push(*self);
            return result;
        }

        if dists.iter().all(|d| *d > 0.0) {
            return result;
        }

        let mut polygon = ClippedPolygon::new();
        clip_halfspace_polygon(&plane.point, &plane.normal, &self.vertices(), &mut polygon);

        for i in 2..polygon.len().min(4) {
            result.push(Triangle::new(polygon[0], polygon[i - 1], polygon[i]));
        }

        result
    }

    /// Tests whether this triangle and `other` intersect.
    ///
    /// Each triangle is tested against the plane of the other one; if both
    /// straddle the other's plane, the intervals they cover on the
    /// intersection line of the two planes must overlap.
    pub fn intersects_triangle(&self, other: &Triangle) -> bool {
        let n1 = self.scaled_normal();
        let n2 = other.scaled_normal();

        if n1.norm_squared() == 0.0 || n2.norm_squared() == 0.0 {
            return false;
        }

        let eps1 = TRIANGLE_EPSILON * n1.norm();
        let eps2 = TRIANGLE_EPSILON * n2.norm();
        let snap = |d: Real, eps: Real| if d.abs() < eps { 0.0 } else { d };

        let dist1 = self.vertices().map(|pt| snap((pt - other.a).dot(&n2), eps2));
        if same_strict_sign(&dist1) {
            return false;
        }

        let dist2 = other.vertices().map(|pt| snap((pt - self.a).dot(&n1), eps1));
        if same_strict_sign(&dist2) {
            return false;
        }

        let dir = n1.cross(&n2);
        if dir.norm_squared() <= TRIANGLE_EPSILON * n1.norm_squared() * n2.norm_squared()
            || dist1.iter().all(|d| *d == 0.0)
        {
            return self.intersects_coplanar_triangle(other, &n1);
        }

        let proj1 = self.vertices().map(|pt| pt.coords.dot(&dir));
        let proj2 = other.vertices().map(|pt| pt.coords.dot(&dir));

        match (
            plane_crossing_interval(&proj1, &dist1),
            plane_crossing_interval(&proj2, &dist2),
        ) {
            (Some((min1, max1)), Some((min2, max2))) => min1 <= max2 && min2 <= max1,
            _ => false,
        }
    }

    fn intersects_coplanar_triangle(&self, other: &Triangle, n: &Vector) -> bool {
        // Drop the dominant axis of the normal and work in 2D.
        let abs_n = n.abs();
        let (i, j) = if abs_n.x >= abs_n.y && abs_n.x >= abs_n.z {
            (1, 2)
        } else if abs_n.y >= abs_n.z {
            (0, 2)
        } else {
            (0, 1)
        };

        let flat = |t: &Triangle| t.vertices().map(|pt| [pt[i], pt[j]]);
        let t1 = flat(self);
        let t2 = flat(other);

        for k in 0..3 {
            for l in 0..3 {
                if segments_intersect_2d(t1[k], t1[(k + 1) % 3], t2[l], t2[(l + 1) % 3]) {
                    return true;
                }
            }
        }

        point_in_triangle_2d(t1[0], &t2) || point_in_triangle_2d(t2[0], &t1)
    }
}

const TRIANGLE_EPSILON: Real = 1.0e-9;

fn same_strict_sign(d: &[Real; 3]) -> bool {
    (d[0] > 0.0 && d[1] > 0.0 && d[2] > 0.0) || (d[0] < 0.0 && d[1] < 0.0 && d[2] < 0.0)
}

/// The interval covered on the intersection line by a triangle straddling a plane,
/// given the projection of its vertices on the line and their signed distances to the plane.
fn plane_crossing_interval(proj: &[Real; 3], dist: &[Real; 3]) -> Option<(Real, Real)> {
    let mut pts = ArrayVec::<Real, 4>::new();

    for k in 0..3 {
        let l = (k + 1) % 3;

        if dist[k] == 0.0 {
            pts.push(proj[k]);
        }

        if (dist[k] < 0.0 && dist[l] > 0.0) || (dist[k] > 0.0 && dist[l] < 0.0) {
            let t = dist[k] / (dist[k] - dist[l]);
            pts.push(proj[k] + (proj[l] - proj[k]) * t);
        }
    }

    let first = *pts.first()?;
    Some(pts.iter().fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
}

fn orient_2d(a: [Real; 2], b: [Real; 2], c: [Real; 2]) -> Real {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn segments_intersect_2d(a: [Real; 2], b: [Real; 2], c: [Real; 2], d: [Real; 2]) -> bool {
    let o1 = orient_2d(a, b, c);
    let o2 = orient_2d(a, b, d);
    let o3 = orient_2d(c, d, a);
    let o4 = orient_2d(c, d, b);

    o1 * o2 < 0.0 && o3 * o4 < 0.0
}

fn point_in_triangle_2d(pt: [Real; 2], tri: &[[Real; 2]; 3]) -> bool {
    let d1 = orient_2d(tri[0], tri[1], pt);
    let d2 = orient_2d(tri[1], tri[2], pt);
    let d3 = orient_2d(tri[2], tri[0], pt);

    (d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0) || (d1 <= 0.0 && d2 <= 0.0 && d3 <= 0.0)
}
