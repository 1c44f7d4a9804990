use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::{Plane, Triangle};

/// A triangle soup, used as the surface representation of meshes.
///
/// This is what mesh clipping operates on: the part of a surface lying
/// inside of a convex polytope is obtained by clipping the list by each of
/// the polytope planes, and contacts are derived from the remaining surface.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TriangleList {
    /// The triangles of this list.
    pub triangles: Vec<Triangle>,
}

impl TriangleList {
    /// Creates a triangle list.
    pub fn new(triangles: Vec<Triangle>) -> Self {
        TriangleList { triangles }
    }

    /// Builds the list of triangles described by an index buffer.
    ///
    /// Out-of-bounds indices are skipped.
    pub fn from_indexed(vertices: &[Point], indices: &[[u32; 3]]) -> Self {
        let triangles = indices
            .iter()
            .filter_map(|idx| {
                Some(Triangle::new(
                    *vertices.get(idx[0] as usize)?,
                    *vertices.get(idx[1] as usize)?,
                    *vertices.get(idx[2] as usize)?,
                ))
            })
            .collect();
        TriangleList { triangles }
    }

    /// Is this list empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The number of triangles of this list.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Iterates through the triangles of this list.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Triangle> {
        self.triangles.iter()
    }

    /// Appends a triangle.
    #[inline]
    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle)
    }

    /// This list with every triangle moved by `m`.
    #[must_use]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        TriangleList::new(self.triangles.iter().map(|t| t.transform_by(m)).collect())
    }

    /// The axis-aligned box enclosing every triangle of this list.
    ///
    /// This is [`Aabb::new_invalid`] if the list is empty.
    pub fn local_aabb(&self) -> Aabb {
        self.triangles
            .iter()
            .fold(Aabb::new_invalid(), |aabb, t| aabb + t.local_aabb())
    }

    /// The total area of the triangles.
    pub fn area(&self) -> Real {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// The area-weighted centroid of the triangles, `None` if the area is zero.
    pub fn centroid(&self) -> Option<Point> {
        let mut sum = Vector::zeros();
        let mut total = 0.0;

        for t in &self.triangles {
            let area = t.area();
            sum += t.centroid().coords * area;
            total += area;
        }

        if total > 0.0 {
            Some(Point::from(sum / total))
        } else {
            None
        }
    }

    /// The area-weighted average of the triangle normals.
    ///
    /// Returns `None` if the normals cancel out or the list has no area.
    pub fn average_normal(&self) -> Option<UnitVector> {
        let sum: Vector = self.triangles.iter().map(Triangle::scaled_normal).sum();
        UnitVector::try_new(sum, 0.0)
    }

    /// Keeps the parts of the triangles below `plane`.
    pub fn clip_by_plane(&self, plane: &Plane) -> TriangleList {
        let mut result = Vec::with_capacity(self.triangles.len());

        for t in &self.triangles {
            result.extend(t.split_by_plane(plane));
        }

        TriangleList::new(result)
    }

    /// Keeps the parts of the triangles below every plane of `planes`.
    ///
    /// If the planes bound a convex polytope, this is the part of the surface
    /// inside of the polytope.
    pub fn clip_by_planes(&self, planes: &[Plane]) -> TriangleList {
        let mut result = self.clone();

        for plane in planes {
            if result.is_empty() {
                break;
            }
            result = result.clip_by_plane(plane);
        }

        result
    }

    /// The nearest intersection between `ray` and the triangles.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        self.triangles
            .iter()
            .filter_map(|t| t.ray_intersection(ray))
            .min_by(|a, b| a.time_of_impact.total_cmp(&b.time_of_impact))
    }

    /// Does any triangle of `self` intersect any triangle of `other`?
    ///
    /// Both lists must be expressed in the same space.
    pub fn intersects(&self, other: &TriangleList) -> bool {
        let aabb2 = other.local_aabb();

        self.triangles
            .iter()
            .filter(|t1| t1.local_aabb().overlaps(&aabb2))
            .any(|t1| other.triangles.iter().any(|t2| t1.intersects_triangle(t2)))
    }

    /// Derives the contact between this surface and a convex polytope.
    ///
    /// The polytope is described by its outward `planes` and its `vertices`,
    /// all in the same space as `self`. The surface is clipped by the
    /// planes; the remaining area gives the contact point (its centroid) and
    /// normal (its area-weighted normal), and the depth is the distance of
    /// the deepest polytope vertex below that surface. The surface is the
    /// "this" side: the normal points from the polytope down into it.
    pub fn collide_polytope(&self, planes: &[Plane], vertices: &[Point]) -> Option<Intersection> {
        if planes.is_empty() || vertices.is_empty() {
            return None;
        }

        let clipped = self.clip_by_planes(planes);
        let normal = clipped.average_normal()?;
        let point = clipped.centroid()?;
        let depth = deepest_below(&normal, &point, vertices)?;

        Some(Intersection::new(point, -normal, depth))
    }

    /// Derives a contact between this surface and another one positioned by `pos12`.
    ///
    /// Surfaces have no volume, so the reported depth is zero. The point is
    /// the average of the midpoints of the intersecting triangle pairs and
    /// the normal is the average normal of the triangles of `other` involved.
    pub fn collide_triangle_list(
        &self,
        other: &TriangleList,
        pos12: &Isometry,
    ) -> Option<Intersection> {
        let other = other.transform_by(pos12);
        let aabb2 = other.local_aabb();
        let mut point_sum = Vector::zeros();
        let mut normal_sum = Vector::zeros();
        let mut count = 0;

        for t1 in self
            .triangles
            .iter()
            .filter(|t| t.local_aabb().overlaps(&aabb2))
        {
            for t2 in &other.triangles {
                if t1.intersects_triangle(t2) {
                    point_sum += na::center(&t1.centroid(), &t2.centroid()).coords;
                    normal_sum += t2.scaled_normal();
                    count += 1;
                }
            }
        }

        if count == 0 {
            return None;
        }

        let normal = UnitVector::try_new(normal_sum, 0.0)?;
        Some(Intersection::new(Point::from(point_sum / count as Real), normal, 0.0))
    }
}

/// The largest distance of a point of `vertices` below the plane `(point, normal)`.
///
/// Returns `None` if no vertex lies below the plane.
pub(crate) fn deepest_below(
    normal: &UnitVector,
    point: &Point,
    vertices: &[Point],
) -> Option<Real> {
    let depth = vertices
        .iter()
        .map(|v| (point - v).dot(normal))
        .fold(-Real::MAX, Real::max);

    if depth > 0.0 {
        Some(depth)
    } else {
        None
    }
}

impl FromIterator<Triangle> for TriangleList {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        TriangleList::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TriangleList {
    type Item = &'a Triangle;
    type IntoIter = std::slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}

#[cfg(test)]
mod test {
    use super::TriangleList;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};
    use crate::shape::{Plane, Triangle};

    fn floor() -> TriangleList {
        // A 4x4 square at z = 0, facing up.
        let a = Point::new(-2.0, -2.0, 0.0);
        let b = Point::new(2.0, -2.0, 0.0);
        let c = Point::new(2.0, 2.0, 0.0);
        let d = Point::new(-2.0, 2.0, 0.0);
        TriangleList::new(vec![Triangle::new(a, b, c), Triangle::new(a, c, d)])
    }

    fn box_planes(aabb: &Aabb) -> Vec<Plane> {
        let mut planes = Vec::new();
        for i in 0..3 {
            planes.push(Plane::new(Vector::ith_axis(i), aabb.maxs));
            planes.push(Plane::new(-Vector::ith_axis(i), aabb.mins));
        }
        planes
    }

    #[test]
    fn clip_by_planes_keeps_the_inside() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(0.5, 1.0, 1.0));
        let clipped = floor().clip_by_planes(&box_planes(&aabb));
        assert_relative_eq!(clipped.area(), 1.5 * 2.0, epsilon = 1.0e-9);
        assert_relative_eq!(
            clipped.centroid().unwrap(),
            Point::new(-0.25, 0.0, 0.0),
            epsilon = 1.0e-9
        );
    }

    #[test]
    fn box_sunk_into_the_floor() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -0.25), Point::new(1.0, 1.0, 1.75));
        let inter = floor()
            .collide_polytope(&box_planes(&aabb), &aabb.vertices())
            .unwrap();

        assert_relative_eq!(*inter.normal, -Vector::z(), epsilon = 1.0e-9);
        assert_relative_eq!(inter.depth, 0.25, epsilon = 1.0e-9);
        assert_relative_eq!(inter.point, Point::origin(), epsilon = 1.0e-9);
    }

    #[test]
    fn box_above_the_floor() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, 0.5), Point::new(1.0, 1.0, 1.5));
        assert!(floor()
            .collide_polytope(&box_planes(&aabb), &aabb.vertices())
            .is_none());
    }
}
