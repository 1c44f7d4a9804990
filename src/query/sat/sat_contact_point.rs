use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, UnitVector};
use crate::query::point::closest_points_segment_segment;
use smallvec::SmallVec;

const FEATURE_TOLERANCE: Real = 1.0e-6;

type Feature = SmallVec<[Point; 8]>;

/// Computes a contact point in the middle of the overlap of two polytopes
/// penetrating along `normal`.
///
/// `normal` points from the second polytope into the first one. The
/// supporting feature (vertex, edge or face) of each polytope along the
/// contact axis is extracted from its vertices; the point is then placed
/// at the center of the overlap of both features, halfway between them
/// along `normal`. All points must be given in the same space.
pub fn contact_point_from_features(
    normal: &UnitVector,
    vertices1: &[Point],
    vertices2: &[Point],
) -> Point {
    let proj = |pt: &Point| pt.coords.dot(normal);
    let s1 = vertices1.iter().map(proj).fold(Real::MAX, Real::min);
    let s2 = vertices2.iter().map(proj).fold(-Real::MAX, Real::max);
    let tol = FEATURE_TOLERANCE * (1.0 + s1.abs().max(s2.abs()));

    let feature1: Feature = vertices1
        .iter()
        .filter(|pt| proj(*pt) <= s1 + tol)
        .copied()
        .collect();
    let feature2: Feature = vertices2
        .iter()
        .filter(|pt| proj(*pt) >= s2 - tol)
        .copied()
        .collect();

    let tangent_center = match (feature1.as_slice(), feature2.as_slice()) {
        (_, [vtx]) | ([vtx], _) => *vtx,
        ([a1, b1], [a2, b2]) => {
            let (p1, p2) = closest_points_segment_segment(a1, b1, a2, b2);
            na::center(&p1, &p2)
        }
        _ => {
            let flatten = |pt: &Point| pt - normal.into_inner() * proj(pt);
            let aabb1 = Aabb::from_points(feature1.iter().map(flatten));
            let aabb2 = Aabb::from_points(feature2.iter().map(flatten));

            match aabb1.intersection(&aabb2) {
                Some(overlap) => overlap.center(),
                None => na::center(&aabb1.center(), &aabb2.center()),
            }
        }
    };

    tangent_center + normal.into_inner() * ((s1 + s2) * 0.5 - proj(&tangent_center))
}

#[cfg(test)]
mod test {
    use super::contact_point_from_features;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};

    #[test]
    fn small_box_resting_on_large_box() {
        let large = Aabb::new(Point::new(-10.0, -10.0, -1.0), Point::new(10.0, 10.0, 0.0));
        let small = Aabb::new(Point::new(7.0, 7.0, -0.5), Point::new(9.0, 9.0, 1.5));
        // The large box has to move down to separate from the small one.
        let pt = contact_point_from_features(
            &-Vector::z_axis(),
            &large.vertices(),
            &small.vertices(),
        );

        assert_relative_eq!(pt, Point::new(8.0, 8.0, -0.25), epsilon = 1.0e-9);
    }
}
