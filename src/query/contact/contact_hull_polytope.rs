use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, UnitVector, Vector};
use crate::query::sat::{self, PolytopeView};
use crate::query::Intersection;
use crate::shape::ConvexHull;

/// Intersection between a convex hull and an oriented box positioned by
/// `pos12` in the local-space of the hull.
pub fn contact_hull_aabb(pos12: &Isometry, hull: &ConvexHull, aabb: &Aabb) -> Option<Intersection> {
    let box_vertices = aabb.vertices();
    let axes: [UnitVector; 3] = [Vector::x_axis(), Vector::y_axis(), Vector::z_axis()];
    let box_view = PolytopeView {
        vertices: &box_vertices,
        face_directions: &axes,
        edge_directions: &axes,
    };

    contact_polytope_polytope(pos12, &hull.polytope_view(), &box_view)
}

/// Intersection between two convex hulls.
///
/// `hull2` is positioned by `pos12` in the local-space of `hull1`. The edge
/// axes tested are the cross products of the unique edge directions of
/// both hulls.
pub fn contact_hull_hull(
    pos12: &Isometry,
    hull1: &ConvexHull,
    hull2: &ConvexHull,
) -> Option<Intersection> {
    contact_polytope_polytope(pos12, &hull1.polytope_view(), &hull2.polytope_view())
}

/// Intersection between two convex polytopes, `poly2` being positioned by
/// `pos12` in the local-space of `poly1`.
pub fn contact_polytope_polytope(
    pos12: &Isometry,
    poly1: &PolytopeView,
    poly2: &PolytopeView,
) -> Option<Intersection> {
    let pen = sat::polytope_polytope_penetration(poly1, poly2, pos12)?;
    let vertices2: Vec<Point> = poly2.vertices.iter().map(|pt| pos12 * pt).collect();
    let point = sat::contact_point_from_features(&pen.normal, poly1.vertices, &vertices2);

    Some(Intersection::new(point, pen.normal, pen.depth))
}

#[cfg(test)]
mod test {
    use super::{contact_hull_aabb, contact_hull_hull};
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::query::details::contact_aabb_aabb;
    use crate::shape::ConvexHull;

    #[test]
    fn hull_of_a_box_matches_the_box() {
        let aabb = Aabb::new(Point::new(-1.0, -0.5, -2.0), Point::new(1.0, 0.5, 2.0));
        let hull = ConvexHull::from_aabb(&aabb);
        let pos12 = Isometry::new(Vector::new(1.2, 0.4, -0.3), Vector::new(0.2, -0.4, 0.9));

        let from_hull = contact_hull_aabb(&pos12, &hull, &aabb).unwrap();
        let from_box = contact_aabb_aabb(&pos12, &aabb, &aabb).unwrap();

        assert_relative_eq!(from_hull.depth, from_box.depth, epsilon = 1.0e-9);
        assert_relative_eq!(*from_hull.normal, *from_box.normal, epsilon = 1.0e-9);
    }

    #[test]
    fn separated_hulls() {
        let cube = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let hull = ConvexHull::from_aabb(&cube);
        let near = Isometry::translation(1.5, 0.0, 0.0);

        assert!(contact_hull_hull(&Isometry::translation(3.0, 0.0, 0.0), &hull, &hull).is_none());
        let inter = contact_hull_hull(&near, &hull, &hull).unwrap();
        assert_relative_eq!(inter.depth, 0.5, epsilon = 1.0e-9);
        assert_relative_eq!(*inter.normal, -Vector::x(), epsilon = 1.0e-9);
        assert_relative_eq!(inter.point.x, 0.75, epsilon = 1.0e-9);
    }

    #[test]
    fn unvalidated_hull_never_collides() {
        use crate::shape::DeferredArray;
        use std::sync::Arc;

        let pending = ConvexHull::from_deferred(
            DeferredArray::deferred(Arc::new(|| None)),
            DeferredArray::deferred(Arc::new(|| None)),
        );
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        assert!(!pending.validate());
        assert!(contact_hull_aabb(&Isometry::identity(), &pending, &aabb).is_none());
    }
}
