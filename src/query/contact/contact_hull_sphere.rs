use crate::math::{Isometry, Point, Real, UnitVector};
use crate::query::Intersection;
use crate::shape::{ConvexHull, Sphere};

/// Intersection between a convex hull and a sphere positioned by `pos12` in
/// the local-space of the hull.
///
/// If the sphere center is outside of the hull, the closest point of the
/// boundary is searched for on every triangle (face interior first, then
/// edges, then vertices). If it is inside, the sphere is pushed out through
/// the face it is the closest to.
pub fn contact_hull_sphere(
    pos12: &Isometry,
    hull: &ConvexHull,
    sphere: &Sphere,
) -> Option<Intersection> {
    let planes = hull.planes();

    if planes.is_empty() {
        return None;
    }

    let center = pos12 * sphere.center;
    let radius = sphere.radius;

    // The face plane the center is the least deep below.
    let (escape, escape_dist) = planes
        .iter()
        .map(|p| (p, p.signed_distance(&center)))
        .fold((&planes[0], -Real::MAX), |best, curr| if curr.1 > best.1 { curr } else { best });

    if escape_dist >= radius {
        // Separated by a face plane.
        return None;
    }

    if escape_dist < 0.0 {
        let normal = escape.normal;
        let depth = radius - escape_dist;
        let point = center - *normal * ((escape_dist + radius) * 0.5);
        return Some(Intersection::new(point, -normal, depth));
    }

    let closest = closest_boundary_point(hull, &center)?;
    let delta = center - closest;
    let distance = delta.norm();

    if distance >= radius {
        return None;
    }

    let dir = UnitVector::try_new(delta, 0.0).unwrap_or(escape.normal);
    let deepest_sphere = center - *dir * radius;

    Some(Intersection::new(
        na::center(&closest, &deepest_sphere),
        -dir,
        radius - distance,
    ))
}

fn closest_boundary_point(hull: &ConvexHull, pt: &Point) -> Option<Point> {
    (0..hull.indices().len())
        .map(|i| hull.triangle(i).closest_point(pt).0)
        .min_by(|a, b| {
            na::distance_squared(a, pt).total_cmp(&na::distance_squared(b, pt))
        })
}

#[cfg(test)]
mod test {
    use super::contact_hull_sphere;
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::{ConvexHull, Sphere};

    fn cube() -> ConvexHull {
        ConvexHull::from_aabb(&Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn sphere_near_a_face_edge_and_vertex() {
        let hull = cube();

        let face = Sphere::new(Point::new(0.2, 0.3, 1.5), 1.0);
        let inter = contact_hull_sphere(&Isometry::identity(), &hull, &face).unwrap();
        assert_relative_eq!(inter.depth, 0.5, epsilon = 1.0e-9);
        assert_relative_eq!(*inter.normal, -Vector::z(), epsilon = 1.0e-9);

        let edge = Sphere::new(Point::new(1.5, 0.0, 1.5), 1.0);
        let inter = contact_hull_sphere(&Isometry::identity(), &hull, &edge).unwrap();
        let expected = Vector::new(-1.0, 0.0, -1.0).normalize();
        assert_relative_eq!(inter.depth, 1.0 - 0.5 * 2.0f64.sqrt(), epsilon = 1.0e-9);
        assert_relative_eq!(*inter.normal, expected, epsilon = 1.0e-9);

        let vertex = Sphere::new(Point::new(1.5, 1.5, 1.5), 1.0);
        assert!(contact_hull_sphere(&Isometry::identity(), &hull, &vertex).is_some());
        let far_vertex = Sphere::new(Point::new(1.6, 1.6, 1.6), 1.0);
        assert!(contact_hull_sphere(&Isometry::identity(), &hull, &far_vertex).is_none());
    }

    #[test]
    fn sphere_centered_inside_escapes_through_nearest_face() {
        let hull = cube();
        let sphere = Sphere::new(Point::new(0.0, -0.8, 0.1), 0.5);
        let inter = contact_hull_sphere(&Isometry::identity(), &hull, &sphere).unwrap();

        assert_relative_eq!(inter.depth, 0.7, epsilon = 1.0e-9);
        assert_relative_eq!(*inter.normal, Vector::y(), epsilon = 1.0e-9);
    }
}
