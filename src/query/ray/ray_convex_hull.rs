use crate::math::{Real, UnitVector};
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::ConvexHull;

impl RayCast for ConvexHull {
    /// Clips the ray by every face plane of the hull (Cyrus-Beck).
    fn cast_local_ray(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
    ) -> Option<RayIntersection> {
        let planes = self.planes();
        if planes.is_empty() {
            return None;
        }

        let mut enter: (Real, Option<UnitVector>) = (-Real::MAX, None);
        let mut exit: (Real, Option<UnitVector>) = (Real::MAX, None);

        for plane in planes {
            let dist = plane.signed_distance(&ray.origin);
            let denom = plane.normal.dot(&ray.dir);

            if denom == 0.0 {
                // Parallel to the face: entirely inside or entirely outside of its half-space.
                if dist > 0.0 {
                    return None;
                }
                continue;
            }

            let t = -dist / denom;

            if denom < 0.0 {
                if t > enter.0 {
                    enter = (t, Some(plane.normal));
                }
            } else if t < exit.0 {
                exit = (t, Some(plane.normal));
            }

            if enter.0 > exit.0 {
                return None;
            }
        }

        match (enter, exit) {
            ((t, Some(normal)), _) if t >= 0.0 => (t <= max_time_of_impact)
                .then(|| RayIntersection::new(t, ray.point_at(t), *normal)),
            (_, (t, _)) if t < 0.0 => None,
            _ if solid => Some(RayIntersection::new(0.0, ray.origin, na::zero())),
            (_, (t, Some(normal))) => (t <= max_time_of_impact)
                .then(|| RayIntersection::new(t, ray.point_at(t), *normal)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};
    use crate::shape::ConvexHull;

    fn cube() -> ConvexHull {
        ConvexHull::from_aabb(&Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0)))
    }

    #[test]
    fn ray_enters_through_the_facing_face() {
        let ray = Ray::new(Point::new(-5.0, 0.2, 0.3), Vector::x());
        let hit = cube().cast_local_ray(&ray, Real::MAX, true).unwrap();
        assert_relative_eq!(hit.time_of_impact, 4.0, epsilon = 1.0e-9);
        assert_relative_eq!(hit.normal, -Vector::x(), epsilon = 1.0e-9);
    }

    #[test]
    fn ray_from_inside() {
        let ray = Ray::new(Point::origin(), Vector::z());
        let hull = cube();

        let solid = hull.cast_local_ray(&ray, Real::MAX, true).unwrap();
        assert_eq!(solid.time_of_impact, 0.0);

        let hollow = hull.cast_local_ray(&ray, Real::MAX, false).unwrap();
        assert_relative_eq!(hollow.time_of_impact, 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(hollow.normal, Vector::z(), epsilon = 1.0e-9);
    }

    #[test]
    fn ray_misses() {
        let hull = cube();
        assert!(hull
            .cast_local_ray(&Ray::new(Point::new(-5.0, 2.0, 0.0), Vector::x()), Real::MAX, true)
            .is_none());
        assert!(hull
            .cast_local_ray(&Ray::new(Point::new(5.0, 0.0, 0.0), Vector::x()), Real::MAX, true)
            .is_none());
        assert!(hull
            .cast_local_ray(&Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x()), 3.0, true)
            .is_none());
    }
}
