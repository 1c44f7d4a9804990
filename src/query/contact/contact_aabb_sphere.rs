use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real, UnitVector, Vector, DIM};
use crate::query::Intersection;
use crate::shape::Sphere;

/// Intersection between an oriented box and a sphere.
///
/// The sphere is positioned by `pos12` in the local-space of the box. The
/// result is closed-form: if the sphere center is outside of the box the
/// closest point of the box gives the normal, otherwise the sphere is
/// pushed out through the nearest face.
pub fn contact_aabb_sphere(pos12: &Isometry, aabb: &Aabb, sphere: &Sphere) -> Option<Intersection> {
    let center = pos12 * sphere.center;
    let radius = sphere.radius;
    let closest = Point::from(center.coords.sup(&aabb.mins.coords).inf(&aabb.maxs.coords));
    let delta = center - closest;
    let distance = delta.norm();

    if distance > 0.0 {
        if distance >= radius {
            return None;
        }

        let dir = UnitVector::new_unchecked(delta / distance);
        let deepest_sphere = center - *dir * radius;

        return Some(Intersection::new(
            na::center(&closest, &deepest_sphere),
            -dir,
            radius - distance,
        ));
    }

    // The center is inside of the box: find the face it is closest to.
    let mut best: (Real, usize, Real) = (Real::MAX, 0, 1.0);
    for i in 0..DIM {
        let to_max = aabb.maxs[i] - center[i];
        let to_min = center[i] - aabb.mins[i];

        if to_max < best.0 {
            best = (to_max, i, 1.0);
        }
        if to_min < best.0 {
            best = (to_min, i, -1.0);
        }
    }

    let (gap, i, sign) = best;
    let face_dir = Vector::ith(i, sign);
    let mut point = center;
    point[i] += sign * (gap - radius) * 0.5;

    Some(Intersection::new(
        point,
        -UnitVector::new_unchecked(face_dir),
        gap + radius,
    ))
}

/// Intersection between a sphere and an oriented box positioned by `pos12`
/// in the local-space of the sphere.
#[inline]
pub fn contact_sphere_aabb(pos12: &Isometry, sphere: &Sphere, aabb: &Aabb) -> Option<Intersection> {
    contact_aabb_sphere(&pos12.inverse(), aabb, sphere)
        .map(|inter| inter.transform_by(pos12).flipped())
}

#[cfg(test)]
mod test {
    use super::{contact_aabb_sphere, contact_sphere_aabb};
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::Sphere;

    fn unit_box() -> Aabb {
        Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn sphere_touching_a_face_from_outside() {
        let sphere = Sphere::new(Point::new(1.5, 0.0, 0.0), 1.0);
        let inter = contact_aabb_sphere(&Isometry::identity(), &unit_box(), &sphere).unwrap();

        assert_relative_eq!(inter.depth, 0.5);
        assert_relative_eq!(*inter.normal, -Vector::x());
        assert_relative_eq!(inter.point, Point::new(0.75, 0.0, 0.0));
    }

    #[test]
    fn sphere_center_inside_the_box() {
        let sphere = Sphere::new(Point::new(0.0, 0.0, 0.75), 0.5);
        let inter = contact_aabb_sphere(&Isometry::identity(), &unit_box(), &sphere).unwrap();

        assert_relative_eq!(inter.depth, 0.75);
        assert_relative_eq!(*inter.normal, -Vector::z());
        assert_relative_eq!(inter.point, Point::new(0.0, 0.0, 0.625));
    }

    #[test]
    fn reversed_query_negates_the_normal() {
        let sphere = Sphere::new(Point::origin(), 1.0);
        let pos12 = Isometry::new(Vector::new(0.0, 1.8, 0.0), Vector::new(0.0, 0.0, 0.3));
        let a = contact_aabb_sphere(&pos12, &unit_box(), &sphere).unwrap();
        let b = contact_sphere_aabb(&pos12.inverse(), &sphere, &unit_box()).unwrap();
        let b = b.transform_by(&pos12);

        assert_relative_eq!(a.depth, b.depth, epsilon = 1.0e-9);
        assert_relative_eq!(*a.normal, -*b.normal, epsilon = 1.0e-9);
        assert_relative_eq!(a.point, b.point, epsilon = 1.0e-9);
    }
}
