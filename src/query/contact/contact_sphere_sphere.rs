use crate::math::{Isometry, UnitVector, Vector};
use crate::query::Intersection;
use crate::shape::Sphere;

/// Intersection between two spheres.
///
/// `sphere2` is positioned by `pos12` in the local-space of `sphere1`.
/// Touching spheres do not intersect.
#[inline]
pub fn contact_sphere_sphere(
    pos12: &Isometry,
    sphere1: &Sphere,
    sphere2: &Sphere,
) -> Option<Intersection> {
    let center2 = pos12 * sphere2.center;
    let delta = center2 - sphere1.center;
    let distance = delta.norm();
    let sum_radius = sphere1.radius + sphere2.radius;

    if distance >= sum_radius {
        return None;
    }

    // Concentric spheres separate along an arbitrary axis.
    let dir = delta.try_normalize(0.0).unwrap_or_else(Vector::x);
    let deepest1 = sphere1.center + dir * sphere1.radius;
    let deepest2 = center2 - dir * sphere2.radius;

    Some(Intersection::new(
        na::center(&deepest1, &deepest2),
        -UnitVector::new_unchecked(dir),
        sum_radius - distance,
    ))
}
