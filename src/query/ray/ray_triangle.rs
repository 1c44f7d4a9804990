use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::Triangle;

impl RayCast for Triangle {
    #[inline]
    fn cast_local_ray(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        _: bool,
    ) -> Option<RayIntersection> {
        let inter = local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray, false)?.0;

        if inter.time_of_impact <= max_time_of_impact {
            Some(inter)
        } else {
            None
        }
    }
}

/// Computes the intersection between a triangle and a ray.
///
/// The triangle is two-sided and the returned normal faces the ray origin.
/// If `extended` is `true` the whole line of the ray is considered and
/// intersections behind the origin (negative times of impact) are reported too.
///
/// If an intersection is found, the time of impact, the normal and the barycentric coordinates of
/// the intersection point are returned.
pub fn local_ray_intersection_with_triangle(
    a: &Point,
    b: &Point,
    c: &Point,
    ray: &Ray,
    extended: bool,
) -> Option<(RayIntersection, Vector)> {
    let ab = *b - *a;
    let ac = *c - *a;

    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    // the normal and the ray direction are orthogonal
    if d == 0.0 {
        return None;
    }

    let ap = ray.origin - *a;
    let t = -ap.dot(&n) / d;

    if t < 0.0 && !extended {
        return None;
    }

    let point = ray.point_at(t);
    let bcoords = barycentric_coordinates(a, &ab, &ac, &n, &point)?;
    let normal = if d < 0.0 { n } else { -n };
    let normal = normal.try_normalize(0.0)?;

    Some((RayIntersection::new(t, point, normal), bcoords))
}

/// Barycentric coordinates of `pt` (assumed to lie on the triangle plane) if
/// it lies inside the triangle `(a, a + ab, a + ac)` with scaled normal `n`.
fn barycentric_coordinates(
    a: &Point,
    ab: &Vector,
    ac: &Vector,
    n: &Vector,
    pt: &Point,
) -> Option<Vector> {
    let n2 = n.norm_squared();
    let ap = *pt - *a;
    let v = ap.cross(ac).dot(n) / n2;
    let w = ab.cross(&ap).dot(n) / n2;
    let u = 1.0 - v - w;

    if u < 0.0 || v < 0.0 || w < 0.0 {
        None
    } else {
        Some(Vector::new(u, v, w))
    }
}
