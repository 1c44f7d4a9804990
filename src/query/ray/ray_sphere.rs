use crate::math::{Point, Real};
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::Sphere;

impl RayCast for Sphere {
    #[inline]
    fn cast_local_ray(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
    ) -> Option<RayIntersection> {
        let (inside, toi) = ray_toi_with_sphere(&self.center, self.radius, ray, solid);
        let toi = toi.filter(|toi| *toi <= max_time_of_impact)?;
        let point = ray.point_at(toi);

        let normal = if inside && solid {
            na::zero()
        } else {
            (point - self.center) / self.radius
        };

        Some(RayIntersection::new(toi, point, normal))
    }
}

/// Computes the time of impact of a ray on a sphere.
///
/// Negative roots are discarded: when the ray starts outside of the sphere
/// the entry point is returned, otherwise either `0.0` (if `solid`) or the
/// exit point. The first result element is `true` if the ray started inside
/// of the sphere.
#[inline]
pub fn ray_toi_with_sphere(
    center: &Point,
    radius: Real,
    ray: &Ray,
    solid: bool,
) -> (bool, Option<Real>) {
    let dcenter = ray.origin - *center;

    let a = ray.dir.norm_squared();
    let b = dcenter.dot(&ray.dir);
    let c = dcenter.norm_squared() - radius * radius;

    // Special case for when the dir is zero.
    if a == 0.0 {
        return if c > 0.0 { (false, None) } else { (true, Some(0.0)) };
    }

    if c > 0.0 && b > 0.0 {
        return (false, None);
    }

    let delta = b * b - a * c;

    if delta < 0.0 {
        // no solution
        return (false, None);
    }

    let t = (-b - delta.sqrt()) / a;

    if t <= 0.0 {
        // origin inside of the sphere
        if solid {
            (true, Some(0.0))
        } else {
            (true, Some((-b + delta.sqrt()) / a))
        }
    } else {
        (false, Some(t))
    }
}
