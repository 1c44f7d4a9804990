use crate::bounding_volume::Aabb;
use crate::math::{Real, Vector, DIM};
use crate::query::{Ray, RayCast, RayIntersection};

/// Intersects the line of `ray` with the three slabs of `aabb`.
///
/// Returns the `[tmin, tmax]` interval of the line parameters inside of the
/// box. The interval is inverted (`tmin > tmax`) when the line misses the box.
pub fn ray_aabb_slabs(aabb: &Aabb, ray: &Ray) -> (Real, Real) {
    let mut tmin = -Real::MAX;
    let mut tmax = Real::MAX;

    for i in 0..DIM {
        if ray.dir[i] == 0.0 {
            if ray.origin[i] < aabb.mins[i] || ray.origin[i] > aabb.maxs[i] {
                return (Real::MAX, -Real::MAX);
            }
        } else {
            let denom = 1.0 / ray.dir[i];
            let t1 = (aabb.mins[i] - ray.origin[i]) * denom;
            let t2 = (aabb.maxs[i] - ray.origin[i]) * denom;
            tmin = tmin.max(t1.min(t2));
            tmax = tmax.min(t1.max(t2));
        }
    }

    (tmin, tmax)
}

/// The outward normal of the face of `aabb` where the line parameter `t` leaves a slab.
fn slab_normal(aabb: &Aabb, ray: &Ray, t: Real, entering: bool) -> Vector {
    let pt = ray.point_at(t);
    let mut best = (Real::MAX, 0, 1.0);

    for i in 0..DIM {
        if ray.dir[i] != 0.0 {
            // The face hit is on the side opposite to the direction when entering.
            let sign = if entering == (ray.dir[i] > 0.0) { -1.0 } else { 1.0 };
            let face = if sign < 0.0 { aabb.mins[i] } else { aabb.maxs[i] };
            let gap = (pt[i] - face).abs();
            if gap < best.0 {
                best = (gap, i, sign);
            }
        }
    }

    Vector::ith(best.1, best.2)
}

impl RayCast for Aabb {
    fn cast_local_ray(
        &self,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
    ) -> Option<RayIntersection> {
        let (tmin, tmax) = ray_aabb_slabs(self, ray);

        if tmin > tmax || tmax < 0.0 {
            return None;
        }

        let (toi, normal) = if tmin >= 0.0 {
            (tmin, slab_normal(self, ray, tmin, true))
        } else if solid {
            (0.0, Vector::zeros())
        } else {
            (tmax, slab_normal(self, ray, tmax, false))
        };

        if toi <= max_time_of_impact {
            Some(RayIntersection::new(toi, ray.point_at(toi), normal))
        } else {
            None
        }
    }
}
