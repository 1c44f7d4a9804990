//! Traits and structure needed to cast rays.

use crate::math::{Isometry, Point, Real, Vector};

/// A Ray.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point,
    /// Direction of the ray.
    ///
    /// It does not have to be normalized. Times of impact are expressed in
    /// multiples of this vector.
    pub dir: Vector,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point, dir: Vector) -> Ray {
        Ray { origin, dir }
    }

    /// Transforms this ray by the given isometry.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Self::new(m * self.origin, m * self.dir)
    }

    /// Transforms this ray by the inverse of the given isometry.
    #[inline]
    pub fn inverse_transform_by(&self, m: &Isometry) -> Self {
        Self::new(
            m.inverse_transform_point(&self.origin),
            m.inverse_transform_vector(&self.dir),
        )
    }

    /// Computes the point at the given parameter on this line.
    ///
    /// This computes `self.origin + self.dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point {
        self.origin + self.dir * t
    }
}

/// Structure containing the result of a successful ray cast.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The time of impact of the ray with the object. The exact contact point can be computed
    /// with: `ray.point_at(time_of_impact)` or equivalently `origin + dir * time_of_impact` where
    /// `origin` is the origin of the ray; `dir` is its direction and `time_of_impact` is the
    /// value of this field.
    pub time_of_impact: Real,

    /// The hit point.
    pub point: Point,

    /// The normal at the intersection point.
    ///
    /// If the origin of the ray lies inside of the shape and the ray cast is
    /// solid, this is the zero vector.
    pub normal: Vector,
}

impl RayIntersection {
    /// Creates a new `RayIntersection`.
    #[inline]
    pub fn new(time_of_impact: Real, point: Point, normal: Vector) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            point,
            normal,
        }
    }

    /// Transforms `self.point` and `self.normal` by `transform`.
    #[inline]
    pub fn transform_by(&self, transform: &Isometry) -> Self {
        RayIntersection {
            time_of_impact: self.time_of_impact,
            point: transform * self.point,
            normal: transform * self.normal,
        }
    }
}

/// Traits of objects which can be transformed and tested for intersection with a ray.
pub trait RayCast {
    /// Computes the time of impact, and normal between this transformed shape and a ray.
    ///
    /// If `solid` is `true` and the ray origin lies inside of the shape, a hit at
    /// time `0.0` is reported. Otherwise the exit point is reported.
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool)
        -> Option<RayIntersection>;

    /// Tests whether a ray intersects this transformed shape.
    #[inline]
    fn intersects_local_ray(&self, ray: &Ray, max_time_of_impact: Real) -> bool {
        self.cast_local_ray(ray, max_time_of_impact, true).is_some()
    }

    /// Computes the time of impact and normal between this transformed shape and a ray.
    ///
    /// The returned point and normal are expressed in world-space.
    fn cast_ray(
        &self,
        m: &Isometry,
        ray: &Ray,
        max_time_of_impact: Real,
        solid: bool,
    ) -> Option<RayIntersection> {
        let ls_ray = ray.inverse_transform_by(m);
        self.cast_local_ray(&ls_ray, max_time_of_impact, solid)
            .map(|inter| inter.transform_by(m))
    }
}
