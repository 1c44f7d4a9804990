use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Point, Real, Vector};
use crate::query::{self, Intersection, Ray, RayCast, RayIntersection};

/// A sphere shape, with its own center.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
#[repr(C)]
pub struct Sphere {
    /// The center of the sphere, in the local-space of its owner.
    pub center: Point,
    /// The radius of the sphere.
    pub radius: Real,
}

impl Sphere {
    /// Creates a new sphere with the given center and radius.
    #[inline]
    pub fn new(center: Point, radius: Real) -> Sphere {
        Sphere { center, radius }
    }

    /// The axis-aligned box enclosing this sphere.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_half_extents(self.center, Vector::repeat(self.radius))
    }

    /// This sphere as a bounding sphere.
    #[inline]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }

    /// Is `pt` strictly inside of this sphere?
    #[inline]
    pub fn contains_point(&self, pt: &Point) -> bool {
        na::distance_squared(&self.center, pt) < self.radius * self.radius
    }

    /// This sphere moved by `m`.
    #[inline]
    #[must_use]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Sphere::new(m * self.center, self.radius)
    }

    /// Computes the penetration of another sphere positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_sphere(&self, other: &Sphere, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_sphere_sphere(pos12, self, other)
    }

    /// Computes the penetration of an oriented box positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_box(&self, other: &Aabb, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_sphere_aabb(pos12, self, other)
    }

    /// The nearest intersection between `ray` and this sphere, if any.
    #[inline]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        self.cast_local_ray(ray, Real::MAX, false)
    }
}
