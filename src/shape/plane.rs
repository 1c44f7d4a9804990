use crate::math::{Isometry, Point, Real, UnitVector};
use crate::query::Ray;

/// An infinite plane, given by a point and a unit normal.
///
/// The normal side of the plane is the "outside": points with a positive
/// signed distance are above the plane.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Plane {
    /// The plane normal.
    pub normal: UnitVector,
    /// A point on the plane.
    pub point: Point,
}

impl Plane {
    /// Builds a new plane from its normal and one of its points.
    #[inline]
    pub fn new(normal: UnitVector, point: Point) -> Plane {
        Plane { normal, point }
    }

    /// The signed distance from the plane to `pt`, positive above the plane.
    #[inline]
    pub fn signed_distance(&self, pt: &Point) -> Real {
        (pt - self.point).dot(&self.normal)
    }

    /// The orthogonal projection of `pt` on this plane.
    #[inline]
    pub fn project_point(&self, pt: &Point) -> Point {
        pt - *self.normal * self.signed_distance(pt)
    }

    /// This plane moved by `m`.
    #[inline]
    #[must_use]
    pub fn transform_by(&self, m: &Isometry) -> Self {
        Plane::new(m * self.normal, m * self.point)
    }

    /// The parameter where the line of `ray` crosses this plane, including
    /// negative parameters (intersections behind the ray origin).
    ///
    /// Returns `None` if the ray is parallel to the plane.
    #[inline]
    pub fn extended_ray_intersection(&self, ray: &Ray) -> Option<Real> {
        let dpos = self.point - ray.origin;
        let denom = self.normal.dot(&ray.dir);

        if denom == 0.0 {
            None
        } else {
            Some(self.normal.dot(&dpos) / denom)
        }
    }

    /// The time of impact of `ray` with this plane, if it is not negative.
    #[inline]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Real> {
        self.extended_ray_intersection(ray).filter(|t| *t >= 0.0)
    }
}

#[cfg(test)]
mod test {
    use super::Plane;
    use crate::math::{Point, Vector};
    use crate::query::Ray;

    #[test]
    fn signed_distance_and_rays() {
        let plane = Plane::new(Vector::z_axis(), Point::new(0.0, 0.0, 1.0));
        assert_relative_eq!(plane.signed_distance(&Point::new(3.0, 2.0, 4.0)), 3.0);
        assert_relative_eq!(
            plane.project_point(&Point::new(3.0, 2.0, 4.0)),
            Point::new(3.0, 2.0, 1.0)
        );

        let ray = Ray::new(Point::new(0.0, 0.0, 3.0), Vector::z());
        assert!(plane.ray_intersection(&ray).is_none());
        assert_relative_eq!(plane.extended_ray_intersection(&ray).unwrap(), -2.0);

        let parallel = Ray::new(Point::new(0.0, 0.0, 3.0), Vector::x());
        assert!(plane.extended_ray_intersection(&parallel).is_none());
    }
}
