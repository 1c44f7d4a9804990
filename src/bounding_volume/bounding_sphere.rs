//! Bounding sphere.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Isometry, Point, Real};
use num::Zero;

/// A Bounding Sphere.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingSphere {
    /// The center of the bounding sphere.
    pub center: Point,
    /// The radius of the bounding sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    pub fn new(center: Point, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// The smallest sphere centered at the average of `pts` enclosing all of them.
    ///
    /// This is not the minimal enclosing sphere, but it is cheap and tight
    /// enough for broad-phase rejection.
    pub fn from_points(pts: &[Point]) -> BoundingSphere {
        let center = crate::utils::center(pts);
        let radius = pts
            .iter()
            .map(|pt| na::distance_squared(pt, &center))
            .fold(0.0, Real::max)
            .sqrt();
        BoundingSphere::new(center, radius)
    }

    /// Transforms this bounding sphere by `m`.
    #[inline]
    pub fn transform_by(&self, m: &Isometry) -> BoundingSphere {
        BoundingSphere::new(m * self.center, self.radius)
    }
}

impl BoundingVolume for BoundingSphere {
    #[inline]
    fn center(&self) -> Point {
        self.center
    }

    #[inline]
    fn intersects(&self, other: &BoundingSphere) -> bool {
        let delta_pos = other.center - self.center;
        let distance_squared = delta_pos.norm_squared();
        let sum_radius = self.radius + other.radius;

        distance_squared < sum_radius * sum_radius
    }

    #[inline]
    fn contains(&self, other: &BoundingSphere) -> bool {
        let delta_pos = other.center - self.center;
        let distance = delta_pos.norm();

        distance + other.radius <= self.radius
    }

    #[inline]
    fn merge(&mut self, other: &BoundingSphere) {
        *self = self.merged(other);
    }

    fn merged(&self, other: &BoundingSphere) -> BoundingSphere {
        let mut dir = other.center - self.center;
        let norm = dir.normalize_mut();

        if norm.is_zero() {
            BoundingSphere::new(self.center, self.radius.max(other.radius))
        } else if self.contains(other) {
            *self
        } else if other.contains(self) {
            *other
        } else {
            let left = self.center - dir * self.radius;
            let right = other.center + dir * other.radius;
            BoundingSphere::new(na::center(&left, &right), na::distance(&left, &right) * 0.5)
        }
    }

    #[inline]
    fn loosened(&self, amount: Real) -> BoundingSphere {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        BoundingSphere::new(self.center, self.radius + amount)
    }
}

#[cfg(test)]
mod test {
    use super::BoundingSphere;
    use crate::bounding_volume::BoundingVolume;
    use crate::math::Point;

    #[test]
    fn merged_sphere_contains_both() {
        let a = BoundingSphere::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = BoundingSphere::new(Point::new(3.0, 0.0, 0.0), 0.5);
        let m = a.merged(&b);
        assert!(m.contains(&a));
        assert!(m.contains(&b));
        assert_relative_eq!(m.radius, 2.25);
    }
}
