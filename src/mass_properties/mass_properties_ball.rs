use crate::mass_properties::MassProperties;
use crate::math::{Point, PrincipalAngularInertia, Real, Vector};
use na::RealField;

impl MassProperties {
    pub(crate) fn ball_volume_unit_angular_inertia(
        radius: Real,
    ) -> (Real, PrincipalAngularInertia) {
        let volume = Real::pi() * radius * radius * radius * 4.0 / 3.0;
        let i = radius * radius * 2.0 / 5.0;

        (volume, Vector::repeat(i))
    }

    /// Computes the mass properties of a solid sphere centered at the origin.
    ///
    /// The moment of inertia is `2/5 * mass * radius²` about every axis.
    pub fn from_ball(density: Real, radius: Real) -> Self {
        let (vol, unit_i) = Self::ball_volume_unit_angular_inertia(radius);
        let mass = vol * density;
        Self::new(Point::origin(), mass, unit_i * mass)
    }
}
