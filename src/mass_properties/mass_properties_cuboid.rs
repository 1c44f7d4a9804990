use crate::bounding_volume::Aabb;
use crate::mass_properties::MassProperties;
use crate::math::{Point, PrincipalAngularInertia, Real, Vector};

impl MassProperties {
    pub(crate) fn cuboid_volume_unit_inertia(
        half_extents: Vector,
    ) -> (Real, PrincipalAngularInertia) {
        let volume = half_extents.x * half_extents.y * half_extents.z * 8.0;
        let ix = (half_extents.x * half_extents.x) / 3.0;
        let iy = (half_extents.y * half_extents.y) / 3.0;
        let iz = (half_extents.z * half_extents.z) / 3.0;

        (volume, Vector::new(iy + iz, ix + iz, ix + iy))
    }

    /// Computes the mass properties of a cuboid centered at the origin.
    pub fn from_cuboid(density: Real, half_extents: Vector) -> Self {
        let (vol, unit_i) = Self::cuboid_volume_unit_inertia(half_extents);
        let mass = vol * density;
        Self::new(Point::origin(), mass, unit_i * mass)
    }

    /// Computes the mass properties of a solid box of the given total mass.
    ///
    /// The center of mass is the center of the box. A zero mass gives
    /// infinitely heavy properties.
    pub fn from_aabb_with_mass(mass: Real, aabb: &Aabb) -> Self {
        let (_, unit_i) = Self::cuboid_volume_unit_inertia(aabb.half_extents());
        Self::new(aabb.center(), mass, unit_i * mass)
    }
}
