use crate::math::{AngVector, AngularInertia, Isometry, Matrix, Point, Real, Rotation};
use crate::utils;
use num::Zero;

const EPSILON: Real = f32::EPSILON as Real;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// The local mass properties of a rigid-body.
pub struct MassProperties {
    /// The center of mass of a rigid-body expressed in its local-space.
    pub local_com: Point,
    /// The inverse of the mass of a rigid-body.
    ///
    /// If this is zero, the rigid-body is assumed to have infinite mass.
    pub inv_mass: Real,
    /// The inverse of the principal angular inertia of the rigid-body.
    ///
    /// Components set to zero are assumed to be infinite along the corresponding principal axis.
    pub inv_principal_inertia: AngVector,
    /// The principal vectors of the local angular inertia tensor of the rigid-body.
    pub principal_inertia_local_frame: Rotation,
}

impl MassProperties {
    /// Initializes the mass properties from the given center-of-mass, mass, and principal angular inertia.
    ///
    /// The center-of-mass is specified in the local-space of the rigid-body.
    /// The principal angular inertia are the angular inertia along the coordinate axes in the local-space
    /// of the rigid-body.
    pub fn new(local_com: Point, mass: Real, principal_inertia: AngVector) -> Self {
        Self::with_principal_inertia_frame(local_com, mass, principal_inertia, Rotation::identity())
    }

    /// Initializes the mass properties from the given center-of-mass, mass, and principal angular inertia.
    ///
    /// The principal angular inertia are the angular inertia along the coordinate axes defined by
    /// the `principal_inertia_local_frame` expressed in the local-space of the rigid-body.
    pub fn with_principal_inertia_frame(
        local_com: Point,
        mass: Real,
        principal_inertia: AngVector,
        principal_inertia_local_frame: Rotation,
    ) -> Self {
        Self {
            local_com,
            inv_mass: utils::inv(mass),
            inv_principal_inertia: principal_inertia.map(utils::inv),
            principal_inertia_local_frame,
        }
    }

    /// Initialize a new `MassProperties` from a given center-of-mass, mass, and angular inertia matrix.
    ///
    /// The angular inertia matrix will be diagonalized in order to extract the principal inertia
    /// values and principal inertia frame.
    pub fn with_inertia_matrix(local_com: Point, mass: Real, inertia: Matrix) -> Self {
        let eigen = inertia.symmetric_eigen();
        let principal_inertia_local_frame =
            Rotation::from_matrix_eps(&eigen.eigenvectors, 1.0e-6, 10, na::one());
        // Drop negative eigenvalues.
        let principal_inertia = eigen.eigenvalues.map(|e| if e < EPSILON { 0.0 } else { e });

        Self::with_principal_inertia_frame(
            local_com,
            mass,
            principal_inertia,
            principal_inertia_local_frame,
        )
    }

    /// The mass of the rigid-body, zero if it is infinite.
    #[inline]
    pub fn mass(&self) -> Real {
        utils::inv(self.inv_mass)
    }

    /// The angular inertia along the principal axes.
    #[inline]
    pub fn principal_inertia(&self) -> AngVector {
        self.inv_principal_inertia.map(utils::inv)
    }

    /// The world-space center of mass of the rigid-body.
    pub fn world_com(&self, pos: &Isometry) -> Point {
        pos * self.local_com
    }

    /// The inverse angular inertia tensor in the local-space of the rigid-body.
    pub fn local_inv_inertia(&self) -> AngularInertia {
        self.world_inv_inertia(&Rotation::identity())
    }

    /// The world-space inverse angular inertia tensor of the rigid-body.
    pub fn world_inv_inertia(&self, rot: &Rotation) -> AngularInertia {
        if self.inv_principal_inertia.is_zero() {
            return AngularInertia::zero();
        }

        let frame = (rot * self.principal_inertia_local_frame)
            .to_rotation_matrix()
            .into_inner();
        AngularInertia::from_principal(self.inv_principal_inertia).quadform(&frame)
    }

    /// Transform each element of the mass properties.
    pub fn transform_by(&self, m: &Isometry) -> Self {
        // NOTE: we don't apply the parallel axis theorem here
        // because the center of mass is also transformed.
        Self {
            local_com: m * self.local_com,
            inv_mass: self.inv_mass,
            inv_principal_inertia: self.inv_principal_inertia,
            principal_inertia_local_frame: m.rotation * self.principal_inertia_local_frame,
        }
    }

    /// Changes the mass on these mass-properties.
    ///
    /// With `adjust_angular_inertia`, the angular inertia is scaled by
    /// `new_mass / prev_mass`, as for a body made of the same shape with a
    /// different density.
    pub fn set_mass(&mut self, new_mass: Real, adjust_angular_inertia: bool) {
        let new_inv_mass = utils::inv(new_mass);

        if adjust_angular_inertia {
            let curr_mass = utils::inv(self.inv_mass);
            self.inv_principal_inertia *= new_inv_mass * curr_mass;
        }

        self.inv_mass = new_inv_mass;
    }
}

impl Zero for MassProperties {
    fn zero() -> Self {
        Self {
            inv_mass: 0.0,
            inv_principal_inertia: na::zero(),
            principal_inertia_local_frame: Rotation::identity(),
            local_com: Point::origin(),
        }
    }

    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl std::ops::Add<MassProperties> for MassProperties {
    type Output = Self;

    fn add(self, other: MassProperties) -> Self {
        if self.is_zero() {
            return other;
        } else if other.is_zero() {
            return self;
        }

        let m1 = self.mass();
        let m2 = other.mass();
        let inv_mass = utils::inv(m1 + m2);
        let local_com = (self.local_com * m1 + other.local_com.coords * m2) * inv_mass;
        let i1 = self.shifted_inertia_matrix(local_com - self.local_com);
        let i2 = other.shifted_inertia_matrix(local_com - other.local_com);
        Self::with_inertia_matrix(local_com, m1 + m2, i1 + i2)
    }
}

impl MassProperties {
    fn inertia_matrix(&self) -> Matrix {
        let frame = self.principal_inertia_local_frame.to_rotation_matrix().into_inner();
        AngularInertia::from_principal(self.principal_inertia())
            .quadform(&frame)
            .into_matrix()
    }

    /// The inertia tensor about a point displaced by `shift` from the center of mass.
    fn shifted_inertia_matrix(&self, shift: crate::math::Vector) -> Matrix {
        let matrix = self.inertia_matrix();

        if self.inv_mass != 0.0 {
            let diag = Matrix::from_diagonal_element(shift.norm_squared());
            matrix + (diag - shift * shift.transpose()) * self.mass()
        } else {
            matrix
        }
    }
}
