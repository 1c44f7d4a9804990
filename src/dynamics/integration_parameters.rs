use crate::math::Real;

/// The velocity damping applied per second to bodies under gravity.
pub const DEFAULT_DAMPING: Real = 0.1;

/// Parameters of a [`Physics`](crate::dynamics::Physics) time step.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegrationParameters {
    /// The number of sub-steps of each call to `Physics::resolve` (default: `10`).
    pub num_substeps: usize,
    /// Fraction of the velocities removed per second of simulation on bodies
    /// subject to gravity (default: `0.1`).
    pub damping: Real,
    /// Fraction of the distance to its goal an end effector covers at each
    /// sub-step (default: `0.5`).
    pub ik_gain: Real,
    /// Largest displacement of an end effector in one sub-step (default: `0.1`).
    pub ik_max_translation: Real,
    /// Largest rotation applied to a joint of an inverse-kinematics chain in
    /// one sub-step, in radians (default: `0.05`).
    pub ik_max_rotation: Real,
    /// Tangential displacements shorter than this are cancelled on contact
    /// when friction is enabled (default: `0.01`).
    pub friction_threshold: Real,
    /// Lower bound of the spatial hash cell size (default: `1.0`).
    pub min_bucket_size: Real,
}

impl IntegrationParameters {
    /// The duration of one sub-step of a `resolve` call.
    #[inline]
    pub fn substep_dt(&self, speed: Real, time_step: Real) -> Real {
        speed * time_step / self.num_substeps.max(1) as Real
    }
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            num_substeps: 10,
            damping: DEFAULT_DAMPING,
            ik_gain: 0.5,
            ik_max_translation: 0.1,
            ik_max_rotation: 0.05,
            friction_threshold: 0.01,
            min_bucket_size: 1.0,
        }
    }
}
