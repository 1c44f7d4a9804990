use crate::math::{Isometry, Real, Vector};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
/// The degrees of freedom limited by a [`Constraint`].
///
/// A limited axis with no range is locked, a limited axis with a range
/// may move inside of it, and an axis that is not limited is free.
pub struct LimitFlags(u8);

bitflags::bitflags! {
    impl LimitFlags: u8 {
        /// Translation along the local `x` axis of the first pivot.
        const TRANSLATION_X = 1 << 0;
        /// Translation along the local `y` axis of the first pivot.
        const TRANSLATION_Y = 1 << 1;
        /// Translation along the local `z` axis of the first pivot.
        const TRANSLATION_Z = 1 << 2;
        /// Rotation about the local `x` axis of the first pivot.
        const ROTATION_X = 1 << 3;
        /// Rotation about the local `y` axis of the first pivot.
        const ROTATION_Y = 1 << 4;
        /// Rotation about the local `z` axis of the first pivot.
        const ROTATION_Z = 1 << 5;
        /// The three translations.
        const TRANSLATION = Self::TRANSLATION_X.bits()
            | Self::TRANSLATION_Y.bits()
            | Self::TRANSLATION_Z.bits();
        /// The three rotations.
        const ROTATION =
            Self::ROTATION_X.bits() | Self::ROTATION_Y.bits() | Self::ROTATION_Z.bits();
    }
}

impl LimitFlags {
    /// The flag of the `i`-th translation axis.
    #[inline]
    pub fn translation_axis(i: usize) -> Self {
        Self::from_bits_truncate(1 << i)
    }

    /// The flag of the `i`-th rotation axis.
    #[inline]
    pub fn rotation_axis(i: usize) -> Self {
        Self::from_bits_truncate(1 << (i + 3))
    }
}

/// Errors raised when building or registering a [`Constraint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConstraintError {
    /// Both ends of the constraint are the same body.
    #[error("body `{0}` cannot be constrained to itself")]
    SameBody(String),
    /// The constraint references a body that does not exist.
    #[error("no rigid body named `{0}`")]
    UnknownBody(String),
    /// An axis index greater than 2.
    #[error("invalid axis index {0}")]
    InvalidAxis(usize),
    /// A range whose lower bound exceeds its upper bound.
    #[error("invalid range [{min}, {max}] on axis {axis}")]
    InvalidRange {
        /// The axis index.
        axis: usize,
        /// The lower bound.
        min: Real,
        /// The upper bound.
        max: Real,
    },
}

/// How a [`Constraint`] restricts one axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AxisLimit {
    /// The axis is not constrained.
    Free,
    /// The axis is fixed at zero.
    Locked,
    /// The axis is bounded by `[min, max]`.
    Ranged(Real, Real),
}

impl AxisLimit {
    /// The value closest to `value` allowed by this limit.
    #[inline]
    pub fn clamp(self, value: Real) -> Real {
        match self {
            AxisLimit::Free => value,
            AxisLimit::Locked => 0.0,
            AxisLimit::Ranged(min, max) => value.clamp(min, max),
        }
    }
}

/// A joint between two rigid bodies.
///
/// Each body carries a pivot frame, expressed in its local-space. The
/// constraint limits the motion of the second pivot relative to the first
/// one, axis by axis. Bodies are referenced by name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constraint {
    /// The name of the first body.
    pub body1: String,
    /// The name of the second body.
    pub body2: String,
    /// The pivot frame on the first body.
    pub frame1: Isometry,
    /// The pivot frame on the second body.
    pub frame2: Isometry,
    /// The limited degrees of freedom.
    pub limits: LimitFlags,
    /// Allowed translation range per axis, in the first pivot frame.
    pub translation_ranges: [Option<[Real; 2]>; 3],
    /// Allowed rotation range per axis, as Euler angles in radians.
    pub rotation_ranges: [Option<[Real; 2]>; 3],
    /// Springiness of the joint. Not used by the solver.
    pub springiness: Real,
    /// Stiffness of the joint. Not used by the solver.
    pub stiffness: Real,
}

impl Constraint {
    /// A constraint between the pivot `frame1` of `body1` and `frame2` of `body2`.
    pub fn new(
        body1: impl Into<String>,
        frame1: Isometry,
        body2: impl Into<String>,
        frame2: Isometry,
        limits: LimitFlags,
    ) -> Self {
        Self {
            body1: body1.into(),
            body2: body2.into(),
            frame1,
            frame2,
            limits,
            translation_ranges: [None; 3],
            rotation_ranges: [None; 3],
            springiness: 0.0,
            stiffness: 0.0,
        }
    }

    /// A ball joint: the pivots coincide, rotations are free.
    pub fn ball(
        body1: impl Into<String>,
        frame1: Isometry,
        body2: impl Into<String>,
        frame2: Isometry,
    ) -> Self {
        Self::new(body1, frame1, body2, frame2, LimitFlags::TRANSLATION)
    }

    /// A fixed joint: the pivot frames coincide.
    pub fn fixed(
        body1: impl Into<String>,
        frame1: Isometry,
        body2: impl Into<String>,
        frame2: Isometry,
    ) -> Self {
        Self::new(body1, frame1, body2, frame2, LimitFlags::all())
    }

    /// Limits the translation along `axis` to `[min, max]`.
    pub fn with_translation_range(
        mut self,
        axis: usize,
        min: Real,
        max: Real,
    ) -> Result<Self, ConstraintError> {
        check_range(axis, min, max)?;
        self.limits |= LimitFlags::translation_axis(axis);
        self.translation_ranges[axis] = Some([min, max]);
        Ok(self)
    }

    /// Limits the rotation about `axis` to `[min, max]` radians.
    pub fn with_rotation_range(
        mut self,
        axis: usize,
        min: Real,
        max: Real,
    ) -> Result<Self, ConstraintError> {
        check_range(axis, min, max)?;
        self.limits |= LimitFlags::rotation_axis(axis);
        self.rotation_ranges[axis] = Some([min, max]);
        Ok(self)
    }

    /// Sets the springiness and stiffness of this joint.
    pub fn with_springiness(mut self, springiness: Real, stiffness: Real) -> Self {
        self.springiness = springiness;
        self.stiffness = stiffness;
        self
    }

    /// Does this constraint involve the body named `name`?
    #[inline]
    pub fn involves(&self, name: &str) -> bool {
        self.body1 == name || self.body2 == name
    }

    /// The limit of the translation along `axis`.
    pub fn translation_limit(&self, axis: usize) -> AxisLimit {
        axis_limit(
            self.limits.contains(LimitFlags::translation_axis(axis)),
            self.translation_ranges[axis],
        )
    }

    /// The limit of the rotation about `axis`.
    pub fn rotation_limit(&self, axis: usize) -> AxisLimit {
        axis_limit(
            self.limits.contains(LimitFlags::rotation_axis(axis)),
            self.rotation_ranges[axis],
        )
    }

    /// The translation closest to `translation` allowed by this constraint.
    pub fn clamp_translation(&self, translation: &Vector) -> Vector {
        Vector::from_fn(|i, _| self.translation_limit(i).clamp(translation[i]))
    }

    /// The Euler angles closest to `(roll, pitch, yaw)` allowed by this constraint.
    pub fn clamp_rotation(&self, angles: (Real, Real, Real)) -> (Real, Real, Real) {
        (
            self.rotation_limit(0).clamp(angles.0),
            self.rotation_limit(1).clamp(angles.1),
            self.rotation_limit(2).clamp(angles.2),
        )
    }

    /// Are the two pivots held together on every axis?
    pub fn locks_translation(&self) -> bool {
        (0..3).all(|i| self.translation_limit(i) == AxisLimit::Locked)
    }

    /// The number of rotation axes fixed at zero.
    pub fn num_locked_rotations(&self) -> usize {
        (0..3)
            .filter(|i| self.rotation_limit(*i) == AxisLimit::Locked)
            .count()
    }

    /// Is any rotation axis bounded by a range?
    pub fn has_rotation_range(&self) -> bool {
        (0..3).any(|i| matches!(self.rotation_limit(i), AxisLimit::Ranged(..)))
    }
}

fn axis_limit(limited: bool, range: Option<[Real; 2]>) -> AxisLimit {
    match (limited, range) {
        (false, _) => AxisLimit::Free,
        (true, None) => AxisLimit::Locked,
        (true, Some([min, max])) => AxisLimit::Ranged(min, max),
    }
}

fn check_range(axis: usize, min: Real, max: Real) -> Result<(), ConstraintError> {
    if axis > 2 {
        return Err(ConstraintError::InvalidAxis(axis));
    }

    // Also rejects NaNs.
    if !(min <= max) {
        return Err(ConstraintError::InvalidRange { axis, min, max });
    }

    Ok(())
}
