//! Position and velocity correction of joint constraints.
//!
//! Each function corrects one aspect of one [`Constraint`] between two
//! bodies. Corrections are shared between the bodies in proportion to
//! their inverse masses; static bodies never move.

use crate::dynamics::{AxisLimit, Constraint, RigidBody};
use crate::math::{Matrix, Point, Real, Rotation, Vector};
use crate::utils;

/// Moves both bodies so that the second pivot lies where the constraint
/// allows it relative to the first pivot.
///
/// Returns the length of the corrected error.
pub fn fix_constraint_translation(
    body1: &mut RigidBody,
    body2: &mut RigidBody,
    constraint: &Constraint,
) -> Real {
    let Some((w1, w2)) = mass_weights(body1, body2) else {
        return 0.0;
    };

    let frame1 = body1.position * constraint.frame1;
    let pivot2 = body2.position * Point::from(constraint.frame2.translation.vector);
    let offset = frame1.inverse_transform_point(&pivot2).coords;
    let error = frame1.rotation * (offset - constraint.clamp_translation(&offset));

    body1.position.translation.vector += error * w1;
    body2.position.translation.vector -= error * w2;
    error.norm()
}

/// Rotates both bodies so that the relative orientation of their pivot
/// frames satisfies the rotation limits of the constraint.
///
/// Three locked axes align the frames completely. Two locked axes align the
/// remaining free axis of both frames, leaving the rotation about it
/// untouched. Any other combination clamps the Euler angles of the
/// relative rotation.
///
/// Returns the angle of the correction.
pub fn fix_constraint_rotation(
    body1: &mut RigidBody,
    body2: &mut RigidBody,
    constraint: &Constraint,
) -> Real {
    let Some((w1, w2)) = mass_weights(body1, body2) else {
        return 0.0;
    };

    let q1 = body1.position.rotation * constraint.frame1.rotation;
    let q2 = body2.position.rotation * constraint.frame2.rotation;

    // The rotation bringing q2 where it should be.
    let correction = match (constraint.num_locked_rotations(), constraint.has_rotation_range()) {
        (3, _) => q1 * q2.inverse(),
        (2, false) => {
            let Some(free) = (0..3).find(|i| constraint.rotation_limit(*i) == AxisLimit::Free)
            else {
                return 0.0;
            };
            let axis1 = q1 * Vector::ith_axis(free);
            let axis2 = q2 * Vector::ith_axis(free);
            match Rotation::rotation_between_axis(&axis2, &axis1) {
                Some(rot) => rot,
                None => {
                    log::debug!(
                        "hinge axes of `{}` and `{}` are opposite",
                        constraint.body1,
                        constraint.body2
                    );
                    return 0.0;
                }
            }
        }
        (0, false) => return 0.0,
        _ => {
            let relative = q1.inverse() * q2;
            let angles = relative.euler_angles();
            let (roll, pitch, yaw) = constraint.clamp_rotation(angles);
            if (roll, pitch, yaw) == angles {
                return 0.0;
            }

            q1 * Rotation::from_euler_angles(roll, pitch, yaw) * q2.inverse()
        }
    };

    let scaled_axis = correction.scaled_axis();
    body1.position.rotation =
        Rotation::from_scaled_axis(scaled_axis * -w1) * body1.position.rotation;
    body2.position.rotation =
        Rotation::from_scaled_axis(scaled_axis * w2) * body2.position.rotation;
    correction.angle()
}

/// Applies the impulse cancelling the relative velocity of the two pivots.
///
/// This solves `(M1 + M2) * impulse = v2 - v1` where `Mi` is the effective
/// inverse mass matrix of body `i` at its pivot. Returns the impulse applied
/// to the first body, `None` if the system is singular.
pub fn fix_constraint_velocity(
    body1: &mut RigidBody,
    body2: &mut RigidBody,
    constraint: &Constraint,
) -> Option<Vector> {
    let pivot1 = body1.position * Point::from(constraint.frame1.translation.vector);
    let pivot2 = body2.position * Point::from(constraint.frame2.translation.vector);
    let dvel = body2.velocity_at_point(&pivot2) - body1.velocity_at_point(&pivot1);

    let k = effective_inverse_mass_matrix(body1, &pivot1)
        + effective_inverse_mass_matrix(body2, &pivot2);
    let Some(inv_k) = k.try_inverse() else {
        log::debug!(
            "singular velocity constraint between `{}` and `{}`",
            constraint.body1,
            constraint.body2
        );
        return None;
    };

    let impulse = inv_k * dvel;
    body1.apply_impulse_at_point(&impulse, &pivot1);
    body2.apply_impulse_at_point(&-impulse, &pivot2);
    Some(impulse)
}

/// The matrix mapping an impulse applied at `point` to the velocity change of
/// that point: `I * m⁻¹ - [r]ₓ * I⁻¹ * [r]ₓ`.
pub fn effective_inverse_mass_matrix(body: &RigidBody, point: &Point) -> Matrix {
    let r = utils::cross_matrix(&(point - body.center_of_mass()));
    Matrix::from_diagonal_element(body.inverse_mass())
        - r * body.world_inv_inertia().into_matrix() * r
}

fn mass_weights(body1: &RigidBody, body2: &RigidBody) -> Option<(Real, Real)> {
    let total = body1.inverse_mass() + body2.inverse_mass();
    (total > 0.0).then(|| (body1.inverse_mass() / total, body2.inverse_mass() / total))
}
