use crate::dynamics::{Constraint, IntegrationParameters, RigidBody};
use crate::math::{Point, Real, Rotation};
use indexmap::IndexMap;
use smallvec::SmallVec;

/// A goal position for a point of a rigid body.
///
/// At each sub-step the body is pulled toward the goal, and the bodies it
/// hangs from (through the second end of a [`Constraint`]) are rotated
/// about their joints to bring it closer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndEffector {
    /// The name of the tracking body.
    pub body: String,
    /// The tracking point, in the local-space of the body.
    pub local_point: Point,
    /// The world-space goal.
    pub goal: Point,
    /// The number of joints of the chain rotated toward the goal.
    pub chain_length: usize,
}

impl EndEffector {
    /// Makes the origin of `body` track `goal`, through a chain of at most 4 joints.
    pub fn new(body: impl Into<String>, goal: Point) -> Self {
        Self {
            body: body.into(),
            local_point: Point::origin(),
            goal,
            chain_length: 4,
        }
    }

    /// Sets the tracking point, in the local-space of the body.
    pub fn with_local_point(mut self, local_point: Point) -> Self {
        self.local_point = local_point;
        self
    }

    /// Sets the number of joints rotated toward the goal.
    pub fn with_chain_length(mut self, chain_length: usize) -> Self {
        self.chain_length = chain_length;
        self
    }

    /// Moves the bodies of the chain one step toward the goal.
    ///
    /// Walking up the chain, the part of the chain below each joint is
    /// rotated about that joint to bring the tracking point toward the goal.
    pub(crate) fn track(
        &self,
        bodies: &mut IndexMap<String, RigidBody>,
        constraints: &[Constraint],
        params: &IntegrationParameters,
    ) {
        let Some(body) = bodies.get_mut(&self.body) else {
            return;
        };

        if !body.is_static() {
            let tip = body.position * self.local_point;
            let step = clamp_norm((self.goal - tip) * params.ik_gain, params.ik_max_translation);
            body.position.translation.vector += step;
        }

        let mut chain: SmallVec<[&str; 8]> = SmallVec::new();
        chain.push(self.body.as_str());

        for _ in 0..self.chain_length {
            let Some(child) = chain.last().copied() else {
                break;
            };
            let Some(joint) = constraints
                .iter()
                .find(|c| c.body2 == child && !chain.contains(&c.body1.as_str()))
            else {
                break;
            };
            let (Some(parent), Some(tip_body)) = (bodies.get(&joint.body1), bodies.get(&self.body))
            else {
                break;
            };

            let pivot = parent.position * Point::from(joint.frame1.translation.vector);
            let tip = tip_body.position * self.local_point;
            let parent_is_static = parent.is_static();

            if let Some(nudge) = nudge_toward(&pivot, &tip, &self.goal, params) {
                for name in &chain {
                    if let Some(link) = bodies.get_mut(*name) {
                        rotate_about(link, &pivot, &nudge);
                    }
                }
            }

            if parent_is_static {
                break;
            }
            chain.push(joint.body1.as_str());
        }
    }
}

fn rotate_about(body: &mut RigidBody, pivot: &Point, rot: &Rotation) {
    if body.is_static() {
        return;
    }

    let arm = body.position.translation.vector - pivot.coords;
    body.position.translation.vector = pivot.coords + rot * arm;
    body.position.rotation = rot * body.position.rotation;
}

/// The rotation about `pivot` bringing `tip` toward `goal`, scaled down by
/// the gain and clamped.
fn nudge_toward(
    pivot: &Point,
    tip: &Point,
    goal: &Point,
    params: &IntegrationParameters,
) -> Option<Rotation> {
    let rot = Rotation::rotation_between(&(tip - pivot), &(goal - pivot))?;
    let scaled = clamp_norm(rot.scaled_axis() * params.ik_gain, params.ik_max_rotation);
    (scaled.norm() > 0.0).then(|| Rotation::from_scaled_axis(scaled))
}

fn clamp_norm(v: crate::math::Vector, max: Real) -> crate::math::Vector {
    let norm = v.norm();
    if norm > max {
        v * (max / norm)
    } else {
        v
    }
}
