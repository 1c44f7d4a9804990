//! Rigid-body dynamics: bodies, joints, and the simulation step.

pub use self::body_id::{BodyId, IdAllocator};
pub use self::collision_object::CollisionObject;
pub use self::constraint::{AxisLimit, Constraint, ConstraintError, LimitFlags};
pub use self::end_effector::EndEffector;
pub use self::events::{CollisionEvent, CollisionEvents};
pub use self::integration_parameters::{IntegrationParameters, DEFAULT_DAMPING};
pub use self::physics::Physics;
pub use self::rigid_body::RigidBody;

mod body_id;
mod collision_object;
mod constraint;
mod end_effector;
mod events;
mod integration_parameters;
mod physics;
mod rigid_body;
pub mod solver;
