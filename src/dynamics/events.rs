use crate::math::Isometry;
use crate::query::Intersection;

/// A contact found during a [`Physics`](crate::dynamics::Physics) step.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionEvent {
    /// The name of the first body or static object.
    pub first: String,
    /// The name of the second body or static object.
    pub second: String,
    /// The world transform of `first` when the contact was found.
    pub transform: Isometry,
    /// The contact, in world-space, with a normal pointing toward `first`.
    pub intersection: Intersection,
}

/// The collision events of one `Physics::resolve` call, grouped by the kind
/// of objects involved.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionEvents {
    /// Contacts between two rigid bodies.
    pub body_body: Vec<CollisionEvent>,
    /// Contacts between a rigid body (`first`) and a static object (`second`).
    pub body_static: Vec<CollisionEvent>,
    /// Contacts between two static objects.
    pub static_static: Vec<CollisionEvent>,
}

impl CollisionEvents {
    /// The total number of events.
    pub fn len(&self) -> usize {
        self.body_body.len() + self.body_static.len() + self.static_static.len()
    }

    /// Is there no event at all?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates through every event.
    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.body_body
            .iter()
            .chain(self.body_static.iter())
            .chain(self.static_static.iter())
    }

    /// Does any event involve the body or static object named `name`?
    pub fn involves(&self, name: &str) -> bool {
        self.iter().any(|e| e.first == name || e.second == name)
    }
}
