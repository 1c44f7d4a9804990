use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Real};
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::CollisionHierarchy;
use std::sync::Arc;

/// A named static collider.
///
/// Static objects have an infinite mass. They may be moved by the user
/// between two steps; contacts between static objects are only reported
/// after one of them moved.
#[derive(Clone, Debug)]
pub struct CollisionObject {
    name: String,
    /// The world transform of this object.
    pub position: Isometry,
    previous_position: Option<Isometry>,
    hierarchy: Arc<CollisionHierarchy>,
}

impl CollisionObject {
    /// A static object at `position`.
    pub fn new(
        name: impl Into<String>,
        position: Isometry,
        hierarchy: Arc<CollisionHierarchy>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            previous_position: None,
            hierarchy,
        }
    }

    /// The unique name of this object.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The collision geometry of this object.
    #[inline]
    pub fn hierarchy(&self) -> &Arc<CollisionHierarchy> {
        &self.hierarchy
    }

    /// Loads the deferred geometry of this object.
    pub fn validate(&self) -> bool {
        self.hierarchy.validate()
    }

    /// Has this object moved since the last call to [`Self::mark_clean`]?
    ///
    /// A newly created object counts as moved.
    pub fn is_dirty(&self) -> bool {
        self.previous_position != Some(self.position)
    }

    /// Records the current position as the reference for [`Self::is_dirty`].
    pub fn mark_clean(&mut self) {
        self.previous_position = Some(self.position);
    }

    /// The world-space bounds of this object.
    pub fn world_aabb(&self) -> Aabb {
        let aabb = self.hierarchy.local_aabb();
        if aabb.is_valid() {
            aabb.transform_by(&self.position)
        } else {
            aabb
        }
    }

    /// The radius of a sphere centered at the origin of this object enclosing it.
    pub fn radius(&self) -> Real {
        self.hierarchy.bounding_radius()
    }

    /// The intersections between this object and `other`, in world-space.
    pub fn collide(&self, other: &CollisionObject) -> Vec<Intersection> {
        let pos12 = self.position.inv_mul(&other.position);
        self.hierarchy
            .collisions(&other.hierarchy, &pos12)
            .into_iter()
            .map(|inter| inter.transform_by(&self.position))
            .collect()
    }

    /// The nearest intersection between the world-space `ray` and this object.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let local = ray.inverse_transform_by(&self.position);
        self.hierarchy
            .ray_intersection(&local)
            .map(|hit| hit.transform_by(&self.position))
    }
}
