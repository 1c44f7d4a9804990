use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::dynamics::{
    solver, BodyId, CollisionEvent, CollisionEvents, CollisionObject, Constraint, ConstraintError,
    EndEffector,
    IdAllocator, IntegrationParameters, RigidBody,
};
use crate::math::{Point, Real, Vector};
use crate::partitioning::Bucket3d;
use crate::query::{Ray, RayIntersection};
use crate::utils::SortedPair;
use hashbrown::{HashMap, HashSet};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;

/// The state of a simulated scene.
///
/// Rigid bodies are stored by name, in insertion order. Constraints and
/// end effectors reference them by name and are resolved at each step.
#[derive(Clone, Debug, Default)]
pub struct Physics {
    bodies: IndexMap<String, RigidBody>,
    ids: HashMap<String, BodyId>,
    constraints: Vec<Constraint>,
    constrained: HashSet<SortedPair<String>>,
    statics: IndexMap<String, CollisionObject>,
    end_effectors: Vec<EndEffector>,
    params: IntegrationParameters,
    id_allocator: IdAllocator,
}

impl Physics {
    /// An empty scene with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty scene with the given parameters.
    pub fn with_parameters(params: IntegrationParameters) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// The step parameters.
    #[inline]
    pub fn parameters(&self) -> &IntegrationParameters {
        &self.params
    }

    /// The step parameters, mutably.
    #[inline]
    pub fn parameters_mut(&mut self) -> &mut IntegrationParameters {
        &mut self.params
    }

    /// Adds a rigid body.
    ///
    /// A body with the same name is replaced, and keeps its identifier.
    pub fn add_rigid_body(&mut self, body: RigidBody) -> BodyId {
        let name = body.name().to_string();

        if let Some(id) = self.ids.get(&name) {
            log::debug!("replacing rigid body `{}`", name);
            let _ = self.bodies.insert(name, body);
            return *id;
        }

        let id = self.id_allocator.allocate();
        let _ = self.ids.insert(name.clone(), id);
        let _ = self.bodies.insert(name, body);
        id
    }

    /// Adds a static object, replacing any object with the same name.
    pub fn add_collision(&mut self, object: CollisionObject) {
        let _ = self.statics.insert(object.name().to_string(), object);
    }

    /// Adds a joint between two existing bodies.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ConstraintError> {
        if constraint.body1 == constraint.body2 {
            return Err(ConstraintError::SameBody(constraint.body1));
        }

        for name in [&constraint.body1, &constraint.body2] {
            if !self.bodies.contains_key(name) {
                return Err(ConstraintError::UnknownBody(name.clone()));
            }
        }

        let _ = self.constrained.insert(SortedPair::new(
            constraint.body1.clone(),
            constraint.body2.clone(),
        ));
        self.constraints.push(constraint);
        Ok(())
    }

    /// Adds an inverse-kinematics goal.
    pub fn add_end_effector(&mut self, effector: EndEffector) {
        self.end_effectors.push(effector);
    }

    /// Removes a rigid body, with the constraints and end effectors referencing it.
    pub fn remove_rigid_body(&mut self, name: &str) -> Option<RigidBody> {
        let body = self.bodies.shift_remove(name)?;
        let _ = self.ids.remove(name);
        self.constraints.retain(|c| !c.involves(name));
        self.end_effectors.retain(|e| e.body != name);
        self.rebuild_constrained_pairs();
        Some(body)
    }

    /// Removes a static object.
    pub fn remove_collision(&mut self, name: &str) -> Option<CollisionObject> {
        self.statics.shift_remove(name)
    }

    /// Removes every constraint between the two bodies. Returns the number
    /// of constraints removed.
    pub fn remove_constraints_between(&mut self, body1: &str, body2: &str) -> usize {
        let len = self.constraints.len();
        self.constraints
            .retain(|c| !(c.involves(body1) && c.involves(body2)));
        self.rebuild_constrained_pairs();
        len - self.constraints.len()
    }

    /// Removes the end effectors of `body`. Returns the number of goals removed.
    pub fn remove_end_effectors(&mut self, body: &str) -> usize {
        let len = self.end_effectors.len();
        self.end_effectors.retain(|e| e.body != body);
        len - self.end_effectors.len()
    }

    fn rebuild_constrained_pairs(&mut self) {
        self.constrained = self
            .constraints
            .iter()
            .map(|c| SortedPair::new(c.body1.clone(), c.body2.clone()))
            .collect();
    }

    /// The rigid body named `name`.
    #[inline]
    pub fn rigid_body(&self, name: &str) -> Option<&RigidBody> {
        self.bodies.get(name)
    }

    /// The rigid body named `name`, mutably.
    #[inline]
    pub fn rigid_body_mut(&mut self, name: &str) -> Option<&mut RigidBody> {
        self.bodies.get_mut(name)
    }

    /// The identifier of the rigid body named `name`.
    #[inline]
    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.ids.get(name).copied()
    }

    /// The rigid body with the identifier `id`.
    pub fn rigid_body_by_id(&self, id: BodyId) -> Option<&RigidBody> {
        self.ids
            .iter()
            .find(|(_, other)| **other == id)
            .and_then(|(name, _)| self.bodies.get(name))
    }

    /// The rigid bodies, in insertion order.
    pub fn rigid_bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.values()
    }

    /// The number of rigid bodies.
    #[inline]
    pub fn num_rigid_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// The static object named `name`.
    #[inline]
    pub fn collision_object(&self, name: &str) -> Option<&CollisionObject> {
        self.statics.get(name)
    }

    /// The static object named `name`, mutably.
    #[inline]
    pub fn collision_object_mut(&mut self, name: &str) -> Option<&mut CollisionObject> {
        self.statics.get_mut(name)
    }

    /// The static objects, in insertion order.
    pub fn collision_objects(&self) -> impl Iterator<Item = &CollisionObject> {
        self.statics.values()
    }

    /// The joints of this scene.
    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The inverse-kinematics goals of this scene.
    #[inline]
    pub fn end_effectors(&self) -> &[EndEffector] {
        &self.end_effectors
    }

    /// The inverse-kinematics goals of this scene, mutably.
    #[inline]
    pub fn end_effectors_mut(&mut self) -> &mut [EndEffector] {
        &mut self.end_effectors
    }

    /// Is there a joint between the two bodies?
    pub fn are_constrained(&self, body1: &str, body2: &str) -> bool {
        self.constrained
            .contains(&SortedPair::new(body1.to_string(), body2.to_string()))
    }

    /// Loads the geometry of every body and static object.
    ///
    /// Every one of them is polled. Returns `true` once all are ready.
    pub fn validate(&mut self) -> bool {
        let mut valid = true;

        for body in self.bodies.values_mut() {
            valid = body.validate() && valid;
        }

        for object in self.statics.values() {
            valid = object.validate() && valid;
        }

        valid
    }

    /// Advances the simulation by `speed * time_step`.
    ///
    /// The time step is split in sub-steps, each tracking the inverse
    /// kinematics goals, integrating the bodies, solving the joints and the
    /// contacts between bodies. Contacts with static objects are then
    /// resolved once.
    ///
    /// Nothing happens until every body and static object is loaded.
    pub fn resolve(&mut self, speed: Real, time_step: Real) -> CollisionEvents {
        let mut events = CollisionEvents::default();

        if !self.validate() {
            log::trace!("scene geometry not ready, skipping step");
            return events;
        }

        let dt = self.params.substep_dt(speed, time_step);

        for _ in 0..self.params.num_substeps {
            self.substep(dt, &mut events);
        }

        self.resolve_statics(&mut events);

        log::trace!(
            "resolved {} bodies over {} sub-steps: {} body contacts, {} static contacts",
            self.bodies.len(),
            self.params.num_substeps,
            events.body_body.len(),
            events.body_static.len() + events.static_static.len(),
        );
        events
    }

    fn substep(&mut self, dt: Real, events: &mut CollisionEvents) {
        for effector in &self.end_effectors {
            effector.track(&mut self.bodies, &self.constraints, &self.params);
        }

        for body in self.bodies.values_mut() {
            body.integrate(dt);
            body.apply_damping(dt, self.params.damping);
        }

        let buckets = self.fill_buckets();
        let joints: Vec<_> = self
            .constraints
            .iter()
            .filter_map(|c| {
                let i = self.bodies.get_index_of(&c.body1)?;
                let j = self.bodies.get_index_of(&c.body2)?;
                Some((i, j, c))
            })
            .collect();
        let mut pairs = buckets.pairs();
        pairs.sort_unstable();

        let mut bodies: Vec<&mut RigidBody> = self.bodies.values_mut().collect();

        for (i, j, constraint) in joints {
            let (body1, body2) = two_mut(&mut bodies, i, j);
            let _ = solver::fix_constraint_translation(body1, body2, constraint);
            let _ = solver::fix_constraint_rotation(body1, body2, constraint);
            if constraint.locks_translation() {
                let _ = solver::fix_constraint_velocity(body1, body2, constraint);
            }
        }

        for (i, j) in pairs {
            let (body1, body2) = two_mut(&mut bodies, i, j);

            if (body1.is_static() && body2.is_static())
                || body1.excludes(body2.name())
                || body2.excludes(body1.name())
                || self
                    .constrained
                    .contains(&SortedPair::new(body1.name().to_string(), body2.name().to_string()))
            {
                continue;
            }

            let transform = body1.position;
            for intersection in body1.resolve_collision(body2, self.params.friction_threshold) {
                events.body_body.push(CollisionEvent {
                    first: body1.name().to_string(),
                    second: body2.name().to_string(),
                    transform,
                    intersection,
                });
            }
        }
    }

    /// Inserts the bounding cube of each body into a spatial hash whose
    /// cells are at least as large as the largest body.
    fn fill_buckets(&self) -> Bucket3d {
        let mut scene = Aabb::new_invalid();
        let mut max_radius: Real = 0.0;

        for body in self.bodies.values() {
            scene.merge(&body_cube(body));
            max_radius = max_radius.max(body.radius());
        }

        let cell_size =
            Bucket3d::cell_size_for(max_radius, &scene).max(self.params.min_bucket_size);
        let mut buckets = Bucket3d::new(cell_size);

        for (i, body) in self.bodies.values().enumerate() {
            let _ = buckets.insert(i, &body_cube(body));
        }

        buckets
    }

    fn resolve_statics(&mut self, events: &mut CollisionEvents) {
        for body in self.bodies.values_mut() {
            for object in self.statics.values() {
                if body.excludes(object.name()) {
                    continue;
                }

                let transform = body.position;
                let hits = body.resolve_static_collision(object, self.params.friction_threshold);
                for intersection in hits {
                    events.body_static.push(CollisionEvent {
                        first: body.name().to_string(),
                        second: object.name().to_string(),
                        transform,
                        intersection,
                    });
                }
            }
        }

        let objects: Vec<&CollisionObject> = self.statics.values().collect();
        for (k, object1) in objects.iter().enumerate() {
            for object2 in &objects[k + 1..] {
                if !object1.is_dirty() && !object2.is_dirty() {
                    continue;
                }

                if !object1.world_aabb().overlaps(&object2.world_aabb()) {
                    continue;
                }

                for intersection in object1.collide(object2) {
                    events.static_static.push(CollisionEvent {
                        first: object1.name().to_string(),
                        second: object2.name().to_string(),
                        transform: object1.position,
                        intersection,
                    });
                }
            }
        }

        for object in self.statics.values_mut() {
            object.mark_clean();
        }
    }

    /// Casts `ray` against every body and static object.
    ///
    /// `callback` is called with the name of each object hit and the
    /// world-space intersection, nearest first, until it returns `false`.
    pub fn ray_intersection(
        &self,
        ray: &Ray,
        mut callback: impl FnMut(&str, &RayIntersection) -> bool,
    ) {
        let mut hits: Vec<(&str, RayIntersection)> = self
            .bodies
            .values()
            .filter(|body| body.is_valid())
            .filter_map(|body| Some((body.name(), body.ray_intersection(ray)?)))
            .chain(
                self.statics
                    .values()
                    .filter_map(|object| Some((object.name(), object.ray_intersection(ray)?))),
            )
            .collect();

        hits.sort_by_key(|(_, hit)| OrderedFloat(hit.time_of_impact));

        for (name, hit) in &hits {
            if !callback(name, hit) {
                break;
            }
        }
    }
}

/// The cube enclosing the bounding sphere of `body`, in world-space.
fn body_cube(body: &RigidBody) -> Aabb {
    Aabb::from_half_extents(
        Point::from(body.position.translation.vector),
        Vector::repeat(body.radius()),
    )
}

fn two_mut<'a, T>(items: &'a mut [T], i: usize, j: usize) -> (&'a mut T, &'a mut T) {
    assert_ne!(i, j, "a rigid body cannot interact with itself");

    if i < j {
        let (left, right) = items.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = items.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}
