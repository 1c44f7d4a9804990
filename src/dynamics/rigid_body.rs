use crate::bounding_volume::Aabb;
use crate::dynamics::{CollisionObject, DEFAULT_DAMPING};
use crate::mass_properties::MassProperties;
use crate::math::{AngVector, AngularInertia, Isometry, Point, Real, Rotation, Vector};
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::CollisionHierarchy;
use hashbrown::HashSet;
use std::sync::Arc;

/// A simulated solid.
///
/// The origin of the body is its center of mass. Its inverse inertia is
/// the one of a solid box filling the bounds of its collision hierarchy,
/// computed by [`RigidBody::validate`].
#[derive(Clone, Debug)]
pub struct RigidBody {
    name: String,
    inverse_mass: Real,
    local_inv_inertia: AngularInertia,
    /// The world transform of this body.
    pub position: Isometry,
    previous_translation: Vector,
    /// The linear velocity of the center of mass.
    pub linvel: Vector,
    /// The angular velocity, in world-space.
    pub angvel: AngVector,
    /// A uniform gravity acceleration.
    pub gravity: Vector,
    /// The standard gravitational parameter of a central attractor at the world origin.
    pub mu: Real,
    /// Does this body snap back small tangential slides on contact?
    pub friction: bool,
    hierarchy: Arc<CollisionHierarchy>,
    excluded: HashSet<String>,
    radius: Real,
    valid: bool,
}

impl RigidBody {
    /// A body with the given inverse mass, at rest at the world origin.
    ///
    /// An inverse mass of zero makes the body static.
    pub fn new(
        name: impl Into<String>,
        inverse_mass: Real,
        hierarchy: Arc<CollisionHierarchy>,
    ) -> Self {
        Self {
            name: name.into(),
            inverse_mass: inverse_mass.max(0.0),
            local_inv_inertia: AngularInertia::zero(),
            position: Isometry::identity(),
            previous_translation: Vector::zeros(),
            linvel: Vector::zeros(),
            angvel: AngVector::zeros(),
            gravity: Vector::zeros(),
            mu: 0.0,
            friction: false,
            hierarchy,
            excluded: HashSet::new(),
            radius: 0.0,
            valid: false,
        }
    }

    /// Sets the initial world transform of this body.
    pub fn with_position(mut self, position: Isometry) -> Self {
        self.position = position;
        self.previous_translation = position.translation.vector;
        self
    }

    /// Sets the uniform gravity acceleration.
    pub fn with_gravity(mut self, gravity: Vector) -> Self {
        self.gravity = gravity;
        self
    }

    /// Sets the initial linear velocity.
    pub fn with_linvel(mut self, linvel: Vector) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the initial angular velocity.
    pub fn with_angvel(mut self, angvel: AngVector) -> Self {
        self.angvel = angvel;
        self
    }

    /// Enables or disables the friction approximation.
    pub fn with_friction(mut self, friction: bool) -> Self {
        self.friction = friction;
        self
    }

    /// The unique name of this body.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inverse of the mass, zero for a static body.
    #[inline]
    pub fn inverse_mass(&self) -> Real {
        self.inverse_mass
    }

    /// Is this body infinitely heavy?
    #[inline]
    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Changes the inverse mass. The body has to be validated again.
    pub fn set_inverse_mass(&mut self, inverse_mass: Real) {
        self.inverse_mass = inverse_mass.max(0.0);
        self.valid = false;
    }

    /// The collision geometry of this body.
    #[inline]
    pub fn hierarchy(&self) -> &Arc<CollisionHierarchy> {
        &self.hierarchy
    }

    /// The radius of a sphere centered at the origin of this body enclosing its geometry.
    ///
    /// Zero until the body is validated.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// The translation of this body before the last integration.
    #[inline]
    pub fn previous_translation(&self) -> &Vector {
        &self.previous_translation
    }

    /// Has [`RigidBody::validate`] succeeded?
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The names of the bodies this one never collides with.
    pub fn excluded(&self) -> &HashSet<String> {
        &self.excluded
    }

    /// Prevents collisions between this body and the body named `name`.
    pub fn exclude(&mut self, name: impl Into<String>) {
        let _ = self.excluded.insert(name.into());
    }

    /// Allows collisions between this body and the body named `name` again.
    pub fn include(&mut self, name: &str) {
        let _ = self.excluded.remove(name);
    }

    /// Are collisions with `name` disabled?
    #[inline]
    pub fn excludes(&self, name: &str) -> bool {
        self.excluded.contains(name)
    }

    /// Loads the collision geometry and derives the inertia and the radius.
    ///
    /// Returns `false` while some geometry is not loaded. Once it has
    /// succeeded, further calls are no-ops.
    pub fn validate(&mut self) -> bool {
        if self.valid {
            return true;
        }

        if !self.hierarchy.validate() {
            return false;
        }

        let aabb = self.hierarchy.local_aabb();
        self.local_inv_inertia = if self.inverse_mass == 0.0 || !aabb.is_valid() {
            AngularInertia::zero()
        } else {
            MassProperties::from_aabb_with_mass(1.0 / self.inverse_mass, &aabb).local_inv_inertia()
        };
        self.radius = self.hierarchy.bounding_radius();
        self.valid = true;
        log::trace!("validated rigid body `{}`, radius {}", self.name, self.radius);
        true
    }

    /// The inverse inertia tensor in the local-space of this body.
    #[inline]
    pub fn local_inv_inertia(&self) -> &AngularInertia {
        &self.local_inv_inertia
    }

    /// The inverse inertia tensor in world-space.
    pub fn world_inv_inertia(&self) -> AngularInertia {
        let rot = self.position.rotation.to_rotation_matrix().into_inner();
        self.local_inv_inertia.quadform(&rot)
    }

    /// The world-space center of mass.
    #[inline]
    pub fn center_of_mass(&self) -> Point {
        Point::from(self.position.translation.vector)
    }

    /// The velocity of the world-space point `point` attached to this body.
    pub fn velocity_at_point(&self, point: &Point) -> Vector {
        self.linvel + self.angvel.cross(&(point - self.center_of_mass()))
    }

    /// The world-space bounds of this body.
    pub fn world_aabb(&self) -> Aabb {
        let aabb = self.hierarchy.local_aabb();
        if aabb.is_valid() {
            aabb.transform_by(&self.position)
        } else {
            aabb
        }
    }

    /// The total gravity acceleration at the current position.
    pub fn acceleration(&self) -> Vector {
        let mut acc = self.gravity;

        if self.mu != 0.0 {
            let x = self.position.translation.vector;
            let dist = x.norm();
            if dist > crate::math::DEFAULT_EPSILON {
                acc -= x * (self.mu / (dist * dist * dist));
            }
        }

        acc
    }

    /// Is this body subject to any gravity?
    #[inline]
    pub fn has_gravity(&self) -> bool {
        self.gravity != Vector::zeros() || self.mu != 0.0
    }

    /// Advances this body by `dt`, then damps its velocities.
    pub fn step(&mut self, dt: Real) {
        self.integrate(dt);
        self.apply_damping(dt, DEFAULT_DAMPING);
    }

    /// Semi-implicit Euler integration of the position and velocities.
    pub fn integrate(&mut self, dt: Real) {
        self.previous_translation = self.position.translation.vector;
        self.position.rotation =
            Rotation::from_scaled_axis(self.angvel * dt) * self.position.rotation;

        if self.is_static() {
            self.position.translation.vector += self.linvel * dt;
            return;
        }

        let acc = self.acceleration();
        self.position.translation.vector += self.linvel * dt + acc * (0.5 * dt * dt);
        self.linvel += acc * dt;
    }

    /// Scales down both velocities by `1 - damping * dt` if this body is
    /// subject to gravity.
    pub fn apply_damping(&mut self, dt: Real, damping: Real) {
        if !self.has_gravity() {
            return;
        }

        let factor = (1.0 - damping * dt).max(0.0);
        self.linvel *= factor;
        self.angvel *= factor;
    }

    /// Applies `impulse` at the world-space `point`.
    pub fn apply_impulse_at_point(&mut self, impulse: &Vector, point: &Point) {
        let r = point - self.center_of_mass();
        self.linvel += impulse * self.inverse_mass;
        self.angvel += self.world_inv_inertia() * r.cross(impulse);
    }

    /// The inverse of the mass seen by a unit impulse along `dir` applied at `point`.
    pub fn effective_inverse_mass(&self, point: &Point, dir: &Vector) -> Real {
        let r = point - self.center_of_mass();
        let ang = self.world_inv_inertia() * r.cross(dir);
        self.inverse_mass + dir.dot(&ang.cross(&r))
    }

    /// Applies the contact impulse between `self` and `that` at the
    /// world-space `point`, `normal` pointing from `that` toward `self`.
    ///
    /// Nothing happens if the bodies separate already. Returns the impulse
    /// applied to `self`, the opposite being applied to `that`.
    pub fn collision_impulse(
        &mut self,
        that: &mut RigidBody,
        point: &Point,
        normal: &Vector,
    ) -> Option<Vector> {
        let rel = self.velocity_at_point(point) - that.velocity_at_point(point);
        let k = self.effective_inverse_mass(point, normal)
            + that.effective_inverse_mass(point, normal);
        let impulse = contact_impulse(&rel, normal, k)?;

        self.apply_impulse_at_point(&impulse, point);
        that.apply_impulse_at_point(&-impulse, point);
        Some(impulse)
    }

    /// Applies the contact impulse against an infinitely heavy, motionless obstacle.
    pub fn static_collision_impulse(&mut self, point: &Point, normal: &Vector) -> Option<Vector> {
        let rel = self.velocity_at_point(point);
        let k = self.effective_inverse_mass(point, normal);
        let impulse = contact_impulse(&rel, normal, k)?;

        self.apply_impulse_at_point(&impulse, point);
        Some(impulse)
    }

    /// Cancels the tangential part of the last displacement of this body if
    /// it is shorter than `threshold`.
    ///
    /// This approximates static friction: a body resting on a surface does
    /// not creep along it.
    pub fn apply_friction(&mut self, normal: &Vector, threshold: Real) {
        if !self.friction || self.is_static() {
            return;
        }

        let displacement = self.position.translation.vector - self.previous_translation;
        let tangential = displacement - normal * displacement.dot(normal);
        let slide = tangential.norm();

        if slide > 0.0 && slide < threshold {
            self.position.translation.vector -= tangential;
        }
    }

    /// Finds and responds to the contacts between `self` and `that`.
    ///
    /// Both bodies are pushed apart along each contact normal in proportion
    /// to their inverse masses, then receive the contact impulse. The
    /// contacts are returned in world-space, with normals pointing toward
    /// `self`.
    ///
    /// # Panics
    /// If `self` and `that` have the same name.
    pub fn resolve_collision(
        &mut self,
        that: &mut RigidBody,
        friction_threshold: Real,
    ) -> Vec<Intersection> {
        assert_ne!(self.name, that.name, "a rigid body cannot collide with itself");

        if !self.valid || !that.valid {
            return Vec::new();
        }

        let dist = (that.position.translation.vector - self.position.translation.vector).norm();
        if dist > self.radius + that.radius {
            return Vec::new();
        }

        let hits = self.world_collisions(&that.hierarchy, &that.position);
        let total_inv_mass = self.inverse_mass + that.inverse_mass;

        for hit in &hits {
            if total_inv_mass > 0.0 {
                let push = hit.normal.into_inner() * (hit.depth / total_inv_mass);
                self.position.translation.vector += push * self.inverse_mass;
                that.position.translation.vector -= push * that.inverse_mass;
            }

            let _ = self.collision_impulse(that, &hit.point, &hit.normal);
            self.apply_friction(&hit.normal, friction_threshold);
            that.apply_friction(&-hit.normal.into_inner(), friction_threshold);
        }

        hits
    }

    /// Finds and responds to the contacts between `self` and the static `object`.
    ///
    /// This body moves out of the object by the full penetration depth.
    pub fn resolve_static_collision(
        &mut self,
        object: &CollisionObject,
        friction_threshold: Real,
    ) -> Vec<Intersection> {
        if !self.valid || self.is_static() {
            return Vec::new();
        }

        let dist = (object.position.translation.vector - self.position.translation.vector).norm();
        if dist > self.radius + object.radius() {
            return Vec::new();
        }

        let hits = self.world_collisions(object.hierarchy(), &object.position);

        for hit in &hits {
            self.position.translation.vector += hit.normal.into_inner() * hit.depth;
            let _ = self.static_collision_impulse(&hit.point, &hit.normal);
            self.apply_friction(&hit.normal, friction_threshold);
        }

        hits
    }

    /// The nearest intersection between the world-space `ray` and this body.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let local = ray.inverse_transform_by(&self.position);
        self.hierarchy
            .ray_intersection(&local)
            .map(|hit| hit.transform_by(&self.position))
    }

    fn world_collisions(
        &self,
        other: &CollisionHierarchy,
        other_pos: &Isometry,
    ) -> Vec<Intersection> {
        let pos12 = self.position.inv_mul(other_pos);
        let mut hits = self.hierarchy.collisions(other, &pos12);
        for hit in &mut hits {
            *hit = hit.transform_by(&self.position);
        }
        hits
    }
}

/// The impulse cancelling the approach velocity `rel` along `normal`.
///
/// The restitution term is zero: contacts are fully inelastic. The whole
/// relative velocity is then cancelled, solved against the effective mass
/// along the normal.
fn contact_impulse(rel: &Vector, normal: &Vector, k: Real) -> Option<Vector> {
    const RESTITUTION: Real = 0.0;

    let approach = rel.dot(normal);
    if approach >= 0.0 || k <= crate::math::DEFAULT_EPSILON {
        return None;
    }

    Some((normal * (-RESTITUTION * approach) - rel) / k)
}

#[cfg(test)]
mod test {
    use super::RigidBody;
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::{CollisionHierarchy, Sphere};
    use std::sync::Arc;

    fn cube(name: &str, inverse_mass: f64) -> RigidBody {
        let shape = CollisionHierarchy::new(Aabb::from_half_extents(
            Point::origin(),
            Vector::repeat(0.5),
        ));
        let mut body = RigidBody::new(name, inverse_mass, Arc::new(shape));
        assert!(body.validate());
        body
    }

    #[test]
    fn free_fall() {
        let mut body = cube("falling", 1.0).with_gravity(Vector::new(0.0, 0.0, -9.8));
        body.integrate(1.0);
        assert_relative_eq!(body.position.translation.vector.z, -4.9, epsilon = 1.0e-12);
        assert_relative_eq!(body.linvel.z, -9.8, epsilon = 1.0e-12);

        body.apply_damping(1.0, 0.1);
        assert_relative_eq!(body.linvel.z, -9.8 * 0.9, epsilon = 1.0e-12);
    }

    #[test]
    fn no_damping_without_gravity() {
        let mut body = cube("drifting", 1.0).with_linvel(Vector::x());
        body.step(0.5);
        assert_relative_eq!(body.linvel, Vector::x());
        assert_relative_eq!(body.position.translation.vector.x, 0.5);
    }

    #[test]
    fn central_gravity_points_to_the_origin() {
        let mut body = cube("satellite", 1.0).with_position(Isometry::translation(2.0, 0.0, 0.0));
        body.mu = 8.0;
        assert_relative_eq!(body.acceleration(), Vector::new(-2.0, 0.0, 0.0));
    }

    #[test]
    fn static_bodies_are_not_accelerated() {
        let mut body = cube("ground", 0.0).with_gravity(Vector::new(0.0, 0.0, -9.8));
        body.step(1.0);
        assert_eq!(body.position, Isometry::identity());
        assert!(body.local_inv_inertia().is_zero());
    }

    #[test]
    fn validate_is_idempotent() {
        let mut body = cube("a", 1.0);
        let inertia = *body.local_inv_inertia();
        assert!(body.validate());
        assert_eq!(*body.local_inv_inertia(), inertia);
        // Unit cube of mass 1: I = 1/6.
        assert_relative_eq!(inertia.m11, 6.0, epsilon = 1.0e-9);
        assert_relative_eq!(body.radius(), 0.75f64.sqrt(), epsilon = 1.0e-12);
    }

    #[test]
    fn head_on_collision_stops_both_bodies() {
        let mut a = cube("a", 1.0).with_linvel(Vector::x());
        let mut b = cube("b", 1.0)
            .with_position(Isometry::translation(0.9, 0.0, 0.0))
            .with_linvel(-Vector::x());

        let hits = a.resolve_collision(&mut b, 0.0);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(*hits[0].normal, -Vector::x(), epsilon = 1.0e-9);
        // Separated, inelastic.
        let gap = b.position.translation.vector.x - a.position.translation.vector.x;
        assert_relative_eq!(gap, 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(a.linvel, Vector::zeros(), epsilon = 1.0e-9);
        assert_relative_eq!(b.linvel, Vector::zeros(), epsilon = 1.0e-9);
    }

    #[test]
    fn separating_bodies_get_no_impulse() {
        let mut a = cube("a", 1.0).with_linvel(-Vector::x());
        let mut b = cube("b", 1.0).with_position(Isometry::translation(0.9, 0.0, 0.0));
        let point = Point::new(0.45, 0.0, 0.0);
        assert!(a.collision_impulse(&mut b, &point, &-Vector::x()).is_none());
    }

    #[test]
    fn far_bodies_are_rejected_early() {
        let ball = CollisionHierarchy::new(Sphere::new(Point::origin(), 1.0));
        let mut a = RigidBody::new("a", 1.0, Arc::new(ball.clone()));
        let mut b = RigidBody::new("b", 1.0, Arc::new(ball))
            .with_position(Isometry::translation(2.5, 0.0, 0.0));
        assert!(a.validate() && b.validate());
        assert!(a.resolve_collision(&mut b, 0.0).is_empty());
    }

    #[test]
    fn friction_cancels_small_slides() {
        let mut body = cube("slider", 1.0).with_friction(true);
        body.integrate(0.0);
        body.position.translation.vector += Vector::new(0.005, 0.0, -0.2);
        body.apply_friction(&Vector::z(), 0.01);
        assert_relative_eq!(body.position.translation.vector, Vector::new(0.0, 0.0, -0.2));

        body.integrate(0.0);
        body.position.translation.vector += Vector::new(0.5, 0.0, 0.0);
        body.apply_friction(&Vector::z(), 0.01);
        assert_relative_eq!(body.position.translation.vector.x, 0.5);
    }

    #[test]
    #[should_panic]
    fn a_body_cannot_collide_with_itself() {
        let mut a = cube("twin", 1.0);
        let mut b = cube("twin", 1.0);
        let _ = a.resolve_collision(&mut b, 0.0);
    }
}
