use std::sync::Arc;
use tumble3d::bounding_volume::Aabb;
use tumble3d::dynamics::{solver, Constraint, LimitFlags, RigidBody};
use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::shape::CollisionHierarchy;

fn rod(name: &str, inverse_mass: f64, position: Isometry) -> RigidBody {
    let shape = CollisionHierarchy::new(Aabb::from_half_extents(
        Point::origin(),
        Vector::new(1.0, 0.2, 0.2),
    ));
    let mut body = RigidBody::new(name, inverse_mass, Arc::new(shape)).with_position(position);
    assert!(body.validate());
    body
}

fn pivots(body1: &RigidBody, body2: &RigidBody, constraint: &Constraint) -> (Isometry, Isometry) {
    (body1.position * constraint.frame1, body2.position * constraint.frame2)
}

#[test]
fn locked_joint_converges_with_offset_pivots() {
    let mut rng = oorandom::Rand64::new(11);

    for _ in 0..20 {
        let mut rand_vector = || {
            Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float()) - Vector::repeat(0.5)
        };
        let mut body1 = rod("upper", 1.0, Isometry::new(rand_vector(), rand_vector()));
        let mut body2 = rod("lower", 0.5, Isometry::new(rand_vector() * 4.0, rand_vector() * 2.0));

        let constraint = Constraint::new(
            "upper",
            Isometry::translation(1.0, 0.0, 0.0),
            "lower",
            Isometry::translation(-1.0, 0.0, 0.0),
            LimitFlags::all(),
        );

        for _ in 0..10 {
            let _ = solver::fix_constraint_translation(&mut body1, &mut body2, &constraint);
            let _ = solver::fix_constraint_rotation(&mut body1, &mut body2, &constraint);
        }

        let (frame1, frame2) = pivots(&body1, &body2, &constraint);
        assert_relative_eq!(frame1.translation.vector, frame2.translation.vector, epsilon = 1.0e-6);
        assert_relative_eq!(frame1.rotation.angle_to(&frame2.rotation), 0.0, epsilon = 1.0e-6);
    }
}

#[test]
fn heavier_body_moves_less() {
    let mut light = rod("light", 2.0, Isometry::identity());
    let mut heavy = rod("heavy", 0.5, Isometry::translation(3.0, 0.0, 0.0));
    let constraint = Constraint::ball(
        "light",
        Isometry::translation(1.0, 0.0, 0.0),
        "heavy",
        Isometry::translation(-1.0, 0.0, 0.0),
    );

    let error = solver::fix_constraint_translation(&mut light, &mut heavy, &constraint);
    assert_relative_eq!(error, 1.0, epsilon = 1.0e-12);
    assert_relative_eq!(light.position.translation.vector.x, 0.8, epsilon = 1.0e-12);
    assert_relative_eq!(heavy.position.translation.vector.x, 2.8, epsilon = 1.0e-12);
}

#[test]
fn velocity_fix_cancels_relative_pivot_velocity() {
    let mut body1 = rod("a", 1.0, Isometry::identity()).with_linvel(Vector::new(0.0, 1.0, 0.0));
    let mut body2 = rod("b", 1.0, Isometry::translation(2.0, 0.0, 0.0))
        .with_linvel(Vector::new(0.5, -2.0, 0.3));
    body2.angvel = Vector::new(0.0, 0.4, 1.5);

    let constraint = Constraint::ball(
        "a",
        Isometry::translation(1.0, 0.0, 0.0),
        "b",
        Isometry::translation(-1.0, 0.0, 0.0),
    );
    let impulse = solver::fix_constraint_velocity(&mut body1, &mut body2, &constraint).unwrap();
    assert!(impulse.norm() > 0.0);

    let pivot = Point::new(1.0, 0.0, 0.0);
    assert_relative_eq!(
        body1.velocity_at_point(&pivot),
        body2.velocity_at_point(&pivot),
        epsilon = 1.0e-9
    );
}

#[test]
fn static_anchor_holds_its_ground() {
    let mut anchor = rod("anchor", 0.0, Isometry::identity());
    let mut hanging = rod("hanging", 1.0, Isometry::translation(2.5, -0.5, 0.0));
    let constraint = Constraint::ball(
        "anchor",
        Isometry::translation(1.0, 0.0, 0.0),
        "hanging",
        Isometry::translation(-1.0, 0.0, 0.0),
    );

    let _ = solver::fix_constraint_translation(&mut anchor, &mut hanging, &constraint);

    assert_eq!(anchor.position, Isometry::identity());
    assert_relative_eq!(
        hanging.position.translation.vector,
        Vector::new(2.0, 0.0, 0.0),
        epsilon = 1.0e-12
    );
}
