use std::sync::Arc;
use tumble3d::bounding_volume::Aabb;
use tumble3d::dynamics::{IntegrationParameters, Physics, RigidBody};
use tumble3d::math::{Point, Vector};
use tumble3d::shape::CollisionHierarchy;

fn falling_cube() -> RigidBody {
    let shape = CollisionHierarchy::new(Aabb::from_half_extents(
        Point::origin(),
        Vector::repeat(0.5),
    ));
    RigidBody::new("cube", 1.0, Arc::new(shape)).with_gravity(Vector::new(0.0, 0.0, -9.8))
}

#[test]
fn one_second_of_free_fall() {
    let mut body = falling_cube();
    body.integrate(1.0);

    assert_relative_eq!(body.position.translation.vector.z, -4.9, epsilon = 1.0e-12);
    assert_relative_eq!(body.linvel.z, -9.8, epsilon = 1.0e-12);

    body.apply_damping(1.0, 0.1);
    assert_relative_eq!(body.linvel.z, -8.82, epsilon = 1.0e-12);
}

#[test]
fn undamped_scene_matches_a_single_body() {
    let params = IntegrationParameters {
        num_substeps: 1,
        damping: 0.0,
        ..IntegrationParameters::default()
    };
    let mut physics = Physics::with_parameters(params);
    let _ = physics.add_rigid_body(falling_cube());

    let events = physics.resolve(1.0, 1.0);
    assert!(events.is_empty());

    let body = physics.rigid_body("cube").unwrap();
    assert_relative_eq!(body.position.translation.vector.z, -4.9, epsilon = 1.0e-12);
    assert_relative_eq!(body.linvel.z, -9.8, epsilon = 1.0e-12);
}

#[test]
fn speed_scales_the_time_step() {
    let params = IntegrationParameters {
        num_substeps: 4,
        damping: 0.0,
        ..IntegrationParameters::default()
    };
    let mut slow = Physics::with_parameters(params);
    let mut fast = Physics::with_parameters(params);
    let _ = slow.add_rigid_body(falling_cube());
    let _ = fast.add_rigid_body(falling_cube());

    for _ in 0..2 {
        let _ = slow.resolve(0.5, 0.5);
    }
    let _ = fast.resolve(1.0, 0.5);

    assert_relative_eq!(
        slow.rigid_body("cube").unwrap().linvel,
        fast.rigid_body("cube").unwrap().linvel,
        epsilon = 1.0e-12
    );
}
