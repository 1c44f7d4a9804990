use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tumble3d::bounding_volume::Aabb;
use tumble3d::dynamics::{CollisionObject, Physics, RigidBody};
use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::query::Ray;
use tumble3d::shape::{CollisionHierarchy, DeferredArray, Terrain};

fn cube(half_extent: f64) -> Arc<CollisionHierarchy> {
    Arc::new(CollisionHierarchy::new(Aabb::from_half_extents(
        Point::origin(),
        Vector::repeat(half_extent),
    )))
}

fn ground() -> CollisionObject {
    let slab = Aabb::from_half_extents(Point::origin(), Vector::new(10.0, 10.0, 0.5));
    CollisionObject::new("ground", Isometry::identity(), Arc::new(CollisionHierarchy::new(slab)))
}

#[test]
fn falling_box_lands_on_the_ground() {
    let mut physics = Physics::new();
    physics.add_collision(ground());
    let _ = physics.add_rigid_body(
        RigidBody::new("crate", 1.0, cube(0.5))
            .with_position(Isometry::translation(0.0, 0.0, 2.0))
            .with_gravity(Vector::new(0.0, 0.0, -9.8)),
    );

    let mut landed = false;
    for _ in 0..40 {
        let events = physics.resolve(1.0, 0.05);
        assert!(events.body_body.is_empty());

        for event in &events.body_static {
            assert_eq!(event.first, "crate");
            assert_eq!(event.second, "ground");
            assert_relative_eq!(*event.intersection.normal, Vector::z(), epsilon = 1.0e-9);
            landed = true;
        }
    }

    assert!(landed);
    let body = physics.rigid_body("crate").unwrap();
    assert_relative_eq!(body.position.translation.vector.z, 1.0, epsilon = 1.0e-6);
    assert!(body.linvel.z.abs() < 1.0e-6);
}

#[test]
fn rays_report_the_nearest_object_first() {
    let mut physics = Physics::new();
    let near = Isometry::translation(5.0, 0.0, 0.0);
    physics.add_collision(CollisionObject::new("near", near, cube(0.5)));
    let far = Isometry::translation(10.0, 0.0, 0.0);
    physics.add_collision(CollisionObject::new("far", far, cube(0.5)));
    let _ = physics.add_rigid_body(
        RigidBody::new("middle", 1.0, cube(0.5))
            .with_position(Isometry::translation(7.5, 0.0, 0.0)),
    );
    assert!(physics.validate());

    let ray = Ray::new(Point::origin(), Vector::x());
    let mut hits = Vec::new();
    physics.ray_intersection(&ray, |name, hit| {
        hits.push((name.to_string(), hit.time_of_impact));
        true
    });

    let names: Vec<_> = hits.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["near", "middle", "far"]);
    assert_relative_eq!(hits[0].1, 4.5, epsilon = 1.0e-9);
    assert_relative_eq!(hits[1].1, 7.0, epsilon = 1.0e-9);
    assert_relative_eq!(hits[2].1, 9.5, epsilon = 1.0e-9);

    let mut first = None;
    physics.ray_intersection(&ray, |name, _| {
        assert!(first.is_none(), "the callback asked to stop");
        first = Some(name.to_string());
        false
    });
    assert_eq!(first.as_deref(), Some("near"));
}

#[test]
fn nothing_moves_until_the_scene_is_loaded() {
    let loaded = Arc::new(AtomicBool::new(false));
    let flag = loaded.clone();
    let heights: DeferredArray<f64> = DeferredArray::deferred(Arc::new(move || {
        flag.load(Ordering::SeqCst).then(|| vec![0.0; 16])
    }));
    let origin = Point::new(-15.0, -15.0, 0.0);
    let terrain = Terrain::from_deferred(heights, 4, 4, (10.0, 10.0), origin).unwrap();

    let mut physics = Physics::new();
    physics.add_collision(CollisionObject::new(
        "terrain",
        Isometry::identity(),
        Arc::new(CollisionHierarchy::new(terrain)),
    ));
    let start = Isometry::translation(0.0, 0.0, 5.0);
    let _ = physics.add_rigid_body(
        RigidBody::new("ball", 1.0, cube(0.5))
            .with_position(start)
            .with_gravity(Vector::new(0.0, 0.0, -9.8)),
    );

    for _ in 0..3 {
        assert!(physics.resolve(1.0, 0.1).is_empty());
        assert_eq!(physics.rigid_body("ball").unwrap().position, start);
    }

    loaded.store(true, Ordering::SeqCst);
    let _ = physics.resolve(1.0, 0.1);
    assert!(physics.rigid_body("ball").unwrap().position.translation.vector.z < 5.0);
}

#[test]
fn static_pairs_are_only_tested_after_moving() {
    let mut physics = Physics::new();
    physics.add_collision(ground());
    let pillar = Isometry::translation(0.0, 0.0, 0.8);
    physics.add_collision(CollisionObject::new("pillar", pillar, cube(0.5)));

    let events = physics.resolve(1.0, 0.1);
    assert_eq!(events.static_static.len(), 1);
    assert!(events.involves("pillar"));

    assert!(physics.resolve(1.0, 0.1).static_static.is_empty());

    physics.collision_object_mut("pillar").unwrap().position = Isometry::translation(1.0, 0.0, 0.9);
    let events = physics.resolve(1.0, 0.1);
    assert_eq!(events.static_static.len(), 1);
    assert_relative_eq!(events.static_static[0].intersection.depth, 0.1, epsilon = 1.0e-9);

    physics.collision_object_mut("pillar").unwrap().position = Isometry::translation(0.0, 0.0, 5.0);
    assert!(physics.resolve(1.0, 0.1).static_static.is_empty());
}

#[test]
fn excluded_bodies_pass_through_each_other() {
    let mut physics = Physics::new();
    let mut ghost =
        RigidBody::new("ghost", 1.0, cube(0.5)).with_linvel(Vector::new(-1.0, 0.0, 0.0));
    ghost.exclude("wall");
    let _ = physics.add_rigid_body(ghost);
    let _ = physics.add_rigid_body(
        RigidBody::new("wall", 1.0, cube(0.5)).with_position(Isometry::translation(0.8, 0.0, 0.0)),
    );

    let events = physics.resolve(1.0, 0.1);
    assert!(events.body_body.is_empty());
    assert_relative_eq!(physics.rigid_body("ghost").unwrap().linvel.x, -1.0, epsilon = 1.0e-12);
}
