use tumble3d::bounding_volume::{Aabb, BoundingVolume};
use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::shape::{CollisionShape, ConvexHull};

fn random_vector(rng: &mut oorandom::Rand64) -> Vector {
    Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float())
}

fn random_box(rng: &mut oorandom::Rand64) -> Aabb {
    let center = Point::from(random_vector(rng) * 2.0);
    let half_extents = random_vector(rng) + Vector::repeat(0.1);
    Aabb::from_half_extents(center, half_extents)
}

fn random_position(rng: &mut oorandom::Rand64) -> Isometry {
    let axisangle = (random_vector(rng) - Vector::repeat(0.5)) * 6.0;
    Isometry::new(random_vector(rng), axisangle)
}

fn tetrahedron() -> ConvexHull {
    let vertices = vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.5, 0.0, 0.0),
        Point::new(0.0, 1.5, 0.0),
        Point::new(0.0, 0.0, 1.5),
    ];
    let indices = vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]];
    ConvexHull::new(vertices, indices).unwrap()
}

/// Checks that colliding `a` with `b` and `b` with `a` describe the same contact.
fn assert_symmetric_contact(a: &CollisionShape, b: &CollisionShape, pos12: &Isometry) {
    let pos21 = pos12.inverse();
    let ab = a.collide(b, pos12);
    let ba = b.collide(a, &pos21);
    assert_eq!(ab.is_some(), ba.is_some());

    if let (Some(ab), Some(ba)) = (ab, ba) {
        assert_relative_eq!(ab.depth, ba.depth, epsilon = 1.0e-6);
        assert_relative_eq!(*ab.normal, -(pos12 * *ba.normal), epsilon = 1.0e-6);
    }
}

#[test]
fn overlapping_and_disjoint_boxes() {
    let cube = |mins: f64, maxs: f64| {
        CollisionShape::from(Aabb::new(Point::new(mins, mins, mins), Point::new(maxs, maxs, maxs)))
    };
    let a = cube(-1.0, 1.0);
    let b = cube(0.5, 2.0);
    let c = cube(2.0, 3.0);
    let id = Isometry::identity();

    assert!(a.intersects(&b, &id));
    assert!(!a.intersects(&c, &id));
    assert!(a.collide(&b, &id).is_some());
    assert!(a.collide(&c, &id).is_none());
}

#[test]
fn box_queries_are_symmetric() {
    let mut rng = oorandom::Rand64::new(42);

    for _ in 0..500 {
        let a = CollisionShape::from(random_box(&mut rng));
        let b = CollisionShape::from(random_box(&mut rng));
        let t = random_vector(&mut rng);
        let pos12 = Isometry::translation(t.x, t.y, t.z);

        assert_eq!(a.intersects(&b, &pos12), b.intersects(&a, &pos12.inverse()));
        assert_symmetric_contact(&a, &b, &pos12);
    }
}

#[test]
fn rotated_box_queries_are_symmetric() {
    let mut rng = oorandom::Rand64::new(1234);
    let mut num_contacts = 0;

    for _ in 0..500 {
        let a = CollisionShape::from(random_box(&mut rng));
        let b = CollisionShape::from(random_box(&mut rng));
        let pos12 = random_position(&mut rng);

        if a.collide(&b, &pos12).is_some() {
            num_contacts += 1;
        }
        assert_symmetric_contact(&a, &b, &pos12);
    }

    assert!(num_contacts > 0);
}

#[test]
fn hull_queries_are_symmetric() {
    let mut rng = oorandom::Rand64::new(99);
    let tetra = CollisionShape::from(tetrahedron());
    let mut num_contacts = 0;

    for _ in 0..500 {
        let cube = CollisionShape::from(ConvexHull::from_aabb(&random_box(&mut rng)));
        let pos12 = random_position(&mut rng);

        if tetra.collide(&cube, &pos12).is_some() {
            num_contacts += 1;
        }
        assert_symmetric_contact(&tetra, &cube, &pos12);
    }

    assert!(num_contacts > 0);
}

#[test]
fn rebounding_a_box_never_shrinks_it() {
    let mut rng = oorandom::Rand64::new(7);

    for _ in 0..200 {
        let aabb = random_box(&mut rng);
        let axis = random_vector(&mut rng) * 3.0;
        let m = Isometry::new(Vector::new(rng.rand_float(), -1.0, 4.0), axis);

        let round_trip = aabb.transform_by(&m).transform_by(&m.inverse());
        assert!(round_trip.loosened(1.0e-9).contains(&aabb));
    }
}
