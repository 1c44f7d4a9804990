use tumble3d::bounding_volume::Aabb;
use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::shape::{CollisionHierarchy, CollisionShape, ConvexHull, Sphere};

fn leaves() -> Vec<CollisionShape> {
    vec![
        Sphere::new(Point::new(-1.5, 0.0, 0.0), 0.5).into(),
        Aabb::from_half_extents(Point::new(0.0, 0.0, 0.0), Vector::new(0.5, 0.3, 0.3)).into(),
        ConvexHull::from_aabb(&Aabb::from_half_extents(
            Point::new(1.5, 0.0, 0.0),
            Vector::repeat(0.4),
        ))
        .into(),
        Sphere::new(Point::new(3.0, 0.0, 0.0), 0.5).into(),
    ]
}

fn bounds() -> Aabb {
    Aabb::new(Point::new(-2.0, -0.5, -0.5), Point::new(3.5, 0.5, 0.5))
}

#[test]
fn childless_hierarchy_is_its_primitive() {
    let target = CollisionShape::from(Sphere::new(Point::origin(), 1.0));
    let target_tree = CollisionHierarchy::new(target.clone());
    let mut rng = oorandom::Rand64::new(3);

    for shape in leaves() {
        let tree = CollisionHierarchy::new(shape.clone());

        for _ in 0..50 {
            let pos12 = Isometry::new(
                Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float()) * 4.0
                    - Vector::repeat(2.0),
                Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float()),
            );
            let direct: Vec<_> = shape.collide(&target, &pos12).into_iter().collect();
            assert_eq!(tree.collisions(&target_tree, &pos12), direct);
        }
    }
}

#[test]
fn nested_levels_report_the_leaf_contacts() {
    let flat = CollisionHierarchy::with_children(
        bounds(),
        leaves().into_iter().map(CollisionHierarchy::new).collect(),
    );

    // Same leaves, grouped two by two under tighter boxes.
    let mut shapes = leaves().into_iter().map(CollisionHierarchy::new);
    let left = CollisionHierarchy::with_children(
        Aabb::new(Point::new(-2.0, -0.5, -0.5), Point::new(0.5, 0.5, 0.5)),
        vec![shapes.next().unwrap(), shapes.next().unwrap()],
    );
    let right = CollisionHierarchy::with_children(
        Aabb::new(Point::new(1.0, -0.5, -0.5), Point::new(3.5, 0.5, 0.5)),
        vec![shapes.next().unwrap(), shapes.next().unwrap()],
    );
    let nested = CollisionHierarchy::with_children(
        bounds(),
        vec![CollisionHierarchy::with_children(bounds(), vec![left, right])],
    );
    assert_eq!(nested.depth(), 4);

    let floor = CollisionHierarchy::new(Aabb::from_half_extents(
        Point::origin(),
        Vector::new(10.0, 10.0, 0.5),
    ));
    let pos12 = Isometry::translation(0.0, 0.0, -0.75);

    let expected = flat.collisions(&floor, &pos12);
    let found = nested.collisions(&floor, &pos12);
    assert_eq!(expected.len(), 4);
    assert_eq!(found, expected);

    for hit in &found {
        assert_relative_eq!(*hit.normal, Vector::z(), epsilon = 1.0e-9);
    }
}

#[test]
fn floor_against_a_hierarchy_sees_flipped_normals() {
    let tree = CollisionHierarchy::with_children(
        bounds(),
        leaves().into_iter().map(CollisionHierarchy::new).collect(),
    );
    let floor = CollisionHierarchy::new(Aabb::from_half_extents(
        Point::origin(),
        Vector::new(10.0, 10.0, 0.5),
    ));
    let pos12 = Isometry::translation(0.0, 0.0, 0.75);

    let hits = floor.collisions(&tree, &pos12);
    assert_eq!(hits.len(), 4);
    for hit in &hits {
        assert_relative_eq!(*hit.normal, -Vector::z(), epsilon = 1.0e-9);
    }
}
