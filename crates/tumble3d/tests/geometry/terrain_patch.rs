use tumble3d::bounding_volume::Aabb;
use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::shape::{CollisionShape, Sphere, Terrain};

fn hills() -> Terrain {
    let (rows, cols) = (20, 30);
    let heights = (0..rows * cols)
        .map(|k| {
            let (i, j) = ((k / cols) as f64, (k % cols) as f64);
            (i * 0.3).sin() + (j * 0.2).cos()
        })
        .collect();
    Terrain::new(heights, rows, cols, (0.5, 0.75), Point::new(-5.0, -5.0, 0.0)).unwrap()
}

#[test]
fn patches_only_cover_cells_under_the_query() {
    let terrain = hills();
    let mut rng = oorandom::Rand64::new(17);

    for _ in 0..100 {
        let (x, y) = (rng.rand_float() * 14.0 - 5.0, rng.rand_float() * 14.0 - 5.0);
        let center = Point::new(x, y, 0.0);
        let half = Vector::new(rng.rand_float() * 2.0, rng.rand_float() * 2.0, 5.0);
        let query = Aabb::from_half_extents(center, half);

        let patch = terrain.patch(&query);
        let num_cells = terrain
            .cell_range(&query)
            .map(|(rows, cols)| rows.len() * cols.len())
            .unwrap_or(0);
        assert_eq!(patch.len(), num_cells * 2);

        for tri in patch.iter() {
            let bounds = tri.local_aabb();
            assert!(bounds.mins.x <= query.maxs.x && bounds.maxs.x >= query.mins.x);
            assert!(bounds.mins.y <= query.maxs.y && bounds.maxs.y >= query.mins.y);
        }
    }
}

#[test]
fn resting_sphere_touches_the_surface() {
    let terrain = CollisionShape::from(hills());
    let ball = CollisionShape::from(Sphere::new(Point::origin(), 0.5));

    let Some(ground) = (match &terrain {
        CollisionShape::Terrain(t) => t.height_at(0.1, 0.2),
        _ => None,
    }) else {
        panic!("point outside of the terrain");
    };

    let high = Isometry::translation(0.1, 0.2, ground + 2.0);
    assert!(terrain.collide(&ball, &high).is_none());

    let sunk = Isometry::translation(0.1, 0.2, ground + 0.3);
    let hit = terrain.collide(&ball, &sunk).unwrap();
    assert!(hit.depth > 0.0 && hit.depth <= 0.5);
    // The terrain is pushed down, away from the ball.
    assert!(hit.normal.z < 0.0);
}

fn flat_with_spike(spike: f64) -> Terrain {
    let mut heights = vec![0.0; 25];
    heights[12] = spike;
    Terrain::new(heights, 5, 5, (1.0, 1.0), Point::origin()).unwrap()
}

#[test]
fn sphere_hovering_over_a_spike_touches_its_tip() {
    let ball = CollisionShape::from(Sphere::new(Point::origin(), 2.0));
    let pos12 = Isometry::translation(3.1, 2.1, 2.15);

    // The ball floats above the flat ground.
    let flat = CollisionShape::from(flat_with_spike(0.0));
    assert!(flat.collide(&ball, &pos12).is_none());

    // No face lies under the ball center within its radius, but the raised
    // sample at (2, 2) pokes into it from the side.
    let spiked = CollisionShape::from(flat_with_spike(1.0));
    let hit = spiked.collide(&ball, &pos12).unwrap();
    assert_relative_eq!(hit.depth, 0.40574, epsilon = 1.0e-4);
    assert!(hit.normal.z < 0.0);
    assert!(hit.normal.x < 0.0 && hit.normal.y < 0.0);
}

#[test]
fn box_sunk_into_flat_ground() {
    let ground = CollisionShape::from(flat_with_spike(0.0));
    let cube = Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5));
    let cube = CollisionShape::from(cube);
    let pos12 = Isometry::translation(1.5, 1.5, 0.3);

    let hit = ground.collide(&cube, &pos12).unwrap();
    assert_relative_eq!(hit.depth, 0.2, epsilon = 1.0e-9);
    // Intersections on the ground side point down into it.
    assert_relative_eq!(*hit.normal, -Vector::z(), epsilon = 1.0e-9);

    let reversed = cube.collide(&ground, &pos12.inverse()).unwrap();
    assert_relative_eq!(reversed.depth, 0.2, epsilon = 1.0e-9);
    assert_relative_eq!(*reversed.normal, Vector::z(), epsilon = 1.0e-9);
}
