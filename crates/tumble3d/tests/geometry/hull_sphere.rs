use tumble3d::bounding_volume::Aabb;
use tumble3d::math::{Isometry, Point, Translation, Vector};
use tumble3d::shape::{ConvexHull, Sphere};

fn rand_vector(rng: &mut oorandom::Rand64, scale: f64) -> Vector {
    Vector::new(
        rng.rand_float() * 2.0 - 1.0,
        rng.rand_float() * 2.0 - 1.0,
        rng.rand_float() * 2.0 - 1.0,
    ) * scale
}

// Pushing the sphere out of the hull by the reported depth along the
// reported normal separates them, pushing it by half of it does not.
#[test]
fn depth_and_normal_separate_the_sphere() {
    let mut rng = oorandom::Rand64::new(1234);
    let mut num_hits = 0;

    for _ in 0..500 {
        let half_extents = rand_vector(&mut rng, 1.0).abs() + Vector::repeat(0.5);
        let hull = ConvexHull::from_aabb(&Aabb::from_half_extents(Point::origin(), half_extents));
        let sphere = Sphere::new(Point::origin(), 0.2 + rng.rand_float());
        let pos12 = Isometry::new(rand_vector(&mut rng, 3.0), rand_vector(&mut rng, 3.0));

        let Some(inter) = hull.collide_sphere(&sphere, &pos12) else {
            continue;
        };
        num_hits += 1;
        assert!(inter.depth >= 0.0);

        let push = |dist: f64| Translation::from(-*inter.normal * dist) * pos12;
        assert!(hull.collide_sphere(&sphere, &push(inter.depth + 1.0e-4)).is_none());

        if inter.depth > 1.0e-3 {
            assert!(hull.collide_sphere(&sphere, &push(inter.depth * 0.5)).is_some());
        }
    }

    assert!(num_hits > 50);
}
