use tumble3d::math::{Isometry, Point, Vector};
use tumble3d::query::Ray;
use tumble3d::shape::{CollisionShape, Sphere};

#[test]
fn overlapping_unit_spheres() {
    let a = Sphere::new(Point::origin(), 1.0);
    let b = Sphere::new(Point::origin(), 1.0);
    let inter = a.collide_sphere(&b, &Isometry::translation(1.5, 0.0, 0.0)).unwrap();

    assert_relative_eq!(inter.depth, 0.5, epsilon = 1.0e-9);
    // `a` has to move away from `b`.
    assert_relative_eq!(*inter.normal, -Vector::x(), epsilon = 1.0e-9);
    assert_relative_eq!(inter.point, Point::new(0.75, 0.0, 0.0), epsilon = 1.0e-9);
}

#[test]
fn ray_hits_the_top_of_a_sphere() {
    let sphere = CollisionShape::from(Sphere::new(Point::origin(), 1.0));
    let hit = sphere
        .ray_intersection(&Ray::new(Point::new(0.0, 0.0, 5.0), -Vector::z()))
        .unwrap();

    assert_relative_eq!(hit.time_of_impact, 4.0, epsilon = 1.0e-9);
    assert_relative_eq!(hit.point, Point::new(0.0, 0.0, 1.0), epsilon = 1.0e-9);
    assert_relative_eq!(hit.normal, Vector::z(), epsilon = 1.0e-9);
}
