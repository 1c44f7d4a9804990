use tumble3d::bounding_volume::Aabb;
use tumble3d::math::{Point, Vector};
use tumble3d::shape::ConvexHull;

#[test]
fn derived_geometry_is_computed_once() {
    let aabb = Aabb::from_half_extents(Point::origin(), Vector::new(1.0, 2.0, 3.0));
    let hull = ConvexHull::from_aabb(&aabb);

    assert!(std::ptr::eq(hull.planes(), hull.planes()));
    assert!(std::ptr::eq(hull.edges(), hull.edges()));
    let list = hull.triangle_list().unwrap();
    assert!(std::ptr::eq(list, hull.triangle_list().unwrap()));
}

#[test]
fn concurrent_readers_share_one_cache() {
    let aabb = Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0));
    let hull = ConvexHull::from_aabb(&aabb);

    let addresses: Vec<usize> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| hull.planes().as_ptr() as usize))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(addresses.iter().all(|a| *a == addresses[0]));
    assert_eq!(addresses[0], hull.planes().as_ptr() as usize);
}
