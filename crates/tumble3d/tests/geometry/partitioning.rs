use std::collections::BTreeSet;
use tumble3d::bounding_volume::Aabb;
use tumble3d::math::{Point, Vector};
use tumble3d::partitioning::{Bucket3d, RTree};

fn random_boxes(rng: &mut oorandom::Rand64, n: usize, size: f64) -> Vec<Aabb> {
    (0..n)
        .map(|_| {
            let center = Point::new(rng.rand_float(), rng.rand_float(), rng.rand_float()) * 20.0;
            let half = Vector::new(rng.rand_float(), rng.rand_float(), rng.rand_float()) * size;
            Aabb::from_half_extents(center, half)
        })
        .collect()
}

#[test]
fn rtree_returns_exactly_the_overlapping_items() {
    let mut rng = oorandom::Rand64::new(99);
    let boxes = random_boxes(&mut rng, 300, 1.0);
    let tree = RTree::bulk_load(boxes.iter().copied().zip(0..).collect());

    for query in random_boxes(&mut rng, 50, 3.0) {
        let mut found: Vec<usize> = tree.query_aabb(&query).into_iter().copied().collect();
        found.sort_unstable();
        let expected: Vec<usize> =
            (0..boxes.len()).filter(|i| boxes[*i].overlaps(&query)).collect();
        assert_eq!(found, expected);
    }
}

#[test]
fn buckets_report_each_overlapping_pair_exactly_once() {
    let mut rng = oorandom::Rand64::new(5);
    let boxes = random_boxes(&mut rng, 200, 0.8);
    let max_radius = boxes
        .iter()
        .map(|b| b.half_extents().norm())
        .fold(0.0, f64::max);
    let mut scene = Aabb::new_invalid();
    for b in &boxes {
        scene.take_point(b.mins);
        scene.take_point(b.maxs);
    }

    let mut buckets = Bucket3d::new(Bucket3d::cell_size_for(max_radius, &scene));
    for (i, b) in boxes.iter().enumerate() {
        assert!(buckets.insert(i, b) <= 8);
    }

    let pairs = buckets.pairs();
    let unique: BTreeSet<_> = pairs.iter().copied().collect();
    assert_eq!(unique.len(), pairs.len());

    for i in 0..boxes.len() {
        for j in i + 1..boxes.len() {
            if boxes[i].overlaps(&boxes[j]) {
                assert!(unique.contains(&(i, j)), "missed pair ({}, {})", i, j);
            }
        }
    }
}
