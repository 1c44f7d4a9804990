use crate::math::{Point, Real, Vector};
use smallvec::SmallVec;

/// A polygon produced by clipping, stored inline for the common small cases.
pub type ClippedPolygon = SmallVec<[Point; 8]>;

/// Cuts a polygon with the given half-space.
///
/// Given the half-space `center` and outward `normal`,
/// this computes the intersecting between the half-space and
/// the polygon. (Note that a point `pt` is considered as inside of
/// the half-space if `normal.dot(&(pt - center)) <= 0.0`.
///
/// The vertex order of `polygon` is preserved in `result`.
pub fn clip_halfspace_polygon(
    center: &Point,
    normal: &Vector,
    polygon: &[Point],
    result: &mut ClippedPolygon,
) {
    result.clear();

    let Some(last_pt) = polygon.last() else {
        return;
    };

    let dist = |pt: &Point| (pt - center).dot(normal);
    let mut prev_pt = *last_pt;
    let mut prev_dist = dist(last_pt);

    for pt in polygon {
        let curr_dist = dist(pt);

        if (prev_dist <= 0.0) != (curr_dist <= 0.0) {
            // We crossed the plane, so we need
            // to cut the edge.
            let denom = prev_dist - curr_dist;
            if denom != 0.0 {
                let t: Real = prev_dist / denom;
                result.push(prev_pt + (pt - prev_pt) * t);
            }
        }

        if curr_dist <= 0.0 {
            result.push(*pt);
        }

        prev_pt = *pt;
        prev_dist = curr_dist;
    }
}
