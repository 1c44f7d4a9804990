use crate::bounding_volume::Aabb;
use crate::math::Isometry;
use crate::query::sat;
use crate::query::Intersection;

/// Intersection between two oriented boxes.
///
/// `aabb2` is positioned by `pos12` in the local-space of `aabb1`.
pub fn contact_aabb_aabb(pos12: &Isometry, aabb1: &Aabb, aabb2: &Aabb) -> Option<Intersection> {
    let pen = sat::aabb_aabb_penetration(aabb1, aabb2, pos12)?;
    let vertices2 = aabb2.vertices().map(|pt| pos12 * pt);
    let point = sat::contact_point_from_features(&pen.normal, &aabb1.vertices(), &vertices2);

    Some(Intersection::new(point, pen.normal, pen.depth))
}
