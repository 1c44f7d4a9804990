use crate::bounding_volume::Aabb;
use crate::math::{Isometry, UnitVector, Vector, DIM};
use crate::query::sat::{axis_penetration, Penetration};
use arrayvec::ArrayVec;

/// Edge cross products shorter than this are considered degenerate.
const DEGENERATE_AXIS_EPSILON: f64 = 1.0e-9;

/// Finds the axis of minimum penetration between two oriented boxes.
///
/// `aabb1` is expressed in its own local-space and `aabb2` is positioned
/// relative to it by `pos12`. The 15 candidate axes are the 3 face normals
/// of each box and the 9 cross products of their edge directions; cross
/// products of (nearly) parallel edges are skipped. Returns `None` as soon
/// as one of the axes separates the boxes.
pub fn aabb_aabb_penetration(aabb1: &Aabb, aabb2: &Aabb, pos12: &Isometry) -> Option<Penetration> {
    let center1 = aabb1.center().coords;
    let half1 = aabb1.half_extents();
    let center2 = (pos12 * aabb2.center()).coords;
    let half2 = aabb2.half_extents();

    let rot = pos12.rotation.to_rotation_matrix();
    let axes2: [Vector; DIM] = [
        rot.matrix().column(0).into_owned(),
        rot.matrix().column(1).into_owned(),
        rot.matrix().column(2).into_owned(),
    ];

    let mut axes = ArrayVec::<UnitVector, 15>::new();
    for i in 0..DIM {
        axes.push(Vector::ith_axis(i));
    }
    for axis2 in &axes2 {
        axes.push(UnitVector::new_unchecked(*axis2));
    }
    for i in 0..DIM {
        for axis2 in &axes2 {
            let cross = Vector::ith(i, 1.0).cross(axis2);
            if let Some(axis) = UnitVector::try_new(cross, DEGENERATE_AXIS_EPSILON) {
                axes.push(axis);
            }
        }
    }

    let mut best = None;

    for axis in &axes {
        // The projection radius of each box picks the support vertex by the
        // sign of the rotation matrix entries along the axis.
        let radius1 = half1.dot(&axis.abs());
        let radius2 = half2.dot(&rot.inverse_transform_vector(axis).abs());
        let proj1 = center1.dot(axis);
        let proj2 = center2.dot(axis);

        axis_penetration(
            axis,
            (proj1 - radius1, proj1 + radius1),
            (proj2 - radius2, proj2 + radius2),
        )?
        .keep_shallowest(&mut best);
    }

    best
}
