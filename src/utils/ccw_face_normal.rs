use crate::math::{Point, UnitVector, DEFAULT_EPSILON};

/// The unit normal of the triangle `pts`, assuming a counter-clockwise winding.
///
/// Returns `None` if the triangle is degenerate.
#[inline]
pub fn ccw_face_normal(pts: [&Point; 3]) -> Option<UnitVector> {
    let ab = *pts[1] - *pts[0];
    let ac = *pts[2] - *pts[0];
    let res = ab.cross(&ac);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}
