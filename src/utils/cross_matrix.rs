use crate::math::{CrossMatrix, Vector};

/// The matrix `[v]ₓ` such that `[v]ₓ * w == v.cross(&w)`.
#[inline]
pub fn cross_matrix(v: &Vector) -> CrossMatrix {
    CrossMatrix::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}
