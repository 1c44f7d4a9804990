use crate::math::{Matrix, Real, Vector};
use std::ops::{Add, Mul};

/// A 3x3 symmetric-definite-positive matrix.
///
/// Used for inertia tensors and their inverses: only the upper triangle is
/// stored.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SdpMatrix3 {
    /// The component at the first row and first column of this matrix.
    pub m11: Real,
    /// The component at the first row and second column of this matrix.
    pub m12: Real,
    /// The component at the first row and third column of this matrix.
    pub m13: Real,
    /// The component at the second row and second column of this matrix.
    pub m22: Real,
    /// The component at the second row and third column of this matrix.
    pub m23: Real,
    /// The component at the third row and third column of this matrix.
    pub m33: Real,
}

impl SdpMatrix3 {
    /// A new SDP 3x3 matrix with the given components.
    ///
    /// Because the matrix is symmetric, only the upper off-diagonal components is required.
    pub fn new(m11: Real, m12: Real, m13: Real, m22: Real, m23: Real, m33: Real) -> Self {
        Self {
            m11,
            m12,
            m13,
            m22,
            m23,
            m33,
        }
    }

    /// Build an `SdpMatrix3` structure from a plain matrix, assuming it is SDP.
    ///
    /// No check is performed to ensure `mat` is actually SDP.
    pub fn from_sdp_matrix(mat: Matrix) -> Self {
        Self {
            m11: mat.m11,
            m12: mat.m12,
            m13: mat.m13,
            m22: mat.m22,
            m23: mat.m23,
            m33: mat.m33,
        }
    }

    /// Create a new SDP matrix filled with zeros.
    pub fn zero() -> Self {
        Self::diagonal(0.0)
    }

    /// Create a new SDP matrix with its diagonal filled with `val`, and its off-diagonal elements set to zero.
    pub fn diagonal(val: Real) -> Self {
        Self::from_principal(Vector::repeat(val))
    }

    /// A diagonal matrix with the given principal components.
    pub fn from_principal(diag: Vector) -> Self {
        Self {
            m11: diag.x,
            m12: 0.0,
            m13: 0.0,
            m22: diag.y,
            m23: 0.0,
            m33: diag.z,
        }
    }

    /// Are all components of this matrix equal to zero?
    pub fn is_zero(&self) -> bool {
        self.m11 == 0.0
            && self.m12 == 0.0
            && self.m13 == 0.0
            && self.m22 == 0.0
            && self.m23 == 0.0
            && self.m33 == 0.0
    }

    /// Compute the inverse of this SDP matrix without performing any inversibility check.
    pub fn inverse_unchecked(&self) -> Self {
        let minor_m12_m23 = self.m22 * self.m33 - self.m23 * self.m23;
        let minor_m11_m23 = self.m12 * self.m33 - self.m13 * self.m23;
        let minor_m11_m22 = self.m12 * self.m23 - self.m13 * self.m22;

        let determinant =
            self.m11 * minor_m12_m23 - self.m12 * minor_m11_m23 + self.m13 * minor_m11_m22;
        let inv_det = 1.0 / determinant;

        SdpMatrix3 {
            m11: minor_m12_m23 * inv_det,
            m12: -minor_m11_m23 * inv_det,
            m13: minor_m11_m22 * inv_det,
            m22: (self.m11 * self.m33 - self.m13 * self.m13) * inv_det,
            m23: (self.m13 * self.m12 - self.m23 * self.m11) * inv_det,
            m33: (self.m11 * self.m22 - self.m12 * self.m12) * inv_det,
        }
    }

    /// Compute the quadratic form `m * self * m.transpose()`.
    ///
    /// With `m` a rotation matrix, this is the body-space tensor expressed in world-space.
    pub fn quadform(&self, m: &Matrix) -> Self {
        let full = m * self.into_matrix() * m.transpose();
        Self::from_sdp_matrix(full)
    }

    /// Convert this SDP matrix to a regular matrix representation.
    pub fn into_matrix(self) -> Matrix {
        Matrix::new(
            self.m11, self.m12, self.m13, self.m12, self.m22, self.m23, self.m13, self.m23,
            self.m33,
        )
    }
}

impl Add<SdpMatrix3> for SdpMatrix3 {
    type Output = SdpMatrix3;

    fn add(self, rhs: SdpMatrix3) -> Self::Output {
        SdpMatrix3 {
            m11: self.m11 + rhs.m11,
            m12: self.m12 + rhs.m12,
            m13: self.m13 + rhs.m13,
            m22: self.m22 + rhs.m22,
            m23: self.m23 + rhs.m23,
            m33: self.m33 + rhs.m33,
        }
    }
}

impl Mul<Real> for SdpMatrix3 {
    type Output = SdpMatrix3;

    fn mul(self, rhs: Real) -> Self::Output {
        SdpMatrix3 {
            m11: self.m11 * rhs,
            m12: self.m12 * rhs,
            m13: self.m13 * rhs,
            m22: self.m22 * rhs,
            m23: self.m23 * rhs,
            m33: self.m33 * rhs,
        }
    }
}

impl Mul<Vector> for SdpMatrix3 {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Self::Output {
        let x = self.m11 * rhs.x + self.m12 * rhs.y + self.m13 * rhs.z;
        let y = self.m12 * rhs.x + self.m22 * rhs.y + self.m23 * rhs.z;
        let z = self.m13 * rhs.x + self.m23 * rhs.y + self.m33 * rhs.z;
        Vector::new(x, y, z)
    }
}
