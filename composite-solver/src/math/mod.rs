//! Mathematical utilities for laminate calculations
//!
//! All constitutive quantities are fixed-size: 3x3 for plane stress and
//! 6x6 for full 3D in Voigt order `[11, 22, 33, 23, 13, 12]`.

pub mod matrix;
pub mod transform;

use nalgebra::{Matrix3, Matrix6, SMatrix};
use serde::{Serialize, Serializer};

pub use matrix::{ConstitutiveMatrix, Dimensionality, Frame, Quantity};
pub use transform::{
    plane_stress_strain_rotation, plane_stress_stress_rotation, solid_strain_rotation,
    solid_stress_rotation, to_material, to_reference, transform, Angle,
};

pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;

/// Voigt indices of the in-plane components (11, 22, 12) in a 6x6 matrix
pub const IN_PLANE: [usize; 3] = [0, 1, 5];
/// Voigt indices of the out-of-plane components (33, 23, 13) in a 6x6 matrix
pub const OUT_OF_PLANE: [usize; 3] = [2, 3, 4];

/// Reciprocal condition number below which an inversion is reported as singular
pub const DEFAULT_CONDITIONING_TOLERANCE: f64 = 1e-12;

/// Inversions within this factor of the tolerance are logged as ill-conditioned
const CONDITIONING_WARNING_FACTOR: f64 = 1e3;

/// Inversion rejected by the conditioning check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IllConditioned {
    /// Reciprocal 1-norm condition number (0 when the factorization broke down)
    pub rcond: f64,
}

/// Square matrices that can be inverted through an LU factorization with partial pivoting
pub trait LuInverse: Sized {
    fn lu_inverse(&self) -> Option<Self>;
}

macro_rules! impl_lu_inverse {
    ($($t:ty),*) => {
        $(
            impl LuInverse for $t {
                fn lu_inverse(&self) -> Option<Self> {
                    (*self).lu().try_inverse()
                }
            }
        )*
    };
}

impl_lu_inverse!(Mat3, Mat6);

/// Maximum absolute column sum
pub fn one_norm<const N: usize>(m: &SMatrix<f64, N, N>) -> f64 {
    m.column_iter()
        .map(|col| col.iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max)
}

/// Invert `m`, rejecting the result when `1 / (|m|_1 |m^-1|_1)` falls below `tolerance`.
///
/// Returns the inverse together with the reciprocal condition number.
pub fn checked_inverse<const N: usize>(
    m: &SMatrix<f64, N, N>,
    tolerance: f64,
) -> Result<(SMatrix<f64, N, N>, f64), IllConditioned>
where
    SMatrix<f64, N, N>: LuInverse,
{
    if m.iter().any(|v| !v.is_finite()) {
        return Err(IllConditioned { rcond: 0.0 });
    }

    let norm = one_norm(m);
    if norm == 0.0 {
        return Err(IllConditioned { rcond: 0.0 });
    }

    let inverse = m.lu_inverse().ok_or(IllConditioned { rcond: 0.0 })?;
    let rcond = 1.0 / (norm * one_norm(&inverse));

    // NaN on either side rejects
    if !(rcond.is_finite() && rcond >= tolerance) {
        return Err(IllConditioned { rcond });
    }
    if rcond < tolerance * CONDITIONING_WARNING_FACTOR {
        log::warn!(
            "{N}x{N} inversion is ill-conditioned (rcond = {rcond:e}, tolerance = {tolerance:e})"
        );
    }

    Ok((inverse, rcond))
}

/// Extract the 3x3 block of a 6x6 matrix at the given Voigt rows and columns
pub fn block(m: &Mat6, rows: [usize; 3], cols: [usize; 3]) -> Mat3 {
    Mat3::from_fn(|i, j| m[(rows[i], cols[j])])
}

/// Scatter four 3x3 blocks (in-plane / out-of-plane partition) back into a 6x6 matrix
pub fn assemble_blocks(ee: &Mat3, et: &Mat3, te: &Mat3, tt: &Mat3) -> Mat6 {
    let mut m = Mat6::zeros();
    for i in 0..3 {
        for j in 0..3 {
            m[(IN_PLANE[i], IN_PLANE[j])] = ee[(i, j)];
            m[(IN_PLANE[i], OUT_OF_PLANE[j])] = et[(i, j)];
            m[(OUT_OF_PLANE[i], IN_PLANE[j])] = te[(i, j)];
            m[(OUT_OF_PLANE[i], OUT_OF_PLANE[j])] = tt[(i, j)];
        }
    }
    m
}

/// Largest absolute asymmetry relative to the largest entry
pub fn relative_asymmetry<const N: usize>(m: &SMatrix<f64, N, N>) -> f64 {
    let scale = m.amax();
    if scale == 0.0 {
        return 0.0;
    }
    (m - m.transpose()).amax() / scale
}

/// Convert a matrix to row-major nested vectors for serialization
pub fn to_rows<const N: usize>(m: &SMatrix<f64, N, N>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

/// `serialize_with` helper writing a matrix as row-major nested arrays
pub fn serialize_rows<S: Serializer, const N: usize>(
    m: &SMatrix<f64, N, N>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    to_rows(m).serialize(serializer)
}
