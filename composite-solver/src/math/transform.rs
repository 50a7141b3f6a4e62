//! Rotation of stiffness and compliance between material and reference axes
//!
//! The ply angle θ is measured from the reference x-axis to the material
//! 1-axis, positive counter-clockwise about z. Stresses rotate as
//! `σ_ref = Tσ(θ) σ_mat` and engineering strains as `ε_ref = Tε(θ) ε_mat`
//! with `Tε = Tσ^-T`, so
//!
//! - stiffness: `C_ref = Tσ C_mat Tσ^T`
//! - compliance: `S_ref = Tε S_mat Tε^T`
//!
//! Rotating by `-θ` undoes a rotation by `θ`.

use std::ops::Neg;

use serde::{Deserialize, Serialize};

use super::{ConstitutiveMatrix, Dimensionality, Frame, Mat3, Mat6, Quantity};
use crate::error::{CompositeError, CompositeResult};

/// A ply orientation, stored in degrees normalized to (-180, 180]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Angle {
    degrees: f64,
}

impl Angle {
    pub fn degrees(degrees: f64) -> Self {
        let wrapped = degrees.rem_euclid(360.0);
        let degrees = if wrapped > 180.0 { wrapped - 360.0 } else { wrapped };
        Self { degrees }
    }

    pub fn radians(radians: f64) -> Self {
        Self::degrees(radians.to_degrees())
    }

    pub fn as_degrees(self) -> f64 {
        self.degrees
    }

    pub fn as_radians(self) -> f64 {
        self.degrees.to_radians()
    }

    pub fn is_finite(self) -> bool {
        self.degrees.is_finite()
    }

    fn sin_cos(self) -> (f64, f64) {
        self.as_radians().sin_cos()
    }
}

impl Neg for Angle {
    type Output = Angle;

    fn neg(self) -> Angle {
        Angle::degrees(-self.degrees)
    }
}

impl From<f64> for Angle {
    fn from(degrees: f64) -> Self {
        Angle::degrees(degrees)
    }
}

impl From<Angle> for f64 {
    fn from(angle: Angle) -> f64 {
        angle.degrees
    }
}

/// Stress rotation Tσ for plane stress components (11, 22, 12)
#[rustfmt::skip]
pub fn plane_stress_stress_rotation(angle: Angle) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        c * c,  s * s,  -2.0 * s * c,
        s * s,  c * c,  2.0 * s * c,
        s * c,  -s * c, c * c - s * s,
    )
}

/// Engineering strain rotation Tε for plane stress components (11, 22, 12)
#[rustfmt::skip]
pub fn plane_stress_strain_rotation(angle: Angle) -> Mat3 {
    let (s, c) = angle.sin_cos();
    Mat3::new(
        c * c,        s * s,       -s * c,
        s * s,        c * c,       s * c,
        2.0 * s * c,  -2.0 * s * c, c * c - s * s,
    )
}

/// Stress rotation Tσ about the 3-axis for Voigt components (11, 22, 33, 23, 13, 12)
#[rustfmt::skip]
pub fn solid_stress_rotation(angle: Angle) -> Mat6 {
    let (s, c) = angle.sin_cos();
    Mat6::from_row_slice(&[
        c * c,  s * s,  0.0, 0.0, 0.0, -2.0 * s * c,
        s * s,  c * c,  0.0, 0.0, 0.0, 2.0 * s * c,
        0.0,    0.0,    1.0, 0.0, 0.0, 0.0,
        0.0,    0.0,    0.0, c,   s,   0.0,
        0.0,    0.0,    0.0, -s,  c,   0.0,
        s * c,  -s * c, 0.0, 0.0, 0.0, c * c - s * s,
    ])
}

/// Engineering strain rotation Tε about the 3-axis for Voigt components
#[rustfmt::skip]
pub fn solid_strain_rotation(angle: Angle) -> Mat6 {
    let (s, c) = angle.sin_cos();
    Mat6::from_row_slice(&[
        c * c,        s * s,        0.0, 0.0, 0.0, -s * c,
        s * s,        c * c,        0.0, 0.0, 0.0, s * c,
        0.0,          0.0,          1.0, 0.0, 0.0, 0.0,
        0.0,          0.0,          0.0, c,   s,   0.0,
        0.0,          0.0,          0.0, -s,  c,   0.0,
        2.0 * s * c,  -2.0 * s * c, 0.0, 0.0, 0.0, c * c - s * s,
    ])
}

/// Rotate a stiffness or compliance matrix by `angle`.
///
/// The result is in the same dimensionality and the opposite frame. `family`
/// declares the expected dimensionality; a matrix of the other size fails with
/// [`CompositeError::DimensionMismatch`].
pub fn transform(
    matrix: &ConstitutiveMatrix,
    angle: Angle,
    family: Dimensionality,
) -> CompositeResult<ConstitutiveMatrix> {
    if matrix.dimensionality() != family {
        return Err(CompositeError::mismatch(family, matrix.dimensionality()));
    }

    let frame = matrix.frame().opposite();
    let quantity = matrix.quantity();

    Ok(match family {
        Dimensionality::PlaneStress => {
            let m = matrix.as_plane_stress()?;
            let t = match quantity {
                Quantity::Stiffness => plane_stress_stress_rotation(angle),
                Quantity::Compliance => plane_stress_strain_rotation(angle),
            };
            ConstitutiveMatrix::plane_stress(quantity, frame, t * m * t.transpose())
        }
        Dimensionality::Full3D => {
            let m = matrix.as_full_3d()?;
            let t = match quantity {
                Quantity::Stiffness => solid_stress_rotation(angle),
                Quantity::Compliance => solid_strain_rotation(angle),
            };
            ConstitutiveMatrix::full_3d(quantity, frame, t * m * t.transpose())
        }
    })
}

/// Rotate a material-axes matrix into the reference axes of a ply at `angle`
pub fn to_reference(matrix: &ConstitutiveMatrix, angle: Angle) -> CompositeResult<ConstitutiveMatrix> {
    matrix.expect(matrix.quantity(), Frame::Material, matrix.dimensionality())?;
    transform(matrix, angle, matrix.dimensionality())
}

/// Rotate a reference-axes matrix back into the material axes of a ply at `angle`
pub fn to_material(matrix: &ConstitutiveMatrix, angle: Angle) -> CompositeResult<ConstitutiveMatrix> {
    matrix.expect(matrix.quantity(), Frame::Reference, matrix.dimensionality())?;
    transform(matrix, -angle, matrix.dimensionality())
}
