//! Result types for composite property calculations

use serde::{Deserialize, Serialize};

use crate::analysis::{
    CouplingConvention, ExtractionConvention, HomogenizationRule, MicromechanicsModel,
};
use crate::elements::MaterialProperties;
use crate::math::{serialize_rows, Angle, ConstitutiveMatrix, Mat3, Mat6};

/// Which response a set of in-plane constants was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantsBasis {
    /// Off-axis compliance of a single lamina
    Lamina,
    /// Inverse of A normalized by the laminate thickness h
    Extensional,
    /// Inverse of D normalized by h³/12
    Flexural,
}

/// In-plane engineering constants, tagged with the convention used to derive them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeringConstantsResult {
    /// Modulus along x
    pub e1: f64,
    /// Modulus along y
    pub e2: f64,
    /// In-plane shear modulus
    pub g12: f64,
    /// Major Poisson ratio (strain in y per strain in x under σx)
    pub nu12: f64,
    /// Minor Poisson ratio
    pub nu21: f64,
    /// Shear-coupling coefficient associated with direction 1
    pub eta_1: f64,
    /// Shear-coupling coefficient associated with direction 2
    pub eta_2: f64,
    pub basis: ConstantsBasis,
    pub coupling: CouplingConvention,
}

impl EngineeringConstantsResult {
    /// Read constants from a normalized 3x3 compliance over (11, 22, 12)
    pub fn from_compliance(s: &Mat3, basis: ConstantsBasis, coupling: CouplingConvention) -> Self {
        let (eta_1, eta_2) = match coupling {
            CouplingConvention::ShearPerNormal => {
                (s[(2, 0)] / s[(0, 0)], s[(2, 1)] / s[(1, 1)])
            }
            CouplingConvention::NormalPerShear => {
                (-s[(0, 2)] / s[(2, 2)], -s[(1, 2)] / s[(2, 2)])
            }
        };

        Self {
            e1: 1.0 / s[(0, 0)],
            e2: 1.0 / s[(1, 1)],
            g12: 1.0 / s[(2, 2)],
            nu12: -s[(0, 1)] / s[(0, 0)],
            nu21: -s[(0, 1)] / s[(1, 1)],
            eta_1,
            eta_2,
            basis,
            coupling,
        }
    }
}

/// The nine engineering constants of an orthotropic solid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidConstants {
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
    pub g12: f64,
    pub g13: f64,
    pub g23: f64,
    pub nu12: f64,
    pub nu13: f64,
    pub nu23: f64,
}

impl SolidConstants {
    /// Read constants from a 6x6 compliance in Voigt order (11, 22, 33, 23, 13, 12)
    pub fn from_compliance(s: &Mat6) -> Self {
        Self {
            e1: 1.0 / s[(0, 0)],
            e2: 1.0 / s[(1, 1)],
            e3: 1.0 / s[(2, 2)],
            g12: 1.0 / s[(5, 5)],
            g13: 1.0 / s[(4, 4)],
            g23: 1.0 / s[(3, 3)],
            nu12: -s[(0, 1)] / s[(0, 0)],
            nu13: -s[(0, 2)] / s[(0, 0)],
            nu23: -s[(1, 2)] / s[(1, 1)],
        }
    }

    /// Orthotropic compliance in Voigt order (11, 22, 33, 23, 13, 12)
    #[rustfmt::skip]
    pub fn compliance(&self) -> Mat6 {
        let s12 = -self.nu12 / self.e1;
        let s13 = -self.nu13 / self.e1;
        let s23 = -self.nu23 / self.e2;
        Mat6::from_row_slice(&[
            1.0 / self.e1, s12,           s13,           0.0,            0.0,            0.0,
            s12,           1.0 / self.e2, s23,           0.0,            0.0,            0.0,
            s13,           s23,           1.0 / self.e3, 0.0,            0.0,            0.0,
            0.0,           0.0,           0.0,           1.0 / self.g23, 0.0,            0.0,
            0.0,           0.0,           0.0,           0.0,            1.0 / self.g13, 0.0,
            0.0,           0.0,           0.0,           0.0,            0.0,            1.0 / self.g12,
        ])
    }

    pub fn values(&self) -> [f64; 9] {
        [
            self.e1, self.e2, self.e3, self.g12, self.g13, self.g23, self.nu12, self.nu13,
            self.nu23,
        ]
    }
}

/// Off-axis behaviour of a single lamina
#[derive(Debug, Clone, Serialize)]
pub struct LaminaProperties {
    pub angle: Angle,
    pub constants: EngineeringConstantsResult,
    /// Rotated reduced stiffness Q̄
    pub stiffness: ConstitutiveMatrix,
    /// Rotated compliance S̄
    pub compliance: ConstitutiveMatrix,
}

/// Extensional (A), coupling (B) and bending (D) matrices of a laminate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbdMatrices {
    #[serde(serialize_with = "serialize_rows")]
    pub a: Mat3,
    #[serde(serialize_with = "serialize_rows")]
    pub b: Mat3,
    #[serde(serialize_with = "serialize_rows")]
    pub d: Mat3,
    /// Total laminate thickness h
    pub thickness: f64,
    pub num_plies: usize,
}

impl AbdMatrices {
    /// Full 6x6 ABD matrix `[[A, B], [B, D]]`
    pub fn abd(&self) -> Mat6 {
        let mut m = Mat6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.a);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&self.b);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&self.b);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.d);
        m
    }
}

/// Plate response of a laminate
#[derive(Debug, Clone, Serialize)]
pub struct LaminatePlateProperties {
    #[serde(flatten)]
    pub abd: AbdMatrices,
    pub extraction: ExtractionConvention,
    /// Constants under in-plane (membrane) loading
    pub in_plane: EngineeringConstantsResult,
    /// Constants under pure bending
    pub flexural: EngineeringConstantsResult,
}

/// Effective 3D behaviour of a laminate treated as a homogeneous solid
#[derive(Debug, Clone, Serialize)]
pub struct ThreeDimensionalProperties {
    pub rule: HomogenizationRule,
    pub thickness: f64,
    pub stiffness: ConstitutiveMatrix,
    pub compliance: ConstitutiveMatrix,
    pub constants: SolidConstants,
}

/// Effective properties of a unidirectional fiber-reinforced composite
#[derive(Debug, Clone, Serialize)]
pub struct UdfrcProperties {
    pub model: MicromechanicsModel,
    pub fiber_volume_fraction: f64,
    pub stiffness: ConstitutiveMatrix,
    pub compliance: ConstitutiveMatrix,
    pub constants: SolidConstants,
    /// Homogenized ply material for use in laminate calculations
    pub material: MaterialProperties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn carbon_epoxy() -> SolidConstants {
        SolidConstants {
            e1: 150e3,
            e2: 10e3,
            e3: 10e3,
            g12: 5e3,
            g13: 5e3,
            g23: 4e3,
            nu12: 0.3,
            nu13: 0.3,
            nu23: 0.25,
        }
    }

    #[test]
    fn test_solid_constants_round_trip_through_compliance() {
        let c = carbon_epoxy();
        let back = SolidConstants::from_compliance(&c.compliance());
        for (a, b) in c.values().iter().zip(back.values().iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_coupling_conventions() {
        let s = Mat3::new(
            1.0, -0.3, 0.2,
            -0.3, 2.0, -0.1,
            0.2, -0.1, 4.0,
        );
        let a = EngineeringConstantsResult::from_compliance(
            &s,
            ConstantsBasis::Lamina,
            CouplingConvention::ShearPerNormal,
        );
        assert_relative_eq!(a.eta_1, 0.2);
        assert_relative_eq!(a.eta_2, -0.05);
        let b = EngineeringConstantsResult::from_compliance(
            &s,
            ConstantsBasis::Lamina,
            CouplingConvention::NormalPerShear,
        );
        assert_relative_eq!(b.eta_1, -0.05);
        assert_relative_eq!(b.eta_2, 0.025);
        assert_relative_eq!(a.nu12, 0.3);
        assert_relative_eq!(a.nu21, 0.15);
    }

    #[test]
    fn test_abd_block_layout() {
        let abd = AbdMatrices {
            a: Mat3::identity(),
            b: Mat3::identity() * 2.0,
            d: Mat3::identity() * 3.0,
            thickness: 1.0,
            num_plies: 1,
        };
        let m = abd.abd();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 3)], 2.0);
        assert_eq!(m[(4, 1)], 2.0);
        assert_eq!(m[(5, 5)], 3.0);
    }
}
