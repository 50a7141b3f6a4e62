//! Calculation conventions
//!
//! Every entry point takes its conventions explicitly. The two API
//! generations are available as [`Conventions::v1`] and [`Conventions::v2`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CompositeError, CompositeResult};
use crate::math::DEFAULT_CONDITIONING_TOLERANCE;

/// Definition of the shear-coupling coefficients reported with in-plane constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouplingConvention {
    /// `eta_i = S_i6 / S_ii`: shear strain per unit normal strain under uniaxial stress `i`
    ShearPerNormal,
    /// `eta_i = -S_i6 / S_66`: negated normal strain per unit shear strain under pure shear
    NormalPerShear,
}

/// How extensional and flexural constants are taken from the ABD matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionConvention {
    /// Invert A and D independently
    Uncoupled,
    /// Invert the full 6x6 ABD matrix and use its a* and d* blocks
    Coupled,
}

/// Rule used to homogenize a ply stack into a 3D continuum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomogenizationRule {
    /// Thickness-weighted average of the rotated ply stiffness (uniform strain bound).
    ///
    /// Opt-in only: its plane-stress projection is stiffer than the laminate's A/h,
    /// so no API generation selects it.
    Voigt,
    /// In-plane strains and out-of-plane stresses uniform through the thickness
    Laminate,
}

/// Halpin-Tsai reinforcing efficiency parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalpinTsaiCoefficients {
    /// ξ for the transverse moduli E2 and E3
    pub xi_e: f64,
    /// ξ for the shear moduli G12, G13 and G23
    pub xi_g: f64,
}

impl HalpinTsaiCoefficients {
    /// Circular fibers in a square array: ξ_E = 2, ξ_G = 1
    /// (Jones, *Mechanics of Composite Materials*, 2nd ed., §3.5).
    pub fn circular_fibers() -> Self {
        Self {
            xi_e: 2.0,
            xi_g: 1.0,
        }
    }
}

/// Micromechanics formula set for unidirectional fiber-reinforced composites
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum MicromechanicsModel {
    /// Volume average of constituent stiffness
    Voigt,
    /// Volume average of constituent compliance
    Reuss,
    /// Voigt mixing for E1, ν12 and ν13, Reuss-type mixing for the remaining constants
    Hybrid,
    /// Rule of mixtures for E1 and ν12, Halpin-Tsai interpolation for transverse and shear moduli
    HalpinTsai(HalpinTsaiCoefficients),
}

impl MicromechanicsModel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Voigt => "voigt",
            Self::Reuss => "reuss",
            Self::Hybrid => "hybrid",
            Self::HalpinTsai(_) => "halpin_tsai",
        }
    }
}

/// API generation requested by a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiVersion {
    V1,
    V2,
}

impl FromStr for ApiVersion {
    type Err = CompositeError;

    fn from_str(version: &str) -> CompositeResult<Self> {
        match version {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            other => Err(CompositeError::InvalidInput(format!(
                "unknown API version '{other}'"
            ))),
        }
    }
}

impl ApiVersion {
    pub fn conventions(self) -> Conventions {
        match self {
            Self::V1 => Conventions::v1(),
            Self::V2 => Conventions::v2(),
        }
    }

    /// Micromechanics models reported by the UDFRC calculation of this generation
    pub fn micromechanics_models(self) -> Vec<MicromechanicsModel> {
        let mut models = vec![
            MicromechanicsModel::Voigt,
            MicromechanicsModel::Reuss,
            MicromechanicsModel::Hybrid,
        ];
        if self == Self::V2 {
            models.push(MicromechanicsModel::HalpinTsai(
                HalpinTsaiCoefficients::circular_fibers(),
            ));
        }
        models
    }
}

/// Formula and tolerance selection for a calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conventions {
    /// Coupling coefficients reported for a single off-axis lamina
    pub lamina_coupling: CouplingConvention,
    /// Coupling coefficients reported for laminate plate constants
    pub laminate_coupling: CouplingConvention,
    /// Extraction of plate constants from ABD
    pub extraction: ExtractionConvention,
    /// 3D homogenization rule
    pub homogenization: HomogenizationRule,
    /// Reciprocal condition number below which a matrix is treated as singular
    pub conditioning_tolerance: f64,
}

impl Conventions {
    /// Conventions of the first API generation
    pub fn v1() -> Self {
        Self {
            lamina_coupling: CouplingConvention::ShearPerNormal,
            laminate_coupling: CouplingConvention::NormalPerShear,
            extraction: ExtractionConvention::Uncoupled,
            homogenization: HomogenizationRule::Laminate,
            conditioning_tolerance: DEFAULT_CONDITIONING_TOLERANCE,
        }
    }

    /// Conventions of the second API generation
    pub fn v2() -> Self {
        Self {
            lamina_coupling: CouplingConvention::ShearPerNormal,
            laminate_coupling: CouplingConvention::ShearPerNormal,
            extraction: ExtractionConvention::Coupled,
            homogenization: HomogenizationRule::Laminate,
            conditioning_tolerance: DEFAULT_CONDITIONING_TOLERANCE,
        }
    }

    /// Use the same coupling convention for laminae and laminates
    pub fn with_coupling(mut self, coupling: CouplingConvention) -> Self {
        self.lamina_coupling = coupling;
        self.laminate_coupling = coupling;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionConvention) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_homogenization(mut self, rule: HomogenizationRule) -> Self {
        self.homogenization = rule;
        self
    }

    /// Set the conditioning tolerance; it must be finite and non-negative
    pub fn with_tolerance(mut self, tolerance: f64) -> CompositeResult<Self> {
        self.conditioning_tolerance = tolerance;
        self.validate()?;
        Ok(self)
    }

    /// Check the numeric settings before a calculation uses them
    pub fn validate(&self) -> CompositeResult<()> {
        validate_tolerance(self.conditioning_tolerance)
    }
}

/// A conditioning tolerance must be finite and non-negative
pub fn validate_tolerance(tolerance: f64) -> CompositeResult<()> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        return Err(CompositeError::InvalidInput(format!(
            "conditioning tolerance must be finite and non-negative, got {tolerance}"
        )));
    }
    Ok(())
}
