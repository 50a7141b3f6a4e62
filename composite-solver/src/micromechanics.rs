//! Effective properties of unidirectional fiber-reinforced composites
//!
//! The fiber is transversely isotropic about its axis and the matrix is
//! isotropic. All models reduce to the matrix as Vf → 0 and give the fiber's
//! axial modulus as Vf → 1; both end points are rejected as inputs.

use serde::{Deserialize, Serialize};

use crate::analysis::{HalpinTsaiCoefficients, MicromechanicsModel};
use crate::elements::MaterialProperties;
use crate::error::{CompositeError, CompositeResult};
use crate::lamina::build_stiffness;
use crate::math::{checked_inverse, ConstitutiveMatrix, Dimensionality, Frame, Mat6, Quantity};
use crate::results::{SolidConstants, UdfrcProperties};

/// Transversely isotropic fiber constants (1 = fiber axis)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiberProperties {
    pub e1: f64,
    pub e2: f64,
    pub g12: f64,
    pub nu12: f64,
    pub nu23: f64,
    #[serde(default)]
    pub density: Option<f64>,
}

impl FiberProperties {
    /// Validated fiber material
    pub fn material(&self) -> CompositeResult<MaterialProperties> {
        let m = MaterialProperties::transversely_isotropic(
            self.e1, self.e2, self.g12, self.nu12, self.nu23,
        )?;
        match self.density {
            Some(rho) => m.with_density(rho),
            None => Ok(m),
        }
    }
}

/// Isotropic matrix constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatrixProperties {
    pub e: f64,
    pub nu: f64,
    #[serde(default)]
    pub density: Option<f64>,
}

impl MatrixProperties {
    /// Validated matrix material
    pub fn material(&self) -> CompositeResult<MaterialProperties> {
        let m = MaterialProperties::isotropic(self.e, self.nu)?;
        match self.density {
            Some(rho) => m.with_density(rho),
            None => Ok(m),
        }
    }
}

/// A constituent with all nine constants available
struct Constituent {
    constants: SolidConstants,
    compliance: Mat6,
    stiffness: Mat6,
}

impl Constituent {
    fn new(material: &MaterialProperties, tolerance: f64) -> CompositeResult<Self> {
        let constants = material.solid_constants().ok_or_else(|| {
            CompositeError::mismatch("constituent with through-thickness constants", "in-plane constants only")
        })?;
        let stiffness = *build_stiffness(material, Dimensionality::Full3D, tolerance)?.as_full_3d()?;
        Ok(Self {
            constants,
            compliance: constants.compliance(),
            stiffness,
        })
    }
}

/// Homogenize fiber and matrix into an orthotropic ply material
///
/// # Arguments
/// * `fiber` - Fiber constants
/// * `matrix` - Matrix constants
/// * `fiber_volume_fraction` - Vf, strictly between 0 and 1
/// * `model` - Mixing formula set
/// * `tolerance` - Conditioning tolerance for the 6x6 inversions
pub fn homogenize_udfrc(
    fiber: &FiberProperties,
    matrix: &MatrixProperties,
    fiber_volume_fraction: f64,
    model: MicromechanicsModel,
    tolerance: f64,
) -> CompositeResult<UdfrcProperties> {
    let vf = fiber_volume_fraction;
    if !(vf > 0.0 && vf < 1.0) {
        return Err(CompositeError::InvalidVolumeFraction(vf));
    }
    let vm = 1.0 - vf;

    let fiber_material = fiber.material()?;
    let matrix_material = matrix.material()?;
    let f = Constituent::new(&fiber_material, tolerance)?;
    let m = Constituent::new(&matrix_material, tolerance)?;

    let invert = |a: &Mat6, name: &str| {
        checked_inverse(a, tolerance)
            .map(|(inv, _)| inv)
            .map_err(|e| CompositeError::singular(name, e.rcond))
    };

    let (stiffness, compliance) = match model {
        MicromechanicsModel::Voigt => {
            let c = f.stiffness * vf + m.stiffness * vm;
            let s = invert(&c, "Voigt effective stiffness")?;
            (c, s)
        }
        MicromechanicsModel::Reuss => {
            let s = f.compliance * vf + m.compliance * vm;
            let c = invert(&s, "Reuss effective compliance")?;
            (c, s)
        }
        MicromechanicsModel::Hybrid => {
            let s = hybrid_constants(&f.constants, &m.constants, vf).compliance();
            let c = invert(&s, "hybrid effective compliance")?;
            (c, s)
        }
        MicromechanicsModel::HalpinTsai(coefficients) => {
            let s = halpin_tsai_constants(&f.constants, &m.constants, vf, coefficients)?.compliance();
            let c = invert(&s, "Halpin-Tsai effective compliance")?;
            (c, s)
        }
    };

    let constants = SolidConstants::from_compliance(&compliance);
    let mut material = MaterialProperties::orthotropic(&constants).map_err(|e| {
        CompositeError::DegenerateMaterial(format!("{} mixing gives a non-physical material: {e}", model.name()))
    })?;
    if let (Some(rho_f), Some(rho_m)) = (fiber_material.density(), matrix_material.density()) {
        material = material.with_density(vf * rho_f + vm * rho_m)?;
    }

    log::debug!(
        "{} mixing at Vf = {vf}: E1 = {:.6e}, E2 = {:.6e}, G12 = {:.6e}",
        model.name(),
        constants.e1,
        constants.e2,
        constants.g12
    );

    Ok(UdfrcProperties {
        model,
        fiber_volume_fraction: vf,
        stiffness: ConstitutiveMatrix::full_3d(Quantity::Stiffness, Frame::Material, stiffness),
        compliance: ConstitutiveMatrix::full_3d(Quantity::Compliance, Frame::Material, compliance),
        constants,
        material,
    })
}

/// Voigt mixing for E1, ν12 and ν13; Reuss-type mixing of the
/// remaining compliance terms after removing the axial contribution
fn hybrid_constants(f: &SolidConstants, m: &SolidConstants, vf: f64) -> SolidConstants {
    let vm = 1.0 - vf;
    let mix = |a: f64, b: f64| vf * a + vm * b;

    let e1 = mix(f.e1, m.e1);
    let nu12 = mix(f.nu12, m.nu12);
    let nu13 = mix(f.nu13, m.nu13);

    let s22 = mix(
        1.0 / f.e2 - f.nu12 * f.nu12 / f.e1,
        1.0 / m.e2 - m.nu12 * m.nu12 / m.e1,
    );
    let s33 = mix(
        1.0 / f.e3 - f.nu13 * f.nu13 / f.e1,
        1.0 / m.e3 - m.nu13 * m.nu13 / m.e1,
    );
    let s23 = mix(
        -f.nu23 / f.e2 - f.nu12 * f.nu13 / f.e1,
        -m.nu23 / m.e2 - m.nu12 * m.nu13 / m.e1,
    );

    let e2 = 1.0 / (s22 + nu12 * nu12 / e1);
    let e3 = 1.0 / (s33 + nu13 * nu13 / e1);

    SolidConstants {
        e1,
        e2,
        e3,
        g12: 1.0 / mix(1.0 / f.g12, 1.0 / m.g12),
        g13: 1.0 / mix(1.0 / f.g13, 1.0 / m.g13),
        g23: 1.0 / mix(1.0 / f.g23, 1.0 / m.g23),
        nu12,
        nu13,
        nu23: -e2 * (s23 + nu12 * nu13 / e1),
    }
}

/// Halpin-Tsai interpolation `p = pm (1 + ξ η Vf) / (1 - η Vf)`,
/// `η = (pf/pm - 1) / (pf/pm + ξ)`
pub fn halpin_tsai(p_fiber: f64, p_matrix: f64, xi: f64, vf: f64) -> f64 {
    let ratio = p_fiber / p_matrix;
    let eta = (ratio - 1.0) / (ratio + xi);
    p_matrix * (1.0 + xi * eta * vf) / (1.0 - eta * vf)
}

fn halpin_tsai_constants(
    f: &SolidConstants,
    m: &SolidConstants,
    vf: f64,
    coefficients: HalpinTsaiCoefficients,
) -> CompositeResult<SolidConstants> {
    let HalpinTsaiCoefficients { xi_e, xi_g } = coefficients;
    if !(xi_e.is_finite() && xi_e > 0.0 && xi_g.is_finite() && xi_g > 0.0) {
        return Err(CompositeError::InvalidInput(format!(
            "Halpin-Tsai coefficients must be positive, got xi_e = {xi_e}, xi_g = {xi_g}"
        )));
    }

    let vm = 1.0 - vf;
    let e2 = halpin_tsai(f.e2, m.e2, xi_e, vf);
    let g12 = halpin_tsai(f.g12, m.g12, xi_g, vf);
    let g23 = halpin_tsai(f.g23, m.g23, xi_g, vf);
    let nu12 = vf * f.nu12 + vm * m.nu12;

    Ok(SolidConstants {
        e1: vf * f.e1 + vm * m.e1,
        e2,
        e3: e2,
        g12,
        g13: g12,
        g23,
        nu12,
        nu13: nu12,
        nu23: e2 / (2.0 * g23) - 1.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DEFAULT_CONDITIONING_TOLERANCE;
    use approx::assert_relative_eq;

    const TOL: f64 = DEFAULT_CONDITIONING_TOLERANCE;

    fn fiber() -> FiberProperties {
        FiberProperties {
            e1: 150e3,
            e2: 10e3,
            g12: 5e3,
            nu12: 0.3,
            nu23: 0.25,
            density: None,
        }
    }

    fn matrix() -> MatrixProperties {
        MatrixProperties {
            e: 3.5e3,
            nu: 0.35,
            density: None,
        }
    }

    fn models() -> Vec<MicromechanicsModel> {
        vec![
            MicromechanicsModel::Voigt,
            MicromechanicsModel::Reuss,
            MicromechanicsModel::Hybrid,
            MicromechanicsModel::HalpinTsai(HalpinTsaiCoefficients::circular_fibers()),
        ]
    }

    #[test]
    fn test_rejects_end_point_fractions() {
        for vf in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = homogenize_udfrc(&fiber(), &matrix(), vf, MicromechanicsModel::Voigt, TOL).unwrap_err();
            assert!(matches!(err, CompositeError::InvalidVolumeFraction(_)));
        }
    }

    #[test]
    fn test_longitudinal_rule_of_mixtures() {
        for model in [MicromechanicsModel::Hybrid, MicromechanicsModel::HalpinTsai(HalpinTsaiCoefficients::circular_fibers())] {
            let p = homogenize_udfrc(&fiber(), &matrix(), 0.6, model, TOL).unwrap();
            assert_relative_eq!(p.constants.e1, 0.6 * 150e3 + 0.4 * 3.5e3, max_relative = 1e-9);
            assert_relative_eq!(p.constants.nu12, 0.6 * 0.3 + 0.4 * 0.35, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_voigt_and_reuss_bound_the_others() {
        let results: Vec<_> = models()
            .into_iter()
            .map(|model| homogenize_udfrc(&fiber(), &matrix(), 0.55, model, TOL).unwrap())
            .collect();
        let (voigt, reuss) = (&results[0], &results[1]);
        for p in &results {
            assert!(p.constants.e2 <= voigt.constants.e2 * (1.0 + 1e-12));
            assert!(p.constants.e2 >= reuss.constants.e2 * (1.0 - 1e-12));
            assert!(p.constants.g12 >= reuss.constants.g12 * (1.0 - 1e-12));
        }
    }

    #[test]
    fn test_halpin_tsai_end_points() {
        assert_relative_eq!(halpin_tsai(10e3, 3.5e3, 2.0, 0.0), 3.5e3);
        assert_relative_eq!(halpin_tsai(10e3, 3.5e3, 2.0, 1.0), 10e3, max_relative = 1e-12);
    }

    #[test]
    fn test_transversely_isotropic_result() {
        let p = homogenize_udfrc(
            &fiber(),
            &matrix(),
            0.5,
            MicromechanicsModel::HalpinTsai(HalpinTsaiCoefficients::circular_fibers()),
            TOL,
        )
        .unwrap();
        let c = p.constants;
        assert_relative_eq!(c.e2, c.e3, max_relative = 1e-12);
        assert_relative_eq!(c.g23, c.e2 / (2.0 * (1.0 + c.nu23)), max_relative = 1e-9);
    }

    #[test]
    fn test_density_mixing() {
        let mut f = fiber();
        f.density = Some(1.8e-9);
        let mut m = matrix();
        m.density = Some(1.2e-9);
        let p = homogenize_udfrc(&f, &m, 0.6, MicromechanicsModel::Reuss, TOL).unwrap();
        assert_relative_eq!(p.material.density().unwrap(), 1.56e-9, max_relative = 1e-12);
        let p = homogenize_udfrc(&fiber(), &m, 0.6, MicromechanicsModel::Reuss, TOL).unwrap();
        assert!(p.material.density().is_none());
    }

    #[test]
    fn test_invalid_constituents() {
        let mut f = fiber();
        f.e1 = -1.0;
        assert!(matches!(
            homogenize_udfrc(&f, &matrix(), 0.5, MicromechanicsModel::Voigt, TOL),
            Err(CompositeError::InvalidInput(_))
        ));
        let m = MatrixProperties { e: 3.5e3, nu: 0.5, density: None };
        assert!(homogenize_udfrc(&fiber(), &m, 0.5, MicromechanicsModel::Voigt, TOL).is_err());
    }
}
