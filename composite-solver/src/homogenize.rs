//! Effective 3D stiffness of a ply stack
//!
//! Components are split into in-plane `e = (11, 22, 12)` and out-of-plane
//! `t = (33, 23, 13)`. Compatibility across perfectly bonded plies keeps the
//! in-plane strains and the out-of-plane stresses uniform through the
//! thickness, which [`HomogenizationRule::Laminate`] solves exactly.

use crate::analysis::HomogenizationRule;
use crate::elements::LaminateStack;
use crate::error::{CompositeError, CompositeResult};
use crate::lamina::rotated_stiffness;
use crate::math::{
    assemble_blocks, block, checked_inverse, relative_asymmetry, ConstitutiveMatrix,
    Dimensionality, Frame, Mat3, Mat6, Quantity, IN_PLANE, OUT_OF_PLANE,
};
use crate::results::{SolidConstants, ThreeDimensionalProperties};

/// Relative asymmetry above which the homogenized stiffness is reported
const ASYMMETRY_WARNING: f64 = 1e-9;

/// Mixed form of a stiffness matrix, taking (ε_e, σ_t) to (σ_e, ε_t)
struct MixedBlocks {
    ee: Mat3,
    et: Mat3,
    te: Mat3,
    tt: Mat3,
}

impl MixedBlocks {
    fn zeros() -> Self {
        Self {
            ee: Mat3::zeros(),
            et: Mat3::zeros(),
            te: Mat3::zeros(),
            tt: Mat3::zeros(),
        }
    }

    fn from_stiffness(c: &Mat6, tolerance: f64) -> Result<Self, f64> {
        let c_ee = block(c, IN_PLANE, IN_PLANE);
        let c_et = block(c, IN_PLANE, OUT_OF_PLANE);
        let c_te = block(c, OUT_OF_PLANE, IN_PLANE);
        let c_tt = block(c, OUT_OF_PLANE, OUT_OF_PLANE);
        let (tt_inv, _) = checked_inverse(&c_tt, tolerance).map_err(|e| e.rcond)?;

        Ok(Self {
            ee: c_ee - c_et * tt_inv * c_te,
            et: c_et * tt_inv,
            te: -(tt_inv * c_te),
            tt: tt_inv,
        })
    }

    fn add_weighted(&mut self, other: &Self, weight: f64) {
        self.ee += other.ee * weight;
        self.et += other.et * weight;
        self.te += other.te * weight;
        self.tt += other.tt * weight;
    }

    /// Back to stiffness form
    fn to_stiffness(&self, tolerance: f64) -> Result<Mat6, f64> {
        let (tt_inv, _) = checked_inverse(&self.tt, tolerance).map_err(|e| e.rcond)?;
        Ok(assemble_blocks(
            &(self.ee - self.et * tt_inv * self.te),
            &(self.et * tt_inv),
            &(-(tt_inv * self.te)),
            &tt_inv,
        ))
    }
}

/// Plane-stress condensation of a 6x6 stiffness (σ33 = σ23 = σ13 = 0)
pub fn plane_stress_projection(c: &ConstitutiveMatrix, tolerance: f64) -> CompositeResult<Mat3> {
    c.expect(Quantity::Stiffness, c.frame(), Dimensionality::Full3D)?;
    MixedBlocks::from_stiffness(c.as_full_3d()?, tolerance)
        .map(|m| m.ee)
        .map_err(|rcond| CompositeError::singular("out-of-plane stiffness", rcond))
}

/// Effective 6x6 stiffness of the stack treated as a homogeneous solid
///
/// Every ply material needs through-thickness constants.
pub fn homogenize_3d(
    stack: &LaminateStack,
    rule: HomogenizationRule,
    tolerance: f64,
) -> CompositeResult<ThreeDimensionalProperties> {
    let h = stack.total_thickness();
    if stack.is_empty() {
        return Err(CompositeError::singular("3D stiffness", 0.0));
    }

    let stiffness = match rule {
        HomogenizationRule::Voigt => {
            let mut c = Mat6::zeros();
            for ply in stack.plies() {
                let c_ply =
                    rotated_stiffness(ply.material(), ply.angle(), Dimensionality::Full3D, tolerance)?;
                c += c_ply.as_full_3d()? * (ply.thickness() / h);
            }
            c
        }
        HomogenizationRule::Laminate => {
            let mut mixed = MixedBlocks::zeros();
            for ply in stack.plies() {
                let c_ply =
                    rotated_stiffness(ply.material(), ply.angle(), Dimensionality::Full3D, tolerance)?;
                let m = MixedBlocks::from_stiffness(c_ply.as_full_3d()?, tolerance).map_err(|rcond| {
                    CompositeError::DegenerateMaterial(format!(
                        "out-of-plane stiffness of '{}' is singular (rcond = {rcond:e})",
                        ply.material_name
                    ))
                })?;
                mixed.add_weighted(&m, ply.thickness() / h);
            }
            mixed
                .to_stiffness(tolerance)
                .map_err(|rcond| CompositeError::singular("averaged out-of-plane compliance", rcond))?
        }
    };

    let asymmetry = relative_asymmetry(&stiffness);
    if asymmetry > ASYMMETRY_WARNING {
        log::warn!("homogenized stiffness asymmetry {asymmetry:e}, symmetrizing");
    }
    let stiffness = (stiffness + stiffness.transpose()) * 0.5;

    let (compliance, rcond) = checked_inverse(&stiffness, tolerance)
        .map_err(|e| CompositeError::singular("3D stiffness", e.rcond))?;
    log::debug!(
        "{rule:?} 3D homogenization of {} plies, h = {h}, rcond = {rcond:e}",
        stack.len()
    );

    Ok(ThreeDimensionalProperties {
        rule,
        thickness: h,
        stiffness: ConstitutiveMatrix::full_3d(Quantity::Stiffness, Frame::Reference, stiffness),
        compliance: ConstitutiveMatrix::full_3d(Quantity::Compliance, Frame::Reference, compliance),
        constants: SolidConstants::from_compliance(&compliance),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LayupSequence, MaterialProperties, MaterialTable};
    use crate::laminate::assemble;
    use crate::math::DEFAULT_CONDITIONING_TOLERANCE;
    use approx::assert_relative_eq;

    const TOL: f64 = DEFAULT_CONDITIONING_TOLERANCE;

    fn stack(material: MaterialProperties, code: &str) -> LaminateStack {
        let mut table = MaterialTable::new();
        table.add_material("m", material).unwrap();
        let layup: LayupSequence = code.parse().unwrap();
        LaminateStack::from_layup(&table, "m", &layup, 0.125).unwrap()
    }

    fn cfrp() -> MaterialProperties {
        MaterialProperties::transversely_isotropic(150e3, 10e3, 5e3, 0.3, 0.25).unwrap()
    }

    #[test]
    fn test_single_ply_recovers_material_constants() {
        let s = stack(cfrp(), "[0]");
        let expected = cfrp().solid_constants().unwrap();
        for rule in [HomogenizationRule::Voigt, HomogenizationRule::Laminate] {
            let p = homogenize_3d(&s, rule, TOL).unwrap();
            for (a, b) in p.constants.values().iter().zip(expected.values().iter()) {
                assert_relative_eq!(*a, *b, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_laminate_rule_reproduces_a() {
        let s = stack(cfrp(), "[0/30/-60/90/15]");
        let p = homogenize_3d(&s, HomogenizationRule::Laminate, TOL).unwrap();
        let q = plane_stress_projection(&p.stiffness, TOL).unwrap();
        let abd = assemble(&s, TOL).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(q[(i, j)] * p.thickness, abd.a[(i, j)], epsilon = 1e-9 * abd.a[(0, 0)]);
            }
        }
    }

    #[test]
    fn test_voigt_rule_is_stiffer_through_thickness() {
        let s = stack(cfrp(), "[0/90]s");
        let v = homogenize_3d(&s, HomogenizationRule::Voigt, TOL).unwrap();
        let l = homogenize_3d(&s, HomogenizationRule::Laminate, TOL).unwrap();
        assert!(v.constants.e3 >= l.constants.e3 * (1.0 - 1e-12));
        assert!(v.constants.g13 >= l.constants.g13 * (1.0 - 1e-12));
    }

    #[test]
    fn test_cross_ply_is_orthotropic() {
        let p = homogenize_3d(&stack(cfrp(), "[0/90]s"), HomogenizationRule::Laminate, TOL).unwrap();
        assert_relative_eq!(p.constants.e1, p.constants.e2, max_relative = 1e-9);
        assert!(p.stiffness.get(0, 5).unwrap().abs() < 1e-6);
        assert!(p.stiffness.get(3, 4).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_in_plane_material_cannot_be_homogenized() {
        let s = stack(MaterialProperties::in_plane(150e3, 10e3, 5e3, 0.3).unwrap(), "[0/90]");
        let err = homogenize_3d(&s, HomogenizationRule::Laminate, TOL).unwrap_err();
        assert!(matches!(err, CompositeError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_empty_stack_is_singular() {
        let err = homogenize_3d(&LaminateStack::new(), HomogenizationRule::Voigt, TOL).unwrap_err();
        assert!(matches!(err, CompositeError::SingularResponseMatrix { .. }));
    }
}
