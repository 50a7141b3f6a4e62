//! Classical laminate theory: A, B and D matrices

use crate::elements::LaminateStack;
use crate::error::CompositeResult;
use crate::lamina::rotated_stiffness;
use crate::math::{Dimensionality, Mat3};
use crate::results::AbdMatrices;

/// Integrate rotated reduced ply stiffness through the thickness.
///
/// For a ply of thickness t whose centroid sits at z̄ from the midplane:
/// - A += Q̄ t
/// - B += Q̄ t z̄
/// - D += Q̄ (t z̄² + t³/12)
///
/// Plies are summed in stacking order, bottom first.
pub fn assemble(stack: &LaminateStack, tolerance: f64) -> CompositeResult<AbdMatrices> {
    let mut a = Mat3::zeros();
    let mut b = Mat3::zeros();
    let mut d = Mat3::zeros();

    for (ply, (bottom, top)) in stack.plies().iter().zip(stack.ply_bounds()) {
        let q = rotated_stiffness(
            ply.material(),
            ply.angle(),
            Dimensionality::PlaneStress,
            tolerance,
        )?;
        let q = q.as_plane_stress()?;
        let t = top - bottom;
        let z = (top + bottom) / 2.0;

        a += q * t;
        b += q * (t * z);
        d += q * (t * z * z + t.powi(3) / 12.0);
    }

    let thickness = stack.total_thickness();
    log::debug!(
        "assembled ABD for {} plies, h = {thickness}",
        stack.len()
    );
    log::trace!("A = {a:?}\nB = {b:?}\nD = {d:?}");

    Ok(AbdMatrices {
        a,
        b,
        d,
        thickness,
        num_plies: stack.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LayupSequence, MaterialProperties, MaterialTable};
    use crate::lamina::build_stiffness;
    use crate::math::{Angle, DEFAULT_CONDITIONING_TOLERANCE};
    use approx::assert_relative_eq;

    const TOL: f64 = DEFAULT_CONDITIONING_TOLERANCE;

    fn table() -> MaterialTable {
        let mut table = MaterialTable::new();
        table
            .add_material("cfrp", MaterialProperties::in_plane(150e3, 10e3, 5e3, 0.3).unwrap())
            .unwrap();
        table
    }

    fn stack(code: &str) -> LaminateStack {
        let layup: LayupSequence = code.parse().unwrap();
        LaminateStack::from_layup(&table(), "cfrp", &layup, 0.125).unwrap()
    }

    #[test]
    fn test_single_ply() {
        let table = table();
        let mut stack = LaminateStack::new();
        stack.add_ply(&table, "cfrp", 0.2, Angle::degrees(0.0)).unwrap();
        let abd = assemble(&stack, TOL).unwrap();
        let q = build_stiffness(&table.get("cfrp").unwrap(), Dimensionality::PlaneStress, TOL).unwrap();
        let q = q.as_plane_stress().unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(abd.a[(i, j)], 0.2 * q[(i, j)], max_relative = 1e-12);
                assert_eq!(abd.b[(i, j)], 0.0);
                assert_relative_eq!(abd.d[(i, j)], 0.008 / 12.0 * q[(i, j)], max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_unsymmetric_stack_couples() {
        let abd = assemble(&stack("[0/90]"), TOL).unwrap();
        assert!(abd.b[(0, 0)].abs() > 1.0);
        assert_relative_eq!(abd.b[(0, 0)], -abd.b[(1, 1)], max_relative = 1e-12);
    }

    #[test]
    fn test_ply_order_flips_coupling_sign() {
        let a = assemble(&stack("[0/90]"), TOL).unwrap();
        let b = assemble(&stack("[90/0]"), TOL).unwrap();
        assert_relative_eq!(a.b[(0, 0)], -b.b[(0, 0)], max_relative = 1e-12);
        assert_relative_eq!(a.a[(0, 0)], b.a[(0, 0)], max_relative = 1e-12);
    }

    #[test]
    fn test_d_matches_cubic_moment_form() {
        let s = stack("[0/45/-45/90]");
        let abd = assemble(&s, TOL).unwrap();
        let mut d = Mat3::zeros();
        for (ply, (z0, z1)) in s.plies().iter().zip(s.ply_bounds()) {
            let q = rotated_stiffness(ply.material(), ply.angle(), Dimensionality::PlaneStress, TOL)
                .unwrap();
            d += q.as_plane_stress().unwrap() * ((z1.powi(3) - z0.powi(3)) / 3.0);
        }
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(abd.d[(i, j)], d[(i, j)], epsilon = 1e-9 * abd.d[(0, 0)]);
            }
        }
    }

    #[test]
    fn test_empty_stack_is_zero() {
        let abd = assemble(&LaminateStack::new(), TOL).unwrap();
        assert_eq!(abd.a, Mat3::zeros());
        assert_eq!(abd.thickness, 0.0);
    }
}
