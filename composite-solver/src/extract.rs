//! Engineering constants from laminate response matrices

use crate::analysis::{CouplingConvention, ExtractionConvention};
use crate::error::{CompositeError, CompositeResult};
use crate::math::{checked_inverse, Mat3, Mat6};
use crate::results::{AbdMatrices, ConstantsBasis, EngineeringConstantsResult, LaminatePlateProperties};

/// Extensional and flexural constants of a laminate.
///
/// The in-plane compliance `a` and bending compliance `d` come either from
/// inverting A and D separately ([`ExtractionConvention::Uncoupled`]) or from
/// the blocks of the inverted ABD matrix ([`ExtractionConvention::Coupled`]).
/// They are normalized as `a h` and `d h³ / 12` before reading constants.
///
/// The coupled inversion works on the dimensionless matrix
/// `[[A/h, B √12/h²], [B √12/h², 12 D/h³]]` so that the conditioning check
/// does not depend on the unit system.
pub fn extract(
    abd: &AbdMatrices,
    extraction: ExtractionConvention,
    coupling: CouplingConvention,
    tolerance: f64,
) -> CompositeResult<LaminatePlateProperties> {
    let h = abd.thickness;
    if !(h.is_finite() && h > 0.0) {
        return Err(CompositeError::singular("A", 0.0));
    }

    let bending_scale = h.powi(3) / 12.0;

    // Normalized compliances a h and d h³/12
    let (a_norm, d_norm) = match extraction {
        ExtractionConvention::Uncoupled => {
            let (a_inv, _) = checked_inverse(&abd.a, tolerance)
                .map_err(|e| CompositeError::singular("A", e.rcond))?;
            let (d_inv, _) = checked_inverse(&abd.d, tolerance)
                .map_err(|e| CompositeError::singular("D", e.rcond))?;
            (a_inv * h, d_inv * bending_scale)
        }
        ExtractionConvention::Coupled => {
            let (inv, _) = checked_inverse(&normalized_abd(abd), tolerance)
                .map_err(|e| CompositeError::singular("ABD", e.rcond))?;
            let a_norm: Mat3 = inv.fixed_view::<3, 3>(0, 0).into_owned();
            let d_norm: Mat3 = inv.fixed_view::<3, 3>(3, 3).into_owned();
            (a_norm, d_norm)
        }
    };

    let in_plane =
        EngineeringConstantsResult::from_compliance(&a_norm, ConstantsBasis::Extensional, coupling);
    let flexural =
        EngineeringConstantsResult::from_compliance(&d_norm, ConstantsBasis::Flexural, coupling);
    log::debug!(
        "{extraction:?} extraction: Ex = {:.6e}, Ey = {:.6e}, Efx = {:.6e}, Efy = {:.6e}",
        in_plane.e1,
        in_plane.e2,
        flexural.e1,
        flexural.e2
    );

    Ok(LaminatePlateProperties {
        abd: *abd,
        extraction,
        in_plane,
        flexural,
    })
}

/// `S ABD S` with `S = diag(I/√h, I √(12/h³))`; its inverse holds `a h` and `d h³/12`
/// on the diagonal blocks
fn normalized_abd(abd: &AbdMatrices) -> Mat6 {
    let h = abd.thickness;
    let membrane = 1.0 / h.sqrt();
    let bending = (12.0 / h.powi(3)).sqrt();
    let mut m = abd.abd();
    for i in 0..6 {
        for j in 0..6 {
            let si = if i < 3 { membrane } else { bending };
            let sj = if j < 3 { membrane } else { bending };
            m[(i, j)] *= si * sj;
        }
    }
    m
}
