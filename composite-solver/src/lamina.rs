//! Lamina stiffness and compliance from engineering constants
//!
//! Compliance is written down directly from the engineering constants and
//! inverted to obtain stiffness. Plane-stress matrices act on (11, 22, 12),
//! full 3D matrices on the Voigt order (11, 22, 33, 23, 13, 12).

use crate::analysis::CouplingConvention;
use crate::elements::MaterialProperties;
use crate::error::{CompositeError, CompositeResult};
use crate::math::{
    to_reference, Angle, ConstitutiveMatrix, Dimensionality, Frame, Mat3, Quantity,
};
use crate::results::{ConstantsBasis, EngineeringConstantsResult, LaminaProperties};

/// Material-axes compliance of a lamina
///
/// Full-3D compliance needs the through-thickness constants; materials defined
/// only in-plane fail with [`CompositeError::DimensionMismatch`].
pub fn compliance(
    material: &MaterialProperties,
    mode: Dimensionality,
) -> CompositeResult<ConstitutiveMatrix> {
    match mode {
        Dimensionality::PlaneStress => {
            let s12 = -material.nu12() / material.e1();
            let s = Mat3::new(
                1.0 / material.e1(), s12,                 0.0,
                s12,                 1.0 / material.e2(), 0.0,
                0.0,                 0.0,                 1.0 / material.g12(),
            );
            Ok(ConstitutiveMatrix::plane_stress(Quantity::Compliance, Frame::Material, s))
        }
        Dimensionality::Full3D => {
            let constants = material.solid_constants().ok_or_else(|| {
                CompositeError::mismatch(
                    "material with through-thickness constants",
                    "in-plane constants only",
                )
            })?;
            Ok(ConstitutiveMatrix::full_3d(
                Quantity::Compliance,
                Frame::Material,
                constants.compliance(),
            ))
        }
    }
}

/// Material-axes stiffness of a lamina (reduced stiffness Q for plane stress)
///
/// Fails with [`CompositeError::DegenerateMaterial`] when the compliance is not
/// positive definite or cannot be inverted within `tolerance`.
pub fn build_stiffness(
    material: &MaterialProperties,
    mode: Dimensionality,
    tolerance: f64,
) -> CompositeResult<ConstitutiveMatrix> {
    let s = compliance(material, mode)?;

    let positive_definite = match mode {
        Dimensionality::PlaneStress => s.as_plane_stress()?.cholesky().is_some(),
        Dimensionality::Full3D => s.as_full_3d()?.cholesky().is_some(),
    };
    if !positive_definite {
        return Err(CompositeError::DegenerateMaterial(format!(
            "{mode} compliance is not positive definite"
        )));
    }

    let c = s.inverse(tolerance).map_err(|e| {
        CompositeError::DegenerateMaterial(format!(
            "{mode} compliance is singular (rcond = {:e})",
            e.rcond
        ))
    })?;
    log::trace!("{mode} lamina stiffness: {:?}", c.rows());
    Ok(c)
}

/// Stiffness of a lamina rotated into the reference axes
pub fn rotated_stiffness(
    material: &MaterialProperties,
    angle: Angle,
    mode: Dimensionality,
    tolerance: f64,
) -> CompositeResult<ConstitutiveMatrix> {
    to_reference(&build_stiffness(material, mode, tolerance)?, angle)
}

/// Compliance of a lamina rotated into the reference axes
pub fn rotated_compliance(
    material: &MaterialProperties,
    angle: Angle,
    mode: Dimensionality,
) -> CompositeResult<ConstitutiveMatrix> {
    to_reference(&compliance(material, mode)?, angle)
}

/// Off-axis plane-stress behaviour of a single lamina
pub fn lamina_properties(
    material: &MaterialProperties,
    angle: Angle,
    coupling: CouplingConvention,
    tolerance: f64,
) -> CompositeResult<LaminaProperties> {
    let stiffness = rotated_stiffness(material, angle, Dimensionality::PlaneStress, tolerance)?;
    let compliance = rotated_compliance(material, angle, Dimensionality::PlaneStress)?;
    let constants = EngineeringConstantsResult::from_compliance(
        compliance.as_plane_stress()?,
        ConstantsBasis::Lamina,
        coupling,
    );
    log::debug!(
        "lamina at {:.3} deg: Ex = {:.6e}, Ey = {:.6e}, Gxy = {:.6e}",
        angle.as_degrees(),
        constants.e1,
        constants.e2,
        constants.g12
    );

    Ok(LaminaProperties {
        angle,
        constants,
        stiffness,
        compliance,
    })
}
