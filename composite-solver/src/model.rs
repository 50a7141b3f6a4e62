//! Calculation entry points and their plain input structures
//!
//! Inputs use the field names of the public request format (`E1`, `nu12`,
//! `layup_sequence`, ...). Every entry point takes its conventions explicitly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::analysis::{validate_tolerance, Conventions, MicromechanicsModel};
use crate::elements::{LaminateStack, LayupSequence, MaterialProperties, MaterialTable};
use crate::error::{CompositeError, CompositeResult};
use crate::extract::extract;
use crate::homogenize::homogenize_3d;
use crate::lamina::lamina_properties;
use crate::laminate::assemble;
use crate::math::Angle;
use crate::micromechanics::{homogenize_udfrc, FiberProperties, MatrixProperties};
use crate::results::{
    LaminaProperties, LaminatePlateProperties, ThreeDimensionalProperties, UdfrcProperties,
};

/// A single lamina at an orientation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaminaInput {
    #[serde(rename = "E1")]
    pub e1: f64,
    #[serde(rename = "E2")]
    pub e2: f64,
    #[serde(rename = "G12")]
    pub g12: f64,
    pub nu12: f64,
    /// Fiber angle in degrees
    pub layup_angle: f64,
}

/// Ply material constants; `nu23` adds the through-thickness constants
/// of a transversely isotropic ply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlyMaterialInput {
    #[serde(rename = "E1")]
    pub e1: f64,
    #[serde(rename = "E2")]
    pub e2: f64,
    #[serde(rename = "G12")]
    pub g12: f64,
    pub nu12: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nu23: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
}

impl PlyMaterialInput {
    pub fn material(&self) -> CompositeResult<MaterialProperties> {
        let material = match self.nu23 {
            Some(nu23) => {
                MaterialProperties::transversely_isotropic(self.e1, self.e2, self.g12, self.nu12, nu23)?
            }
            None => MaterialProperties::in_plane(self.e1, self.e2, self.g12, self.nu12)?,
        };
        match self.density {
            Some(rho) => material.with_density(rho),
            None => Ok(material),
        }
    }
}

/// Identical plies of one material following a layup code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaminateInput {
    #[serde(flatten)]
    pub material: PlyMaterialInput,
    /// Layup code such as `[45/90/-45]s`
    pub layup_sequence: String,
    /// Thickness of every ply
    pub layer_thickness: f64,
}

/// One entry of an explicit ply list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlyInput {
    pub material: String,
    pub thickness: f64,
    /// Degrees
    pub angle: f64,
}

/// Named materials and an explicit ply list, bottom ply first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlyListInput {
    pub materials: HashMap<String, PlyMaterialInput>,
    pub plies: Vec<PlyInput>,
}

/// Laminate definition accepted by the plate and 3D calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StackInput {
    Uniform(LaminateInput),
    Plies(PlyListInput),
}

impl StackInput {
    /// Validate the input and build the ply stack
    pub fn build(&self) -> CompositeResult<LaminateStack> {
        match self {
            Self::Uniform(input) => {
                let layup: LayupSequence = input.layup_sequence.parse()?;
                let mut table = MaterialTable::new();
                table.add_material("ply", input.material.material()?)?;
                LaminateStack::from_layup(&table, "ply", &layup, input.layer_thickness)
            }
            Self::Plies(input) => {
                let mut table = MaterialTable::new();
                for (name, material) in &input.materials {
                    table.add_material(name, material.material()?)?;
                }
                let mut stack = LaminateStack::new();
                for ply in &input.plies {
                    stack.add_ply(&table, &ply.material, ply.thickness, Angle::degrees(ply.angle))?;
                }
                Ok(stack)
            }
        }
    }
}

/// Fiber, matrix and volume fraction of a unidirectional composite
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct UdfrcInput {
    pub fiber_E1: f64,
    pub fiber_E2: f64,
    pub fiber_G12: f64,
    pub fiber_nu12: f64,
    pub fiber_nu23: f64,
    pub matrix_E1: f64,
    pub matrix_nu: f64,
    pub fiber_volume_fraction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_density: Option<f64>,
}

impl UdfrcInput {
    pub fn fiber(&self) -> FiberProperties {
        FiberProperties {
            e1: self.fiber_E1,
            e2: self.fiber_E2,
            g12: self.fiber_G12,
            nu12: self.fiber_nu12,
            nu23: self.fiber_nu23,
            density: self.fiber_density,
        }
    }

    pub fn matrix(&self) -> MatrixProperties {
        MatrixProperties {
            e: self.matrix_E1,
            nu: self.matrix_nu,
            density: self.matrix_density,
        }
    }
}

/// Off-axis constants, Q̄ and S̄ of a single lamina
pub fn compute_lamina_engineering_constants(
    input: &LaminaInput,
    conventions: &Conventions,
) -> CompositeResult<LaminaProperties> {
    conventions.validate()?;
    if !input.layup_angle.is_finite() {
        return Err(CompositeError::InvalidInput(
            "layup_angle must be finite".to_string(),
        ));
    }
    let material = MaterialProperties::in_plane(input.e1, input.e2, input.g12, input.nu12)?;
    lamina_properties(
        &material,
        Angle::degrees(input.layup_angle),
        conventions.lamina_coupling,
        conventions.conditioning_tolerance,
    )
}

/// A, B, D and the extensional and flexural constants of a laminate
pub fn compute_laminate_plate_properties(
    input: &StackInput,
    conventions: &Conventions,
) -> CompositeResult<LaminatePlateProperties> {
    conventions.validate()?;
    let stack = input.build()?;
    log::debug!(
        "plate properties: {} plies, {:?} extraction",
        stack.len(),
        conventions.extraction
    );
    let abd = assemble(&stack, conventions.conditioning_tolerance)?;
    extract(
        &abd,
        conventions.extraction,
        conventions.laminate_coupling,
        conventions.conditioning_tolerance,
    )
}

/// Effective 6x6 stiffness, compliance and constants of a laminate
pub fn compute_laminate_3d_properties(
    input: &StackInput,
    conventions: &Conventions,
) -> CompositeResult<ThreeDimensionalProperties> {
    conventions.validate()?;
    let stack = input.build()?;
    homogenize_3d(
        &stack,
        conventions.homogenization,
        conventions.conditioning_tolerance,
    )
}

/// Effective UDFRC properties under one micromechanics model
pub fn compute_udfrc_properties(
    input: &UdfrcInput,
    model: MicromechanicsModel,
    tolerance: f64,
) -> CompositeResult<UdfrcProperties> {
    validate_tolerance(tolerance)?;
    homogenize_udfrc(
        &input.fiber(),
        &input.matrix(),
        input.fiber_volume_fraction,
        model,
        tolerance,
    )
}

/// Effective UDFRC properties under each of `models`
pub fn compute_udfrc_models(
    input: &UdfrcInput,
    models: &[MicromechanicsModel],
    tolerance: f64,
) -> CompositeResult<Vec<UdfrcProperties>> {
    models
        .iter()
        .map(|model| compute_udfrc_properties(input, *model, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ApiVersion;
    use approx::assert_relative_eq;

    fn plate_json() -> serde_json::Value {
        serde_json::json!({
            "E1": 150000.0,
            "E2": 10000.0,
            "G12": 5000.0,
            "nu12": 0.3,
            "layup_sequence": "[45/90/-45]s",
            "layer_thickness": 0.125
        })
    }

    #[test]
    fn test_uniform_stack_input() {
        let input: StackInput = serde_json::from_value(plate_json()).unwrap();
        assert!(matches!(input, StackInput::Uniform(_)));
        let stack = input.build().unwrap();
        assert_eq!(stack.len(), 6);
        assert_relative_eq!(stack.total_thickness(), 0.75);
    }

    #[test]
    fn test_ply_list_input() {
        let input: StackInput = serde_json::from_value(serde_json::json!({
            "materials": {
                "cfrp": {"E1": 150000.0, "E2": 10000.0, "G12": 5000.0, "nu12": 0.3, "nu23": 0.25},
                "core": {"E1": 400.0, "E2": 400.0, "G12": 150.0, "nu12": 0.3, "nu23": 0.3}
            },
            "plies": [
                {"material": "cfrp", "thickness": 0.125, "angle": 0.0},
                {"material": "core", "thickness": 5.0, "angle": 0.0},
                {"material": "cfrp", "thickness": 0.125, "angle": 0.0}
            ]
        }))
        .unwrap();
        let p = compute_laminate_3d_properties(&input, &Conventions::v2()).unwrap();
        assert_relative_eq!(p.thickness, 5.25);
        assert!(p.constants.e1 > 400.0);
    }

    #[test]
    fn test_bad_layup_code_is_reported() {
        let mut json = plate_json();
        json["layup_sequence"] = serde_json::json!("[45/x]s");
        let input: StackInput = serde_json::from_value(json).unwrap();
        let err = compute_laminate_plate_properties(&input, &Conventions::v1()).unwrap_err();
        assert!(matches!(err, CompositeError::InvalidLayup(_)));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_missing_ply_material() {
        let input = StackInput::Plies(PlyListInput {
            materials: HashMap::new(),
            plies: vec![PlyInput {
                material: "steel".to_string(),
                thickness: 1.0,
                angle: 0.0,
            }],
        });
        assert!(matches!(
            input.build(),
            Err(CompositeError::MaterialNotFound(_))
        ));
    }

    #[test]
    fn test_v1_plate_reports_normal_per_shear_coupling() {
        let mut json = plate_json();
        json["layup_sequence"] = serde_json::json!("[30]");
        let input: StackInput = serde_json::from_value(json).unwrap();
        let v1 = compute_laminate_plate_properties(&input, &ApiVersion::V1.conventions()).unwrap();
        let v2 = compute_laminate_plate_properties(&input, &ApiVersion::V2.conventions()).unwrap();
        // Same laminate, same moduli, different coupling definitions
        assert_relative_eq!(v1.in_plane.e1, v2.in_plane.e1, max_relative = 1e-9);
        assert!((v1.in_plane.eta_1 - v2.in_plane.eta_1).abs() > 1e-3);
    }

    #[test]
    fn test_lamina_input_names() {
        let input: LaminaInput = serde_json::from_value(serde_json::json!({
            "E1": 150000.0, "E2": 10000.0, "G12": 5000.0, "nu12": 0.3, "layup_angle": 0.0
        }))
        .unwrap();
        let p = compute_lamina_engineering_constants(&input, &Conventions::v1()).unwrap();
        assert_relative_eq!(p.constants.e1, 150e3, max_relative = 1e-12);
        assert_relative_eq!(p.constants.g12, 5e3, max_relative = 1e-12);
    }

    #[test]
    fn test_udfrc_models_for_each_version() {
        let input: UdfrcInput = serde_json::from_value(serde_json::json!({
            "fiber_E1": 150000.0, "fiber_E2": 10000.0, "fiber_G12": 5000.0,
            "fiber_nu12": 0.3, "fiber_nu23": 0.25,
            "matrix_E1": 3500.0, "matrix_nu": 0.35,
            "fiber_volume_fraction": 0.6
        }))
        .unwrap();
        let tol = Conventions::v1().conditioning_tolerance;
        assert_eq!(
            compute_udfrc_models(&input, &ApiVersion::V1.micromechanics_models(), tol).unwrap().len(),
            3
        );
        let v2 = compute_udfrc_models(&input, &ApiVersion::V2.micromechanics_models(), tol).unwrap();
        assert_eq!(v2.len(), 4);
        assert_eq!(v2[3].model.name(), "halpin_tsai");
    }
}
