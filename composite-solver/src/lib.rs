//! Composite Solver - lamina, laminate and micromechanics property calculations
//!
//! This library computes mechanical properties of fiber-reinforced composites:
//! - Off-axis lamina engineering constants, Q̄ and S̄
//! - Laminate A, B and D matrices with extensional and flexural constants
//! - Effective 3D stiffness of a ply stack
//! - Unidirectional fiber-reinforced composite (UDFRC) properties by
//!   Voigt, Reuss, hybrid and Halpin-Tsai mixing
//!
//! Every calculation is a pure function of its inputs and an explicit
//! [`Conventions`](analysis::Conventions) value.
//!
//! ## Example
//! ```rust
//! use composite_solver::prelude::*;
//!
//! let mut table = MaterialTable::new();
//! table
//!     .add_material("CFRP", MaterialProperties::transversely_isotropic(150e3, 10e3, 5e3, 0.3, 0.25).unwrap())
//!     .unwrap();
//!
//! let layup: LayupSequence = "[0/90]s".parse().unwrap();
//! let stack = LaminateStack::from_layup(&table, "CFRP", &layup, 0.125).unwrap();
//!
//! let conventions = Conventions::v2();
//! let abd = assemble(&stack, conventions.conditioning_tolerance).unwrap();
//! let plate = extract(&abd, conventions.extraction, conventions.laminate_coupling, conventions.conditioning_tolerance).unwrap();
//! assert!(plate.flexural.e1 > plate.flexural.e2);
//!
//! let solid = homogenize_3d(&stack, conventions.homogenization, conventions.conditioning_tolerance).unwrap();
//! assert!(solid.constants.e3 < solid.constants.e1);
//! ```

pub mod analysis;
pub mod elements;
pub mod error;
pub mod extract;
pub mod homogenize;
pub mod lamina;
pub mod laminate;
pub mod math;
pub mod micromechanics;
pub mod model;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{
        ApiVersion, Conventions, CouplingConvention, ExtractionConvention,
        HalpinTsaiCoefficients, HomogenizationRule, MicromechanicsModel,
    };
    pub use crate::elements::{
        LaminateStack, LayupSequence, MaterialProperties, MaterialTable, PlyDefinition, MAX_PLIES,
    };
    pub use crate::error::{CompositeError, CompositeResult};
    pub use crate::extract::extract;
    pub use crate::homogenize::{homogenize_3d, plane_stress_projection};
    pub use crate::lamina::{build_stiffness, lamina_properties, rotated_compliance, rotated_stiffness};
    pub use crate::laminate::assemble;
    pub use crate::math::{transform, Angle, ConstitutiveMatrix, Dimensionality, Frame, Quantity};
    pub use crate::micromechanics::{homogenize_udfrc, FiberProperties, MatrixProperties};
    pub use crate::model::{
        compute_lamina_engineering_constants, compute_laminate_3d_properties,
        compute_laminate_plate_properties, compute_udfrc_models, compute_udfrc_properties,
        LaminaInput, LaminateInput, PlyInput, PlyListInput, PlyMaterialInput, StackInput,
        UdfrcInput,
    };
    pub use crate::results::{
        AbdMatrices, EngineeringConstantsResult, LaminaProperties, LaminatePlateProperties,
        SolidConstants, ThreeDimensionalProperties, UdfrcProperties,
    };
}

#[cfg(feature = "wasm")]
pub mod wasm;
