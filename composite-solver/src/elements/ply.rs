//! A single ply within a laminate stack

use std::sync::Arc;

use serde::Serialize;

use super::MaterialProperties;
use crate::error::{CompositeError, CompositeResult};
use crate::math::Angle;

/// A ply: shared material, thickness and orientation
#[derive(Debug, Clone, Serialize)]
pub struct PlyDefinition {
    /// Name of the material in the material table
    pub material_name: String,
    #[serde(skip)]
    material: Arc<MaterialProperties>,
    thickness: f64,
    angle: Angle,
}

impl PlyDefinition {
    /// Create a ply referencing a shared material
    ///
    /// # Arguments
    /// * `material_name` - Name the material is registered under
    /// * `material` - Shared handle to the material
    /// * `thickness` - Ply thickness (> 0)
    /// * `angle` - Orientation of the material 1-axis from the reference x-axis
    pub fn new(
        material_name: &str,
        material: Arc<MaterialProperties>,
        thickness: f64,
        angle: Angle,
    ) -> CompositeResult<Self> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(CompositeError::InvalidInput(format!(
                "ply thickness must be positive and finite, got {thickness}"
            )));
        }
        if !angle.is_finite() {
            return Err(CompositeError::InvalidInput(
                "ply angle must be finite".to_string(),
            ));
        }

        Ok(Self {
            material_name: material_name.to_string(),
            material,
            thickness,
            angle,
        })
    }

    pub fn material(&self) -> &MaterialProperties {
        &self.material
    }

    /// Shared handle to the material
    pub fn material_handle(&self) -> &Arc<MaterialProperties> {
        &self.material
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> Arc<MaterialProperties> {
        Arc::new(MaterialProperties::in_plane(150e3, 10e3, 5e3, 0.3).unwrap())
    }

    #[test]
    fn test_ply_normalizes_angle() {
        let ply = PlyDefinition::new("cfrp", material(), 0.125, Angle::degrees(405.0)).unwrap();
        assert!((ply.angle().as_degrees() - 45.0).abs() < 1e-12);
        assert_eq!(ply.thickness(), 0.125);
    }

    #[test]
    fn test_ply_rejects_bad_thickness() {
        assert!(PlyDefinition::new("cfrp", material(), 0.0, Angle::degrees(0.0)).is_err());
        assert!(PlyDefinition::new("cfrp", material(), -0.1, Angle::degrees(0.0)).is_err());
        assert!(PlyDefinition::new("cfrp", material(), f64::INFINITY, Angle::degrees(0.0)).is_err());
    }

    #[test]
    fn test_ply_rejects_non_finite_angle() {
        assert!(PlyDefinition::new("cfrp", material(), 0.1, Angle::degrees(f64::NAN)).is_err());
    }

    #[test]
    fn test_plies_share_material() {
        let m = material();
        let a = PlyDefinition::new("cfrp", m.clone(), 0.1, Angle::degrees(0.0)).unwrap();
        let b = PlyDefinition::new("cfrp", m.clone(), 0.1, Angle::degrees(90.0)).unwrap();
        assert!(Arc::ptr_eq(a.material_handle(), b.material_handle()));
        assert_eq!(Arc::strong_count(&m), 3);
    }
}
