//! Material table and ordered ply stacks

use std::collections::HashMap;
use std::sync::Arc;

use super::{LayupSequence, MaterialProperties, PlyDefinition};
use crate::error::{CompositeError, CompositeResult};
use crate::math::Angle;

/// Largest number of plies accepted in one stack
pub const MAX_PLIES: usize = 4096;

/// Named, immutable materials shared by the plies that reference them
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    materials: HashMap<String, Arc<MaterialProperties>>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material under a unique name
    pub fn add_material(&mut self, name: &str, material: MaterialProperties) -> CompositeResult<()> {
        if self.materials.contains_key(name) {
            return Err(CompositeError::DuplicateName(name.to_string()));
        }
        self.materials.insert(name.to_string(), Arc::new(material));
        Ok(())
    }

    /// Shared handle to a registered material
    pub fn get(&self, name: &str) -> CompositeResult<Arc<MaterialProperties>> {
        self.materials
            .get(name)
            .cloned()
            .ok_or_else(|| CompositeError::MaterialNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// An ordered stack of plies, bottom (most negative z) first
#[derive(Debug, Clone, Default)]
pub struct LaminateStack {
    plies: Vec<PlyDefinition>,
}

impl LaminateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack of identical-thickness plies of one material following a layup code
    pub fn from_layup(
        table: &MaterialTable,
        material_name: &str,
        layup: &LayupSequence,
        ply_thickness: f64,
    ) -> CompositeResult<Self> {
        let material = table.get(material_name)?;
        let mut stack = Self::new();
        for angle in layup.angles() {
            stack.push(PlyDefinition::new(
                material_name,
                material.clone(),
                ply_thickness,
                *angle,
            )?)?;
        }
        Ok(stack)
    }

    /// Append a ply of a registered material on top of the stack
    pub fn add_ply(
        &mut self,
        table: &MaterialTable,
        material_name: &str,
        thickness: f64,
        angle: Angle,
    ) -> CompositeResult<()> {
        let material = table.get(material_name)?;
        self.push(PlyDefinition::new(material_name, material, thickness, angle)?)
    }

    /// Append an already constructed ply
    pub fn push(&mut self, ply: PlyDefinition) -> CompositeResult<()> {
        if self.plies.len() >= MAX_PLIES {
            return Err(CompositeError::InvalidInput(format!(
                "stack exceeds the limit of {MAX_PLIES} plies"
            )));
        }
        self.plies.push(ply);
        Ok(())
    }

    pub fn plies(&self) -> &[PlyDefinition] {
        &self.plies
    }

    pub fn len(&self) -> usize {
        self.plies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Sum of ply thicknesses
    pub fn total_thickness(&self) -> f64 {
        self.plies.iter().map(|p| p.thickness()).sum()
    }

    /// Bottom and top z-coordinates of each ply, measured from the midplane
    pub fn ply_bounds(&self) -> Vec<(f64, f64)> {
        let mut z = -self.total_thickness() / 2.0;
        self.plies
            .iter()
            .map(|p| {
                let bottom = z;
                z += p.thickness();
                (bottom, z)
            })
            .collect()
    }
}
