//! Ply material properties

use serde::Serialize;

use crate::error::{CompositeError, CompositeResult};
use crate::results::SolidConstants;

/// Through-thickness constants of an orthotropic material
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroughThickness {
    pub e3: f64,
    pub g13: f64,
    pub g23: f64,
    pub nu13: f64,
    pub nu23: f64,
}

/// Engineering constants of an orthotropic (or isotropic) material.
///
/// Validated on construction and immutable afterwards. Materials given
/// only by in-plane constants can be used for plane-stress calculations;
/// full 3D stiffness requires the through-thickness constants.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialProperties {
    e1: f64,
    e2: f64,
    g12: f64,
    nu12: f64,
    through_thickness: Option<ThroughThickness>,
    density: Option<f64>,
}

impl MaterialProperties {
    /// Create a material from in-plane constants only
    ///
    /// # Arguments
    /// * `e1` - Modulus along the fiber direction
    /// * `e2` - Transverse modulus
    /// * `g12` - In-plane shear modulus
    /// * `nu12` - Major Poisson ratio, `|ν12| < sqrt(E1/E2)`
    pub fn in_plane(e1: f64, e2: f64, g12: f64, nu12: f64) -> CompositeResult<Self> {
        positive("E1", e1)?;
        positive("E2", e2)?;
        positive("G12", g12)?;
        poisson_bound("nu12", nu12, e1, e2)?;

        Ok(Self {
            e1,
            e2,
            g12,
            nu12,
            through_thickness: None,
            density: None,
        })
    }

    /// Create a fully orthotropic material from its nine engineering constants
    pub fn orthotropic(constants: &SolidConstants) -> CompositeResult<Self> {
        let c = constants;
        let mut material = Self::in_plane(c.e1, c.e2, c.g12, c.nu12)?;

        positive("E3", c.e3)?;
        positive("G13", c.g13)?;
        positive("G23", c.g23)?;
        poisson_bound("nu13", c.nu13, c.e1, c.e3)?;
        poisson_bound("nu23", c.nu23, c.e2, c.e3)?;

        material.through_thickness = Some(ThroughThickness {
            e3: c.e3,
            g13: c.g13,
            g23: c.g23,
            nu13: c.nu13,
            nu23: c.nu23,
        });
        Ok(material)
    }

    /// Create a transversely isotropic material about the 1-axis.
    ///
    /// E3 = E2, G13 = G12, ν13 = ν12 and G23 = E2 / (2(1 + ν23)).
    pub fn transversely_isotropic(
        e1: f64,
        e2: f64,
        g12: f64,
        nu12: f64,
        nu23: f64,
    ) -> CompositeResult<Self> {
        positive("E2", e2)?;
        if !nu23.is_finite() || nu23 <= -1.0 || nu23 >= 1.0 {
            return Err(CompositeError::InvalidInput(format!(
                "nu23 must lie in (-1, 1), got {nu23}"
            )));
        }

        Self::orthotropic(&SolidConstants {
            e1,
            e2,
            e3: e2,
            g12,
            g13: g12,
            g23: e2 / (2.0 * (1.0 + nu23)),
            nu12,
            nu13: nu12,
            nu23,
        })
    }

    /// Create an isotropic material, G = E / (2(1 + ν))
    pub fn isotropic(e: f64, nu: f64) -> CompositeResult<Self> {
        positive("E", e)?;
        if !nu.is_finite() || nu <= -1.0 || nu >= 0.5 {
            return Err(CompositeError::InvalidInput(format!(
                "Poisson's ratio must lie in (-1, 0.5), got {nu}"
            )));
        }

        let g = e / (2.0 * (1.0 + nu));
        Self::orthotropic(&SolidConstants {
            e1: e,
            e2: e,
            e3: e,
            g12: g,
            g13: g,
            g23: g,
            nu12: nu,
            nu13: nu,
            nu23: nu,
        })
    }

    /// Create a material with density specified
    pub fn with_density(mut self, density: f64) -> CompositeResult<Self> {
        positive("density", density)?;
        self.density = Some(density);
        Ok(self)
    }

    pub fn e1(&self) -> f64 {
        self.e1
    }

    pub fn e2(&self) -> f64 {
        self.e2
    }

    pub fn g12(&self) -> f64 {
        self.g12
    }

    pub fn nu12(&self) -> f64 {
        self.nu12
    }

    /// Minor Poisson ratio ν21 = ν12 E2 / E1
    pub fn nu21(&self) -> f64 {
        self.nu12 * self.e2 / self.e1
    }

    pub fn density(&self) -> Option<f64> {
        self.density
    }

    pub fn through_thickness(&self) -> Option<&ThroughThickness> {
        self.through_thickness.as_ref()
    }

    /// All nine constants, if the through-thickness ones are known
    pub fn solid_constants(&self) -> Option<SolidConstants> {
        self.through_thickness.map(|t| SolidConstants {
            e1: self.e1,
            e2: self.e2,
            e3: t.e3,
            g12: self.g12,
            g13: t.g13,
            g23: t.g23,
            nu12: self.nu12,
            nu13: t.nu13,
            nu23: t.nu23,
        })
    }
}

fn positive(name: &str, value: f64) -> CompositeResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(CompositeError::InvalidInput(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}

/// Orthotropic admissibility |ν_ij| < sqrt(E_i / E_j)
fn poisson_bound(name: &str, nu: f64, e_i: f64, e_j: f64) -> CompositeResult<()> {
    let bound = (e_i / e_j).sqrt();
    if nu.is_finite() && nu.abs() < bound {
        Ok(())
    } else {
        Err(CompositeError::InvalidInput(format!(
            "{name} must satisfy |{name}| < {bound:.4}, got {nu}"
        )))
    }
}
