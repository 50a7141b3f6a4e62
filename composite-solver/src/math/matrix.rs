//! Frame-tagged stiffness and compliance matrices

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{checked_inverse, to_rows, IllConditioned, Mat3, Mat6};
use crate::error::{CompositeError, CompositeResult};

/// Whether a matrix maps strain to stress or stress to strain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Stiffness,
    Compliance,
}

impl Quantity {
    pub fn inverse(self) -> Self {
        match self {
            Self::Stiffness => Self::Compliance,
            Self::Compliance => Self::Stiffness,
        }
    }
}

/// Coordinate system a matrix is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// Principal material axes (1 = fiber direction)
    Material,
    /// Laminate reference axes (x, y, z)
    Reference,
}

impl Frame {
    pub fn opposite(self) -> Self {
        match self {
            Self::Material => Self::Reference,
            Self::Reference => Self::Material,
        }
    }
}

/// Size of the constitutive relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensionality {
    /// Reduced 3x3 relation over (11, 22, 12)
    PlaneStress,
    /// Full 6x6 relation over (11, 22, 33, 23, 13, 12)
    Full3D,
}

impl Dimensionality {
    pub fn size(self) -> usize {
        match self {
            Self::PlaneStress => 3,
            Self::Full3D => 6,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaneStress => write!(f, "plane-stress 3x3"),
            Self::Full3D => write!(f, "full-3D 6x6"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Components {
    PlaneStress(Mat3),
    Full3D(Mat6),
}

/// A stiffness or compliance matrix tagged with its frame and dimensionality.
///
/// Combining matrices with different tags fails with
/// [`CompositeError::DimensionMismatch`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstitutiveMatrix {
    quantity: Quantity,
    frame: Frame,
    components: Components,
}

impl ConstitutiveMatrix {
    pub fn plane_stress(quantity: Quantity, frame: Frame, m: Mat3) -> Self {
        Self {
            quantity,
            frame,
            components: Components::PlaneStress(m),
        }
    }

    pub fn full_3d(quantity: Quantity, frame: Frame, m: Mat6) -> Self {
        Self {
            quantity,
            frame,
            components: Components::Full3D(m),
        }
    }

    /// Build from row-major nested vectors, checking the shape against `dimensionality`
    pub fn from_rows(
        quantity: Quantity,
        frame: Frame,
        dimensionality: Dimensionality,
        rows: &[Vec<f64>],
    ) -> CompositeResult<Self> {
        let n = dimensionality.size();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            let found = format!(
                "{}x{}",
                rows.len(),
                rows.first().map(|row| row.len()).unwrap_or(0)
            );
            return Err(CompositeError::mismatch(dimensionality, found));
        }
        if rows.iter().flatten().any(|v| !v.is_finite()) {
            return Err(CompositeError::InvalidInput(
                "matrix entries must be finite".to_string(),
            ));
        }

        Ok(match dimensionality {
            Dimensionality::PlaneStress => {
                Self::plane_stress(quantity, frame, Mat3::from_fn(|i, j| rows[i][j]))
            }
            Dimensionality::Full3D => {
                Self::full_3d(quantity, frame, Mat6::from_fn(|i, j| rows[i][j]))
            }
        })
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn dimensionality(&self) -> Dimensionality {
        match self.components {
            Components::PlaneStress(_) => Dimensionality::PlaneStress,
            Components::Full3D(_) => Dimensionality::Full3D,
        }
    }

    /// Borrow the 3x3 components, failing if this is a 6x6 matrix
    pub fn as_plane_stress(&self) -> CompositeResult<&Mat3> {
        match &self.components {
            Components::PlaneStress(m) => Ok(m),
            Components::Full3D(_) => Err(CompositeError::mismatch(
                Dimensionality::PlaneStress,
                Dimensionality::Full3D,
            )),
        }
    }

    /// Borrow the 6x6 components, failing if this is a 3x3 matrix
    pub fn as_full_3d(&self) -> CompositeResult<&Mat6> {
        match &self.components {
            Components::Full3D(m) => Ok(m),
            Components::PlaneStress(_) => Err(CompositeError::mismatch(
                Dimensionality::Full3D,
                Dimensionality::PlaneStress,
            )),
        }
    }

    /// Fail unless the tags match the expected ones
    pub fn expect(
        &self,
        quantity: Quantity,
        frame: Frame,
        dimensionality: Dimensionality,
    ) -> CompositeResult<&Self> {
        if self.quantity != quantity {
            return Err(CompositeError::mismatch(
                format!("{quantity:?}"),
                format!("{:?}", self.quantity),
            ));
        }
        if self.frame != frame {
            return Err(CompositeError::mismatch(
                format!("{frame:?} frame"),
                format!("{:?} frame", self.frame),
            ));
        }
        if self.dimensionality() != dimensionality {
            return Err(CompositeError::mismatch(dimensionality, self.dimensionality()));
        }
        Ok(self)
    }

    /// Sum of two matrices with identical tags
    pub fn checked_add(&self, other: &Self) -> CompositeResult<Self> {
        other.expect(self.quantity, self.frame, self.dimensionality())?;
        let components = match (&self.components, &other.components) {
            (Components::PlaneStress(a), Components::PlaneStress(b)) => {
                Components::PlaneStress(a + b)
            }
            (Components::Full3D(a), Components::Full3D(b)) => Components::Full3D(a + b),
            _ => unreachable!("dimensionality checked above"),
        };
        Ok(Self { components, ..*self })
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let components = match &self.components {
            Components::PlaneStress(m) => Components::PlaneStress(m * factor),
            Components::Full3D(m) => Components::Full3D(m * factor),
        };
        Self { components, ..*self }
    }

    /// Invert stiffness to compliance (or back), keeping frame and dimensionality
    pub fn inverse(&self, tolerance: f64) -> Result<Self, IllConditioned> {
        let components = match &self.components {
            Components::PlaneStress(m) => Components::PlaneStress(checked_inverse(m, tolerance)?.0),
            Components::Full3D(m) => Components::Full3D(checked_inverse(m, tolerance)?.0),
        };
        Ok(Self {
            quantity: self.quantity.inverse(),
            components,
            ..*self
        })
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        match &self.components {
            Components::PlaneStress(m) => to_rows(m),
            Components::Full3D(m) => to_rows(m),
        }
    }

    /// Component at (row, col) in Voigt indexing, `None` outside the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        match &self.components {
            Components::PlaneStress(m) => m.get((row, col)).copied(),
            Components::Full3D(m) => m.get((row, col)).copied(),
        }
    }
}

impl Serialize for ConstitutiveMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConstitutiveMatrix", 4)?;
        state.serialize_field("quantity", &self.quantity)?;
        state.serialize_field("frame", &self.frame)?;
        state.serialize_field("dimensionality", &self.dimensionality())?;
        state.serialize_field("rows", &self.rows())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stiffness_3() -> ConstitutiveMatrix {
        ConstitutiveMatrix::plane_stress(Quantity::Stiffness, Frame::Material, Mat3::identity())
    }

    #[test]
    fn test_from_rows_checks_shape() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let err = ConstitutiveMatrix::from_rows(
            Quantity::Stiffness,
            Frame::Material,
            Dimensionality::PlaneStress,
            &rows,
        )
        .unwrap_err();
        assert!(matches!(err, CompositeError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_checked_add_rejects_frame_mix() {
        let a = stiffness_3();
        let b = ConstitutiveMatrix::plane_stress(Quantity::Stiffness, Frame::Reference, Mat3::identity());
        assert!(matches!(
            a.checked_add(&b),
            Err(CompositeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_checked_add_rejects_dimensionality_mix() {
        let a = stiffness_3();
        let b = ConstitutiveMatrix::full_3d(Quantity::Stiffness, Frame::Material, Mat6::identity());
        assert!(matches!(
            a.checked_add(&b),
            Err(CompositeError::DimensionMismatch { .. })
        ));
        assert!(b.as_plane_stress().is_err());
    }

    #[test]
    fn test_inverse_flips_quantity() {
        let s = stiffness_3().scaled(2.0).inverse(1e-12).unwrap();
        assert_eq!(s.quantity(), Quantity::Compliance);
        assert_eq!(s.frame(), Frame::Material);
        assert_eq!(s.get(1, 1).unwrap(), 0.5);
    }

    #[test]
    fn test_get_outside_matrix_is_none() {
        let q = stiffness_3();
        assert_eq!(q.get(2, 2), Some(1.0));
        assert_eq!(q.get(3, 0), None);
        assert_eq!(q.get(0, 5), None);
        let c = ConstitutiveMatrix::full_3d(Quantity::Stiffness, Frame::Material, Mat6::identity());
        assert_eq!(c.get(5, 5), Some(1.0));
        assert_eq!(c.get(6, 0), None);
    }

    #[test]
    fn test_serializes_rows() {
        let json = serde_json::to_value(stiffness_3()).unwrap();
        assert_eq!(json["dimensionality"], "plane_stress");
        assert_eq!(json["rows"][2][2], 1.0);
    }
}
