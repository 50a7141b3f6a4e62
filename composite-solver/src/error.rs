//! Error types for composite property calculations

use thiserror::Error;

/// Main error type for composite calculations
#[derive(Error, Debug)]
pub enum CompositeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Fiber volume fraction must lie strictly between 0 and 1, got {0}")]
    InvalidVolumeFraction(f64),

    #[error("Invalid layup sequence: {0}")]
    InvalidLayup(String),

    #[error("Material '{0}' not found in material table")]
    MaterialNotFound(String),

    #[error("Duplicate name '{0}' already exists")]
    DuplicateName(String),

    #[error("Degenerate material: {0}")]
    DegenerateMaterial(String),

    #[error("Singular {matrix} matrix (reciprocal condition number {rcond:e})")]
    SingularResponseMatrix { matrix: String, rcond: f64 },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: String, found: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CompositeError {
    pub(crate) fn singular(matrix: &str, rcond: f64) -> Self {
        Self::SingularResponseMatrix {
            matrix: matrix.to_string(),
            rcond,
        }
    }

    pub(crate) fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// True for errors caused by the request itself rather than by the computation.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput(_)
                | Self::InvalidVolumeFraction(_)
                | Self::InvalidLayup(_)
                | Self::MaterialNotFound(_)
                | Self::DuplicateName(_)
                | Self::DegenerateMaterial(_)
                | Self::Serialization(_)
        )
    }
}

/// Result type for composite calculations
pub type CompositeResult<T> = Result<T, CompositeError>;
