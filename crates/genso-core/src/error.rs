//! Error types for material construction and composite editing

use genso_substance::SubstanceError;
use thiserror::Error;

/// Errors raised by material construction and composite layer editing.
///
/// Degenerate proportions (`<= 0`, `>= 1`) are never errors; the operations
/// define short-circuit behavior for them. Missing data (no temperature, no
/// vapor-pressure coefficients) propagates as `None` through the derived
/// calculations. Every error here is raised before any state changes, so a
/// failed edit leaves the tree untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MaterialError {
    #[error("composite requires at least one layer")]
    EmptyComposite,

    #[error("layer index {index} out of range for {len} layers")]
    LayerIndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Substance(#[from] SubstanceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MaterialError::LayerIndexOutOfRange { index: 5, len: 2 };
        assert_eq!(err.to_string(), "layer index 5 out of range for 2 layers");
        assert_eq!(
            MaterialError::EmptyComposite.to_string(),
            "composite requires at least one layer"
        );
    }
}
