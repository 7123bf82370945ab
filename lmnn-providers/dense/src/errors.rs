//! Construction errors for the dense matrix provider.

use thiserror::Error;

/// Errors raised while assembling a [`crate::DenseMatrix`].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenseMatrixError {
    /// Points must have at least one dimension.
    #[error("points must have at least one dimension")]
    ZeroDimension,
    /// The matrix must hold at least one point.
    #[error("the matrix must hold at least one point")]
    EmptyMatrix,
    /// The value buffer does not tile into columns of the stated dimension.
    #[error("buffer of {values} values cannot form columns of dimension {dimension}")]
    ShapeMismatch {
        /// Length of the supplied value buffer.
        values: usize,
        /// Stated dimensionality per point.
        dimension: usize,
    },
}
