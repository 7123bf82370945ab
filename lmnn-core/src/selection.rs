//! Query-set selection for batched calculator calls.
//!
//! Every calculator operates on the full dataset, a contiguous index range,
//! or an arbitrary explicit subset, without altering per-point semantics.
//! Resolution validates the selection against the dataset size before any
//! search work begins.

use crate::error::ConstraintsError;

/// The set of points a calculator call queries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum QuerySelection<'a> {
    /// Every point in the dataset.
    Full,
    /// The contiguous range `[begin, begin + batch_size)`.
    Range { begin: usize, batch_size: usize },
    /// An explicit, possibly unordered and non-contiguous, index subset.
    /// Output columns align to this order, not to dataset position.
    Points(&'a [usize]),
}

impl QuerySelection<'_> {
    /// Resolves the selection to concrete point indices in output-column
    /// order.
    pub(crate) fn resolve(&self, points: usize) -> Result<Vec<usize>, ConstraintsError> {
        match *self {
            Self::Full => Ok((0..points).collect()),
            Self::Range { begin, batch_size } => {
                let end = begin
                    .checked_add(batch_size)
                    .filter(|&end| end <= points)
                    .ok_or(ConstraintsError::InvalidRange {
                        begin,
                        batch_size,
                        points,
                    })?;
                Ok((begin..end).collect())
            }
            Self::Points(indices) => {
                for &index in indices {
                    if index >= points {
                        return Err(ConstraintsError::PointOutOfBounds { index, points });
                    }
                }
                Ok(indices.to_vec())
            }
        }
    }
}
