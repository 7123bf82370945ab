//! Data source abstractions for the lmnn core runtime.
//!
//! The data source is the crate's view of the caller-owned dataset plus the
//! configured distance metric: the calculators only ever reference points by
//! index and ask the source for pairwise distances.

use crate::error::DataSourceError;

/// Abstraction over a collection of points that can yield pairwise distances.
///
/// Implementations decide the storage layout and the metric; the constraint
/// calculators stay metric-agnostic. Distances must be non-negative,
/// symmetric, and finite.
///
/// # Examples
/// ```
/// use lmnn_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f32>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b) * (a - b))
///     }
/// }
///
/// let source = Line(vec![0.0, 1.0, 4.0]);
/// assert_eq!(source.len(), 3);
/// assert_eq!(source.distance(0, 2)?, 16.0);
/// assert_eq!(source.batch_distances(1, &[0, 2])?, [1.0, 9.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns the number of points in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name used in error reports and logs.
    fn name(&self) -> &str;

    /// Computes the distance between two points.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] when either index exceeds the
    /// source bounds.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// Implementations can override this method to provide vectorised
    /// kernels. The default implementation calls [`DataSource::distance`]
    /// repeatedly and collects the results.
    ///
    /// # Errors
    /// Returns any [`DataSourceError`] surfaced by [`DataSource::distance`].
    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f32>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::PointLine;

    #[test]
    fn batch_distances_follow_scalar_distance() {
        let source = PointLine::new(vec![0.0, 1.0, 3.0], vec![0, 0, 1]);
        let distances = source
            .batch_distances(0, &[1, 2])
            .expect("batch distances should succeed");
        assert_eq!(distances, vec![1.0, 9.0]);
    }

    #[test]
    fn batch_distances_propagate_errors() {
        let source = PointLine::new(vec![0.0, 1.0], vec![0, 1]);
        let err = source
            .batch_distances(0, &[1, 5])
            .expect_err("invalid candidate must fail");
        assert_eq!(err, DataSourceError::OutOfBounds { index: 5 });
    }
}
