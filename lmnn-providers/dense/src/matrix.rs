//! Column-major dense matrix provider.

use lmnn_core::{DataSource, DataSourceError, DistanceError, Metric, SquaredEuclidean};

use crate::errors::DenseMatrixError;

/// Dense dataset of `n` points in `d` dimensions backed by one contiguous
/// column-major buffer (each point is one column), evaluated under a
/// substitutable [`Metric`].
///
/// # Examples
/// ```
/// use lmnn_core::DataSource;
/// use lmnn_providers_dense::DenseMatrix;
///
/// // Three 2-d points: (0,0), (3,4), (6,8).
/// let matrix = DenseMatrix::from_columns(
///     "toy",
///     2,
///     vec![0.0, 0.0, 3.0, 4.0, 6.0, 8.0],
/// )?;
/// assert_eq!(matrix.len(), 3);
/// assert_eq!(matrix.distance(0, 1)?, 25.0); // squared Euclidean by default
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DenseMatrix<M = SquaredEuclidean> {
    name: String,
    points: usize,
    dimension: usize,
    values: Vec<f32>,
    metric: M,
}

impl DenseMatrix<SquaredEuclidean> {
    /// Creates a matrix from a column-major buffer under the default squared
    /// Euclidean metric.
    ///
    /// # Errors
    /// Returns [`DenseMatrixError::ZeroDimension`] when `dimension` is zero,
    /// [`DenseMatrixError::EmptyMatrix`] when the buffer is empty, and
    /// [`DenseMatrixError::ShapeMismatch`] when the buffer does not tile
    /// into whole columns.
    pub fn from_columns(
        name: impl Into<String>,
        dimension: usize,
        values: Vec<f32>,
    ) -> Result<Self, DenseMatrixError> {
        Self::with_metric(name, dimension, values, SquaredEuclidean)
    }
}

impl<M: Metric> DenseMatrix<M> {
    /// Creates a matrix from a column-major buffer under an explicit metric.
    ///
    /// # Errors
    /// As [`DenseMatrix::from_columns`].
    pub fn with_metric(
        name: impl Into<String>,
        dimension: usize,
        values: Vec<f32>,
        metric: M,
    ) -> Result<Self, DenseMatrixError> {
        if dimension == 0 {
            return Err(DenseMatrixError::ZeroDimension);
        }
        if values.is_empty() {
            return Err(DenseMatrixError::EmptyMatrix);
        }
        if values.len() % dimension != 0 {
            return Err(DenseMatrixError::ShapeMismatch {
                values: values.len(),
                dimension,
            });
        }
        Ok(Self {
            name: name.into(),
            points: values.len() / dimension,
            dimension,
            values,
            metric,
        })
    }

    /// Returns the dimensionality of each point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the coordinates of one point, if in bounds.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&[f32]> {
        self.column_slice(index).ok()
    }

    /// Returns the underlying column-major buffer.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn column_slice(&self, index: usize) -> Result<&[f32], DataSourceError> {
        if index >= self.points {
            return Err(DataSourceError::OutOfBounds { index });
        }
        let start = index
            .checked_mul(self.dimension)
            .ok_or(DataSourceError::OutOfBounds { index })?;
        let end = start
            .checked_add(self.dimension)
            .filter(|&end| end <= self.values.len())
            .ok_or(DataSourceError::OutOfBounds { index })?;
        Ok(&self.values[start..end])
    }
}

impl<M: Metric> DataSource for DenseMatrix<M> {
    fn len(&self) -> usize {
        self.points
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let a = self.column_slice(i)?;
        let b = self.column_slice(j)?;
        self.metric.evaluate(a, b).map_err(convert_distance_error)
    }
}

fn convert_distance_error(error: DistanceError) -> DataSourceError {
    match error {
        DistanceError::ZeroLength => DataSourceError::ZeroDimension,
        DistanceError::DimensionMismatch { left, right } => {
            DataSourceError::DimensionMismatch { left, right }
        }
        DistanceError::NonFinite { index, value, .. } => {
            DataSourceError::NonFinite { index, value }
        }
    }
}
