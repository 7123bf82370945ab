//! Distance metric primitives.
//!
//! The calculators never touch coordinates; providers do, through a
//! substitutable [`Metric`]. Squared Euclidean distance is the default used
//! by large-margin learners, with plain Euclidean available where true
//! distances are preferred. The routines validate their inputs and surface
//! detailed errors so a provider can fail fast on malformed vectors.

use core::fmt;

use thiserror::Error;

/// Identifies whether an error was produced while inspecting the left or right
/// vector argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorKind {
    /// Value originating from the first argument.
    Left,
    /// Value originating from the second argument.
    Right,
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Errors emitted while computing distances.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistanceError {
    /// Either input vector had zero length.
    #[error("vectors must have positive dimension")]
    ZeroLength,
    /// Input vectors had different lengths.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Length of the left-hand vector.
        left: usize,
        /// Length of the right-hand vector.
        right: usize,
    },
    /// Encountered a non-finite value in one of the vectors.
    #[error("{which} vector contains a non-finite value at index {index}: {value}")]
    NonFinite {
        /// Which argument held the offending value.
        which: VectorKind,
        /// Coordinate position of the offending value.
        index: usize,
        /// The non-finite value encountered.
        value: f32,
    },
}

/// A pairwise distance evaluator.
///
/// Implementations must be non-negative and symmetric; they need not satisfy
/// the triangle inequality (squared Euclidean does not). The trait is the
/// substitution point that lets providers swap metrics without touching
/// calculator logic.
pub trait Metric {
    /// Evaluates the distance between two equal-length vectors.
    ///
    /// # Errors
    /// Returns a [`DistanceError`] when the inputs are empty, differ in
    /// length, or contain non-finite values.
    fn evaluate(&self, left: &[f32], right: &[f32]) -> Result<f32, DistanceError>;
}

/// Squared Euclidean distance, the conventional metric for margin-based
/// constraint generation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SquaredEuclidean;

impl Metric for SquaredEuclidean {
    fn evaluate(&self, left: &[f32], right: &[f32]) -> Result<f32, DistanceError> {
        squared_euclidean_distance(left, right)
    }
}

/// Euclidean distance.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Euclidean;

impl Metric for Euclidean {
    fn evaluate(&self, left: &[f32], right: &[f32]) -> Result<f32, DistanceError> {
        euclidean_distance(left, right)
    }
}

/// Computes the squared Euclidean distance between two vectors.
///
/// # Examples
///
/// ```
/// use lmnn_core::{squared_euclidean_distance, DistanceError};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = squared_euclidean_distance(&[1.0, 2.0], &[4.0, 6.0])?;
///     assert!((distance - 25.0).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`] when any input is empty.
/// - [`DistanceError::DimensionMismatch`] when input lengths differ.
/// - [`DistanceError::NonFinite`] when a value is NaN or infinite.
pub fn squared_euclidean_distance(left: &[f32], right: &[f32]) -> Result<f32, DistanceError> {
    validate_lengths(left, right)?;

    let mut sum = 0.0f64;
    for (index, (&l, &r)) in left.iter().zip(right.iter()).enumerate() {
        ensure_finite(l, VectorKind::Left, index)?;
        ensure_finite(r, VectorKind::Right, index)?;

        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }

    Ok(sum as f32)
}

/// Computes the Euclidean distance between two vectors.
///
/// # Errors
/// Propagates the validation errors of [`squared_euclidean_distance`].
pub fn euclidean_distance(left: &[f32], right: &[f32]) -> Result<f32, DistanceError> {
    Ok(f64::from(squared_euclidean_distance(left, right)?).sqrt() as f32)
}

fn validate_lengths(left: &[f32], right: &[f32]) -> Result<(), DistanceError> {
    if left.is_empty() || right.is_empty() {
        return Err(DistanceError::ZeroLength);
    }
    if left.len() != right.len() {
        return Err(DistanceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    Ok(())
}

fn ensure_finite(value: f32, which: VectorKind, index: usize) -> Result<(), DistanceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DistanceError::NonFinite {
            which,
            index,
            value,
        })
    }
}
