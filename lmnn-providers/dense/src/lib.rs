//! Dense column-major f32 dataset provider for the lmnn calculators.

mod errors;
mod matrix;

pub use errors::DenseMatrixError;
pub use matrix::DenseMatrix;

#[cfg(test)]
mod tests;
