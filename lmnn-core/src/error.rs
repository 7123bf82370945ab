//! Error types for the lmnn core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested point that exceeded the source bounds.
        index: usize,
    },
    /// Compared points had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the left-hand point.
        left: usize,
        /// Dimensionality of the right-hand point.
        right: usize,
    },
    /// A point contained a non-finite coordinate.
    #[error("non-finite value {value} at coordinate {index}")]
    NonFinite {
        /// Coordinate position of the offending value.
        index: usize,
        /// The non-finite value encountered.
        value: f32,
    },
    /// Data source contained no points.
    #[error("data source contains no points")]
    EmptyData,
    /// Data source points must have positive dimension.
    #[error("data source points must have positive dimension")]
    ZeroDimension,
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// Compared points had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DATA_SOURCE_DIMENSION_MISMATCH",
        /// A point contained a non-finite coordinate.
        NonFinite => NonFinite { .. } => "DATA_SOURCE_NON_FINITE",
        /// Data source contained no points.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source points must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
    }
}

/// Error type produced when configuring or running [`crate::Constraints`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConstraintsError {
    /// The neighbour count must be at least one.
    #[error("k must be at least 1 (got {got})")]
    InvalidK {
        /// The invalid neighbour count supplied by the caller.
        got: usize,
    },
    /// The label vector length did not match the dataset point count.
    #[error("label vector has {labels} entries but the data source has {points} points")]
    LabelCountMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of points in the data source.
        points: usize,
    },
    /// An explicit query subset referenced a point outside the dataset.
    #[error("point index {index} is out of bounds for {points} points")]
    PointOutOfBounds {
        /// The offending subset entry.
        index: usize,
        /// Number of points in the data source.
        points: usize,
    },
    /// A contiguous batch extended beyond the dataset.
    #[error("batch [{begin}, {begin} + {batch_size}) exceeds {points} points")]
    InvalidRange {
        /// First point of the requested batch.
        begin: usize,
        /// Number of points in the requested batch.
        batch_size: usize,
        /// Number of points in the data source.
        points: usize,
    },
    /// A queried point's candidate pool was smaller than the requested k.
    #[error(
        "point {point} (label {label}) has only {available} candidates but {requested} were requested"
    )]
    InsufficientNeighbours {
        /// A queried point whose pool was too small.
        point: usize,
        /// Label of the queried point.
        label: usize,
        /// Candidates available in the relevant pool.
        available: usize,
        /// Neighbours requested per point.
        requested: usize,
    },
    /// Impostors were requested but fewer than two labels exist.
    #[error("impostor queries need at least 2 distinct labels (got {classes})")]
    DegenerateLabelling {
        /// Number of distinct labels observed.
        classes: usize,
    },
    /// A queried label was absent from the precalculated partition.
    ///
    /// Signals that labels changed after `precalculate` without an
    /// intervening `invalidate`.
    #[error("label {label} is not present in the precalculated partition")]
    UnknownLabel {
        /// The label missing from the partition.
        label: usize,
    },
    /// A [`crate::DataSource`] operation failed while computing constraints.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error bubbled up by a calculator.
        error: DataSourceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConstraintsError`] variants.
    enum ConstraintsErrorCode for ConstraintsError {
        /// The neighbour count must be at least one.
        InvalidK => InvalidK { .. } => "LMNN_INVALID_K",
        /// The label vector length did not match the dataset point count.
        LabelCountMismatch => LabelCountMismatch { .. } => "LMNN_LABEL_COUNT_MISMATCH",
        /// An explicit query subset referenced a point outside the dataset.
        PointOutOfBounds => PointOutOfBounds { .. } => "LMNN_POINT_OUT_OF_BOUNDS",
        /// A contiguous batch extended beyond the dataset.
        InvalidRange => InvalidRange { .. } => "LMNN_INVALID_RANGE",
        /// A queried point's candidate pool was smaller than the requested k.
        InsufficientNeighbours => InsufficientNeighbours { .. } => "LMNN_INSUFFICIENT_NEIGHBOURS",
        /// Impostors were requested but fewer than two labels exist.
        DegenerateLabelling => DegenerateLabelling { .. } => "LMNN_DEGENERATE_LABELLING",
        /// A queried label was absent from the precalculated partition.
        UnknownLabel => UnknownLabel { .. } => "LMNN_UNKNOWN_LABEL",
        /// A [`crate::DataSource`] operation failed while computing constraints.
        DataSourceFailure => DataSource { .. } => "LMNN_DATA_SOURCE_FAILURE",
    }
}

impl ConstraintsError {
    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a [`crate::DataSource`].
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ConstraintsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ConstraintsError::InvalidK { got: 0 }, "LMNN_INVALID_K")]
    #[case(
        ConstraintsError::LabelCountMismatch { labels: 3, points: 4 },
        "LMNN_LABEL_COUNT_MISMATCH"
    )]
    #[case(
        ConstraintsError::InsufficientNeighbours { point: 1, label: 0, available: 1, requested: 2 },
        "LMNN_INSUFFICIENT_NEIGHBOURS"
    )]
    #[case(ConstraintsError::DegenerateLabelling { classes: 1 }, "LMNN_DEGENERATE_LABELLING")]
    #[case(ConstraintsError::UnknownLabel { label: 9 }, "LMNN_UNKNOWN_LABEL")]
    fn constraints_error_codes_are_stable(
        #[case] error: ConstraintsError,
        #[case] expected: &str,
    ) {
        assert_eq!(error.code().as_str(), expected);
    }

    #[rstest]
    fn data_source_code_is_exposed_through_wrapper() {
        let error = ConstraintsError::DataSource {
            data_source: Arc::from("dense"),
            error: DataSourceError::OutOfBounds { index: 7 },
        };
        assert_eq!(error.code().as_str(), "LMNN_DATA_SOURCE_FAILURE");
        assert_eq!(
            error.data_source_code(),
            Some(DataSourceErrorCode::OutOfBounds)
        );
        assert_eq!(
            ConstraintsError::InvalidK { got: 0 }.data_source_code(),
            None
        );
    }
}
