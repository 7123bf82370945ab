//! Output containers for constraint calculations.
//!
//! Calculators return column-major `k × m` tables: one column per queried
//! point, `k` entries per column ordered by ascending distance rank. Triplet
//! assembly produces a `3 × (n·k)` equivalent exposed as a sequence of
//! [`Triplet`] columns.

use thiserror::Error;

/// Error returned when a table is built from a malformed column-major buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableShapeError {
    /// Tables must have at least one row.
    #[error("tables must have at least one row")]
    ZeroRows,
    /// The buffer length was not a multiple of the row count.
    #[error("buffer of length {len} cannot form columns of {rows} rows")]
    RaggedData {
        /// Length of the supplied buffer.
        len: usize,
        /// Requested rows per column.
        rows: usize,
    },
}

/// Column-major table of neighbour indices (`k` rows, one column per query).
///
/// # Examples
/// ```
/// use lmnn_core::NeighbourTable;
///
/// let table = NeighbourTable::try_from_column_major(2, vec![4, 1, 3, 0])
///     .expect("buffer forms two columns");
/// assert_eq!(table.rows(), 2);
/// assert_eq!(table.columns(), 2);
/// assert_eq!(table.column(1), &[3, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourTable {
    rows: usize,
    data: Vec<usize>,
}

/// Column-major table of neighbour distances, shaped like its paired
/// [`NeighbourTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    rows: usize,
    data: Vec<f32>,
}

macro_rules! impl_table {
    ($Table:ident, $Elem:ty) => {
        impl $Table {
            /// Attempts to build a table from a column-major buffer.
            ///
            /// # Errors
            /// Returns [`TableShapeError::ZeroRows`] when `rows` is zero and
            /// [`TableShapeError::RaggedData`] when the buffer length is not a
            /// multiple of `rows`.
            pub fn try_from_column_major(
                rows: usize,
                data: Vec<$Elem>,
            ) -> Result<Self, TableShapeError> {
                if rows == 0 {
                    return Err(TableShapeError::ZeroRows);
                }
                if data.len() % rows != 0 {
                    return Err(TableShapeError::RaggedData {
                        len: data.len(),
                        rows,
                    });
                }
                Ok(Self { rows, data })
            }

            /// Builds a table from a buffer the caller has already shaped.
            pub(crate) fn from_parts(rows: usize, data: Vec<$Elem>) -> Self {
                debug_assert!(rows > 0);
                debug_assert_eq!(data.len() % rows, 0);
                Self { rows, data }
            }

            /// Returns the number of rows per column (the configured k).
            #[must_use]
            pub fn rows(&self) -> usize {
                self.rows
            }

            /// Returns the number of columns (queried points).
            #[must_use]
            pub fn columns(&self) -> usize {
                self.data.len() / self.rows
            }

            /// Returns whether the table holds no columns.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.data.is_empty()
            }

            /// Returns one column, entries in ascending distance-rank order.
            ///
            /// # Panics
            /// Panics when `column >= self.columns()`.
            #[must_use]
            pub fn column(&self, column: usize) -> &[$Elem] {
                let start = column * self.rows;
                &self.data[start..start + self.rows]
            }

            /// Iterates over columns in query order.
            pub fn iter_columns(&self) -> impl Iterator<Item = &[$Elem]> {
                self.data.chunks_exact(self.rows)
            }

            /// Returns the underlying column-major buffer.
            #[must_use]
            pub fn as_slice(&self) -> &[$Elem] {
                &self.data
            }
        }
    };
}

impl_table!(NeighbourTable, usize);
impl_table!(DistanceTable, f32);

/// One training constraint: an anchor, a same-labelled target neighbour, and
/// a differently-labelled impostor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triplet {
    /// The anchor point.
    pub anchor: usize,
    /// A target neighbour of the anchor (same label).
    pub target: usize,
    /// An impostor of the anchor (different label).
    pub impostor: usize,
}

/// The `3 × (n·k)` triplet matrix, one [`Triplet`] per column.
///
/// Columns group all `k` triplets for point 0, then point 1, and so on, in
/// target-rank order within each group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TripletSet(Vec<Triplet>);

impl TripletSet {
    pub(crate) fn new(columns: Vec<Triplet>) -> Self {
        Self(columns)
    }

    /// Returns the number of triplet columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the set holds no triplets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the triplets in column order.
    #[must_use]
    pub fn as_slice(&self) -> &[Triplet] {
        &self.0
    }

    /// Iterates over the triplet columns.
    pub fn iter(&self) -> impl Iterator<Item = &Triplet> {
        self.0.iter()
    }

    /// Consumes the set and returns the underlying columns.
    #[must_use]
    pub fn into_inner(self) -> Vec<Triplet> {
        self.0
    }
}

impl IntoIterator for TripletSet {
    type Item = Triplet;
    type IntoIter = std::vec::IntoIter<Triplet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TripletSet {
    type Item = &'a Triplet;
    type IntoIter = std::slice::Iter<'a, Triplet>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
