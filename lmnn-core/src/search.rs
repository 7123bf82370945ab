//! Nearest-neighbour query boundary.
//!
//! Wraps whichever search engine performs the actual spatial work behind the
//! [`NeighbourSearch`] trait. The bundled [`LinearScan`] engine is an exact
//! brute-force scan; callers with an index structure of their own implement
//! the trait and hand it to [`crate::Constraints`].

use std::{cmp::Ordering, num::NonZeroUsize};

use thiserror::Error;

use crate::{
    datasource::DataSource,
    error::DataSourceError,
    table::{DistanceTable, NeighbourTable},
};

/// Neighbour discovered during a search, including its distance from the
/// query.
///
/// Ordering is ascending by distance with ties broken by ascending reference
/// index, which makes result ranks deterministic regardless of candidate
/// traversal order.
///
/// # Examples
/// ```
/// use lmnn_core::Neighbour;
///
/// let close = Neighbour { id: 3, distance: 0.25 };
/// let far = Neighbour { id: 1, distance: 0.75 };
/// assert!(close < far);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Index of the neighbour within the [`crate::DataSource`].
    pub id: usize,
    /// Distance between the query point and [`Neighbour::id`].
    pub distance: f32,
}

impl Eq for Neighbour {}

impl Ord for Neighbour {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Errors surfaced by a [`NeighbourSearch`] engine.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SearchError {
    /// The reference pool held fewer candidates than the requested k.
    #[error("reference pool holds {available} candidates but {requested} were requested")]
    InsufficientReferences {
        /// Candidates available after query-time self-exclusion.
        available: usize,
        /// Neighbours requested per query point.
        requested: usize,
    },
    /// The underlying data source failed.
    #[error("data source failed during neighbour search: {0}")]
    Source(#[from] DataSourceError),
}

/// Paired index and distance tables returned by a search, both `k × m`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutput {
    neighbours: NeighbourTable,
    distances: DistanceTable,
}

impl SearchOutput {
    /// Bundles matching neighbour and distance tables.
    ///
    /// Both tables must share the same shape; custom [`NeighbourSearch`]
    /// implementations construct their output through this function.
    #[must_use]
    pub fn new(neighbours: NeighbourTable, distances: DistanceTable) -> Self {
        debug_assert_eq!(neighbours.rows(), distances.rows());
        debug_assert_eq!(neighbours.columns(), distances.columns());
        Self {
            neighbours,
            distances,
        }
    }

    /// Returns the neighbour-index table.
    #[must_use]
    pub fn neighbours(&self) -> &NeighbourTable {
        &self.neighbours
    }

    /// Returns the distance table aligned with [`SearchOutput::neighbours`].
    #[must_use]
    pub fn distances(&self) -> &DistanceTable {
        &self.distances
    }

    /// Splits the output into its index and distance tables.
    #[must_use]
    pub fn into_parts(self) -> (NeighbourTable, DistanceTable) {
        (self.neighbours, self.distances)
    }

    /// Discards the distances and keeps the index table.
    #[must_use]
    pub fn into_neighbours(self) -> NeighbourTable {
        self.neighbours
    }
}

/// A k-nearest-neighbour engine over an indexed subset of a data source.
///
/// `references` selects which points form the searchable set and `queries`
/// the points to search for; both index into the same data source. Results
/// are sorted ascending by distance with ties broken by reference index. A
/// query point that appears in its own reference set is never reported as
/// its own neighbour.
pub trait NeighbourSearch {
    /// Finds the `k` nearest references for each query point.
    ///
    /// Output columns align with `queries` order.
    ///
    /// # Errors
    /// Returns [`SearchError::InsufficientReferences`] when a query's
    /// candidate pool (after self-exclusion) is smaller than `k`, and
    /// [`SearchError::Source`] when the data source fails.
    fn search<D: DataSource>(
        &self,
        source: &D,
        references: &[usize],
        queries: &[usize],
        k: NonZeroUsize,
    ) -> Result<SearchOutput, SearchError>;
}

/// Exact brute-force nearest-neighbour engine.
///
/// Evaluates every reference candidate per query through
/// [`DataSource::batch_distances`] and keeps the k best. Quadratic in the
/// subset sizes but exact and allocation-light; adequate for the dataset
/// scales constraint generation runs at, and the determinism oracle for any
/// substituted engine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LinearScan;

impl NeighbourSearch for LinearScan {
    fn search<D: DataSource>(
        &self,
        source: &D,
        references: &[usize],
        queries: &[usize],
        k: NonZeroUsize,
    ) -> Result<SearchOutput, SearchError> {
        let k = k.get();
        let mut neighbour_data = Vec::with_capacity(k * queries.len());
        let mut distance_data = Vec::with_capacity(k * queries.len());

        for &query in queries {
            let candidates: Vec<usize> = references
                .iter()
                .copied()
                .filter(|&candidate| candidate != query)
                .collect();
            if candidates.len() < k {
                return Err(SearchError::InsufficientReferences {
                    available: candidates.len(),
                    requested: k,
                });
            }

            let distances = source.batch_distances(query, &candidates)?;
            let mut ranked: Vec<Neighbour> = candidates
                .into_iter()
                .zip(distances)
                .map(|(id, distance)| Neighbour { id, distance })
                .collect();

            if ranked.len() > k {
                ranked.select_nth_unstable_by(k - 1, Neighbour::cmp);
                ranked.truncate(k);
            }
            ranked.sort_unstable();

            for neighbour in &ranked {
                neighbour_data.push(neighbour.id);
                distance_data.push(neighbour.distance);
            }
        }

        Ok(SearchOutput::new(
            NeighbourTable::from_parts(k, neighbour_data),
            DistanceTable::from_parts(k, distance_data),
        ))
    }
}
