//! Constraint generation orchestration.
//!
//! [`Constraints`] owns the precalculated label partition and composes the
//! neighbour-search engine with it to produce target neighbours, impostors,
//! and triplets. The partition is built lazily on first use and reused until
//! the caller explicitly invalidates it; the dataset and labels themselves
//! are only ever borrowed for the duration of a call.

use std::{num::NonZeroUsize, sync::Arc};

use tracing::{instrument, warn};

use crate::{
    Result,
    datasource::DataSource,
    error::ConstraintsError,
    partition::LabelPartition,
    search::{LinearScan, NeighbourSearch, SearchError, SearchOutput},
    selection::QuerySelection,
    table::{DistanceTable, NeighbourTable, Triplet, TripletSet},
};

/// Which candidate pool a calculation draws from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Pool {
    /// Same-labelled points, self excluded at query time.
    Same,
    /// Differently-labelled points.
    Diff,
}

/// Generator of distance-based training constraints over a labelled dataset.
///
/// For each queried point the generator finds its k nearest same-labelled
/// neighbours (target neighbours), its k nearest differently-labelled
/// neighbours (impostors), and assembles (anchor, target, impostor) triplets
/// from the two. The search engine is a substitutable type parameter
/// defaulting to the exact [`LinearScan`].
///
/// Calls that share a partition are read-only with respect to it, so a
/// caller may split the dataset into disjoint batches and run the batch
/// overloads from several threads — provided `precalculate` (or the first
/// lazily-triggered build) has completed beforehand and no call runs
/// concurrently with `invalidate`.
///
/// # Examples
/// ```
/// use lmnn_core::{Constraints, DataSource, DataSourceError};
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
/// let source = Line(vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
/// let labels = [0, 0, 0, 1, 1, 1];
/// let mut constraints = Constraints::new(1)?;
///
/// let targets = constraints.target_neighbours(&source, &labels)?;
/// assert_eq!(targets.column(0), &[1]);
///
/// let impostors = constraints.impostors(&source, &labels)?;
/// assert_eq!(impostors.column(0), &[3]);
/// assert_eq!(impostors.column(3), &[2]);
/// # Ok::<(), lmnn_core::ConstraintsError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Constraints<S = LinearScan> {
    k: NonZeroUsize,
    search: S,
    partition: Option<LabelPartition>,
}

impl Constraints<LinearScan> {
    /// Creates a generator over the exact brute-force engine.
    ///
    /// # Errors
    /// Returns [`ConstraintsError::InvalidK`] when `k` is zero.
    pub fn new(k: usize) -> Result<Self> {
        Self::with_search(k, LinearScan)
    }
}

impl<S: NeighbourSearch> Constraints<S> {
    /// Creates a generator over a caller-supplied search engine.
    ///
    /// # Errors
    /// Returns [`ConstraintsError::InvalidK`] when `k` is zero.
    pub fn with_search(k: usize, search: S) -> Result<Self> {
        let k = NonZeroUsize::new(k).ok_or(ConstraintsError::InvalidK { got: k })?;
        Ok(Self {
            k,
            search,
            partition: None,
        })
    }

    /// Returns the number of neighbours requested per point.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k.get()
    }

    /// Overrides the number of neighbours requested per point.
    ///
    /// Takes effect on the next calculation; the partition cache is
    /// unaffected.
    ///
    /// # Errors
    /// Returns [`ConstraintsError::InvalidK`] when `k` is zero.
    pub fn set_k(&mut self, k: usize) -> Result<()> {
        self.k = NonZeroUsize::new(k).ok_or(ConstraintsError::InvalidK { got: k })?;
        Ok(())
    }

    /// Returns whether a label partition has been precalculated.
    #[must_use]
    pub fn is_precalculated(&self) -> bool {
        self.partition.is_some()
    }

    /// Builds (or rebuilds) the label partition from `labels`.
    ///
    /// Never fails; a single-class labelling is accepted here and only
    /// rejected once impostors are requested. Calculators trigger this
    /// transparently on first use, so an explicit call is only needed to
    /// refresh the partition after the labels changed.
    pub fn precalculate(&mut self, labels: &[usize]) {
        self.partition = Some(LabelPartition::build(labels));
    }

    /// Discards the precalculated partition.
    ///
    /// The next calculation rebuilds it from the labels it is handed. Label
    /// changes are never auto-detected; forgetting to invalidate after a
    /// relabelling surfaces as [`ConstraintsError::UnknownLabel`] at best
    /// and silently stale pools at worst.
    pub fn invalidate(&mut self) {
        self.partition = None;
    }

    /// Returns the precalculated partition, if any.
    #[must_use]
    pub fn partition(&self) -> Option<&LabelPartition> {
        self.partition.as_ref()
    }

    /// Computes the k nearest same-labelled neighbours of every point.
    ///
    /// Column `p` of the returned `k × n` table holds point `p`'s target
    /// neighbours in ascending distance order. A point is never its own
    /// target neighbour.
    ///
    /// # Errors
    /// Returns [`ConstraintsError::LabelCountMismatch`] when `labels` and
    /// `source` disagree on the point count, and
    /// [`ConstraintsError::InsufficientNeighbours`] when some class holds
    /// fewer than `k + 1` points.
    pub fn target_neighbours<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
    ) -> Result<NeighbourTable> {
        self.neighbours_for(source, labels, QuerySelection::Full, Pool::Same)
            .map(SearchOutput::into_neighbours)
    }

    /// Computes target neighbours for the batch `[begin, begin + batch_size)`.
    ///
    /// Column `p - begin` corresponds to point `p`. The batch restricts only
    /// the query set; each point still searches its full same-label
    /// reference pool.
    ///
    /// # Errors
    /// As [`Constraints::target_neighbours`], plus
    /// [`ConstraintsError::InvalidRange`] when the batch exceeds the
    /// dataset.
    pub fn target_neighbours_range<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
        begin: usize,
        batch_size: usize,
    ) -> Result<NeighbourTable> {
        self.neighbours_for(
            source,
            labels,
            QuerySelection::Range { begin, batch_size },
            Pool::Same,
        )
        .map(SearchOutput::into_neighbours)
    }

    /// Computes the k nearest differently-labelled neighbours of every point.
    ///
    /// # Errors
    /// Returns [`ConstraintsError::DegenerateLabelling`] when fewer than two
    /// distinct labels exist, and
    /// [`ConstraintsError::InsufficientNeighbours`] when some point has
    /// fewer than `k` differently-labelled candidates.
    pub fn impostors<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
    ) -> Result<NeighbourTable> {
        self.neighbours_for(source, labels, QuerySelection::Full, Pool::Diff)
            .map(SearchOutput::into_neighbours)
    }

    /// As [`Constraints::impostors`], additionally returning the distances
    /// in a parallel table of identical shape.
    ///
    /// # Errors
    /// As [`Constraints::impostors`].
    pub fn impostors_with_distances<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
    ) -> Result<SearchOutput> {
        self.neighbours_for(source, labels, QuerySelection::Full, Pool::Diff)
    }

    /// Computes impostors for the batch `[begin, begin + batch_size)`.
    ///
    /// # Errors
    /// As [`Constraints::impostors`], plus
    /// [`ConstraintsError::InvalidRange`] when the batch exceeds the
    /// dataset.
    pub fn impostors_range<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
        begin: usize,
        batch_size: usize,
    ) -> Result<NeighbourTable> {
        self.neighbours_for(
            source,
            labels,
            QuerySelection::Range { begin, batch_size },
            Pool::Diff,
        )
        .map(SearchOutput::into_neighbours)
    }

    /// As [`Constraints::impostors_range`], additionally returning the
    /// distances.
    ///
    /// # Errors
    /// As [`Constraints::impostors_range`].
    pub fn impostors_range_with_distances<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
        begin: usize,
        batch_size: usize,
    ) -> Result<SearchOutput> {
        self.neighbours_for(
            source,
            labels,
            QuerySelection::Range { begin, batch_size },
            Pool::Diff,
        )
    }

    /// Computes impostors and distances for an explicit point subset.
    ///
    /// The subset may be unordered and non-contiguous; output columns align
    /// to the subset's order, not to dataset position.
    ///
    /// # Errors
    /// As [`Constraints::impostors`], plus
    /// [`ConstraintsError::PointOutOfBounds`] when the subset references a
    /// point outside the dataset.
    pub fn impostors_for_points<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
        points: &[usize],
    ) -> Result<SearchOutput> {
        self.neighbours_for(source, labels, QuerySelection::Points(points), Pool::Diff)
    }

    /// Generates the `n·k` training triplets.
    ///
    /// For every point `i`, its rank-`r` target neighbour pairs with its
    /// rank-`r` impostor (positional pairing, not a cross product), giving
    /// `k` triplet columns per point, grouped by point in target-rank order.
    /// Target neighbours and impostors are each computed exactly once; no
    /// additional spatial search happens here.
    ///
    /// # Errors
    /// Combines the error conditions of [`Constraints::target_neighbours`]
    /// and [`Constraints::impostors`].
    #[instrument(
        name = "constraints.triplets",
        err,
        skip(self, source, labels),
        fields(data_source = %source.name(), points = labels.len(), k = self.k.get()),
    )]
    pub fn triplets<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
    ) -> Result<TripletSet> {
        let targets = self
            .neighbours_for(source, labels, QuerySelection::Full, Pool::Same)?
            .into_neighbours();
        let impostors = self
            .neighbours_for(source, labels, QuerySelection::Full, Pool::Diff)?
            .into_neighbours();

        let k = self.k.get();
        let mut columns = Vec::with_capacity(labels.len() * k);
        for anchor in 0..labels.len() {
            let targets = targets.column(anchor);
            let impostors = impostors.column(anchor);
            for rank in 0..k {
                columns.push(Triplet {
                    anchor,
                    target: targets[rank],
                    impostor: impostors[rank],
                });
            }
        }
        Ok(TripletSet::new(columns))
    }

    /// Shared calculator: validates inputs, groups the queried points by
    /// label, and runs one search per label against that label's pool.
    #[instrument(
        name = "constraints.neighbours",
        err,
        skip(self, source, labels, selection),
        fields(
            data_source = %source.name(),
            points = labels.len(),
            k = self.k.get(),
            pool = ?pool,
        ),
    )]
    fn neighbours_for<D: DataSource>(
        &mut self,
        source: &D,
        labels: &[usize],
        selection: QuerySelection<'_>,
        pool: Pool,
    ) -> Result<SearchOutput> {
        let points = source.len();
        if labels.len() != points {
            return Err(ConstraintsError::LabelCountMismatch {
                labels: labels.len(),
                points,
            });
        }
        let queries = selection.resolve(points)?;
        let k = self.k;

        let partition: &LabelPartition = self
            .partition
            .get_or_insert_with(|| LabelPartition::build(labels));

        if pool == Pool::Diff && partition.class_count() < 2 {
            warn!(
                classes = partition.class_count(),
                "impostor query on degenerate labelling"
            );
            return Err(ConstraintsError::DegenerateLabelling {
                classes: partition.class_count(),
            });
        }

        // Group output columns by label so the engine runs once per label,
        // scoped to that label's reference pool.
        let mut groups: Vec<Vec<(usize, usize)>> = vec![Vec::new(); partition.class_count()];
        for (column, &point) in queries.iter().enumerate() {
            let label = labels[point];
            let position = partition
                .position_of(label)
                .ok_or(ConstraintsError::UnknownLabel { label })?;
            groups[position].push((column, point));
        }

        // Reject undersized pools up front so a failing call writes nothing.
        for (position, group) in groups.iter().enumerate() {
            let Some(&(_, first_point)) = group.first() else {
                continue;
            };
            let available = match pool {
                Pool::Same => partition.same_indices(position).len().saturating_sub(1),
                Pool::Diff => partition.diff_indices(position).len(),
            };
            if available < k.get() {
                return Err(ConstraintsError::InsufficientNeighbours {
                    point: first_point,
                    label: labels[first_point],
                    available,
                    requested: k.get(),
                });
            }
        }

        let mut neighbour_data = vec![0usize; k.get() * queries.len()];
        let mut distance_data = vec![0.0f32; k.get() * queries.len()];

        for (position, group) in groups.iter().enumerate() {
            let Some(&(_, anchor)) = group.first() else {
                continue;
            };
            let references = match pool {
                Pool::Same => partition.same_indices(position),
                Pool::Diff => partition.diff_indices(position),
            };
            let group_queries: Vec<usize> = group.iter().map(|&(_, point)| point).collect();
            let output = self
                .search
                .search(source, references, &group_queries, k)
                .map_err(|error| {
                    map_search_error(source.name(), anchor, labels[anchor], error)
                })?;

            // Scatter the per-group columns back to their output positions.
            for (slot, &(column, _)) in group.iter().enumerate() {
                let start = column * k.get();
                neighbour_data[start..start + k.get()]
                    .copy_from_slice(output.neighbours().column(slot));
                distance_data[start..start + k.get()]
                    .copy_from_slice(output.distances().column(slot));
            }
        }

        Ok(SearchOutput::new(
            NeighbourTable::from_parts(k.get(), neighbour_data),
            DistanceTable::from_parts(k.get(), distance_data),
        ))
    }
}

fn map_search_error(
    data_source: &str,
    point: usize,
    label: usize,
    error: SearchError,
) -> ConstraintsError {
    match error {
        SearchError::InsufficientReferences {
            available,
            requested,
        } => ConstraintsError::InsufficientNeighbours {
            point,
            label,
            available,
            requested,
        },
        SearchError::Source(error) => ConstraintsError::DataSource {
            data_source: Arc::from(data_source),
            error,
        },
    }
}
