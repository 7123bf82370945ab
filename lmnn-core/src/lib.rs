//! Distance-based training constraints for large-margin metric learning.
//!
//! For each point in a labelled dataset the crate computes its k nearest
//! same-labelled neighbours ("target neighbours"), its k nearest
//! differently-labelled neighbours ("impostors"), and the derived
//! (anchor, target, impostor) triplets an outer optimiser consumes as
//! training constraints. Label partitions are precalculated once and reused
//! across calls; every calculator supports full-dataset, contiguous-range,
//! and explicit-subset querying.

mod constraints;
mod datasource;
mod error;
mod metric;
mod partition;
mod search;
mod selection;
mod table;

#[cfg(test)]
mod property_tests;
#[cfg(test)]
mod test_utils;

pub use crate::{
    constraints::Constraints,
    datasource::DataSource,
    error::{
        ConstraintsError, ConstraintsErrorCode, DataSourceError, DataSourceErrorCode, Result,
    },
    metric::{
        DistanceError, Euclidean, Metric, SquaredEuclidean, VectorKind, euclidean_distance,
        squared_euclidean_distance,
    },
    partition::LabelPartition,
    search::{LinearScan, Neighbour, NeighbourSearch, SearchError, SearchOutput},
    table::{DistanceTable, NeighbourTable, TableShapeError, Triplet, TripletSet},
};
