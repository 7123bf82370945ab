//! Label partition cache.
//!
//! Precalculates, from the label vector, the unique labels and per-label
//! same/different index sets the calculators query against. Building never
//! fails: a single-class partition is valid and simply yields empty
//! different-label pools, deferring the failure to impostor-computation time.
//! The stored same-label sets include each point's own index; self-exclusion
//! is applied at query time, not here.

use std::collections::HashMap;

use tracing::debug;

/// Precalculated per-label index sets derived from a label vector.
///
/// # Examples
/// ```
/// use lmnn_core::LabelPartition;
///
/// let partition = LabelPartition::build(&[7, 3, 7, 3]);
/// assert_eq!(partition.class_count(), 2);
/// assert_eq!(partition.unique_labels(), &[3, 7]);
/// let position = partition.position_of(7).expect("label 7 is present");
/// assert_eq!(partition.same_indices(position), &[0, 2]);
/// assert_eq!(partition.diff_indices(position), &[1, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPartition {
    unique: Vec<usize>,
    positions: HashMap<usize, usize>,
    same: Vec<Vec<usize>>,
    diff: Vec<Vec<usize>>,
    points: usize,
}

impl LabelPartition {
    /// Builds a partition from a label vector.
    ///
    /// Idempotent for a fixed input; the result replaces any previous
    /// partition wholesale, there is no incremental update.
    #[must_use]
    pub fn build(labels: &[usize]) -> Self {
        let mut unique: Vec<usize> = labels.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let positions: HashMap<usize, usize> = unique
            .iter()
            .enumerate()
            .map(|(position, &label)| (label, position))
            .collect();

        let mut same = vec![Vec::new(); unique.len()];
        let mut diff = vec![Vec::new(); unique.len()];
        for (position, &label) in unique.iter().enumerate() {
            for (index, &candidate) in labels.iter().enumerate() {
                if candidate == label {
                    same[position].push(index);
                } else {
                    diff[position].push(index);
                }
            }
        }

        debug!(
            points = labels.len(),
            classes = unique.len(),
            "label partition rebuilt"
        );

        Self {
            unique,
            positions,
            same,
            diff,
            points: labels.len(),
        }
    }

    /// Returns the number of points the partition was built over.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points
    }

    /// Returns the number of distinct labels.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.unique.len()
    }

    /// Returns the distinct labels in ascending order.
    #[must_use]
    pub fn unique_labels(&self) -> &[usize] {
        &self.unique
    }

    /// Returns the dense position assigned to `label`, if present.
    #[must_use]
    pub fn position_of(&self, label: usize) -> Option<usize> {
        self.positions.get(&label).copied()
    }

    /// Returns the indices sharing the label at `position`, self included.
    ///
    /// # Panics
    /// Panics when `position >= self.class_count()`.
    #[must_use]
    pub fn same_indices(&self, position: usize) -> &[usize] {
        &self.same[position]
    }

    /// Returns the indices not sharing the label at `position`.
    ///
    /// # Panics
    /// Panics when `position >= self.class_count()`.
    #[must_use]
    pub fn diff_indices(&self, position: usize) -> &[usize] {
        &self.diff[position]
    }
}
