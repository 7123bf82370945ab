//! Shared test utilities for `lmnn-core`.

use lmnn_test_support::proptest_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{datasource::DataSource, error::DataSourceError};

/// Builds a standard proptest configuration from the shared run profile so
/// every property suite interprets `LMNN_PBT_CASES` and `LMNN_PBT_FORK` the
/// same way.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// One-dimensional labelled dataset under squared Euclidean distance.
///
/// Keeps its labels alongside the coordinates so fixtures travel as one
/// value; calculators still receive the labels explicitly.
#[derive(Clone, Debug)]
pub(crate) struct PointLine {
    data: Vec<f32>,
    labels: Vec<usize>,
}

impl PointLine {
    pub(crate) fn new(data: Vec<f32>, labels: Vec<usize>) -> Self {
        Self { data, labels }
    }

    pub(crate) fn labels(&self) -> &[usize] {
        &self.labels
    }
}

impl DataSource for PointLine {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &str {
        "point-line"
    }

    fn distance(&self, left: usize, right: usize) -> Result<f32, DataSourceError> {
        let a = self
            .data
            .get(left)
            .ok_or(DataSourceError::OutOfBounds { index: left })?;
        let b = self
            .data
            .get(right)
            .ok_or(DataSourceError::OutOfBounds { index: right })?;
        Ok((a - b) * (a - b))
    }
}

/// Two well-separated clusters of three points each: coordinates
/// `[0, 1, 2, 10, 11, 12]`, labels `[0, 0, 0, 1, 1, 1]`.
pub(crate) fn two_cluster_line() -> PointLine {
    PointLine::new(
        vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
        vec![0, 0, 0, 1, 1, 1],
    )
}
