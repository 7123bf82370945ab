use lmnn_core::{Constraints, DataSource, DataSourceError, Euclidean};
use rstest::rstest;

use crate::{DenseMatrix, DenseMatrixError};

fn toy_matrix() -> DenseMatrix {
    // Columns: (0,0), (3,4), (0,1).
    DenseMatrix::from_columns("toy", 2, vec![0.0, 0.0, 3.0, 4.0, 0.0, 1.0])
        .expect("buffer tiles into three columns")
}

#[test]
fn columns_are_points() {
    let matrix = toy_matrix();
    assert_eq!(matrix.len(), 3);
    assert_eq!(matrix.dimension(), 2);
    assert_eq!(matrix.point(1), Some([3.0, 4.0].as_slice()));
    assert_eq!(matrix.point(3), None);
}

#[test]
fn default_metric_is_squared_euclidean() {
    let matrix = toy_matrix();
    let distance = matrix.distance(0, 1).expect("points are in bounds");
    assert!((distance - 25.0).abs() < 1e-6);
}

#[test]
fn metrics_are_substitutable() {
    let matrix = DenseMatrix::with_metric(
        "toy-euclidean",
        2,
        vec![0.0, 0.0, 3.0, 4.0],
        Euclidean,
    )
    .expect("buffer tiles into two columns");
    let distance = matrix.distance(0, 1).expect("points are in bounds");
    assert!((distance - 5.0).abs() < 1e-6);
}

#[test]
fn distance_is_symmetric() {
    let matrix = toy_matrix();
    let forward = matrix.distance(1, 2).expect("points are in bounds");
    let backward = matrix.distance(2, 1).expect("points are in bounds");
    assert_eq!(forward, backward);
}

#[test]
fn out_of_bounds_points_are_reported() {
    let matrix = toy_matrix();
    let err = matrix.distance(0, 9).expect_err("point 9 does not exist");
    assert_eq!(err, DataSourceError::OutOfBounds { index: 9 });
}

#[test]
fn non_finite_coordinates_are_reported() {
    let matrix = DenseMatrix::from_columns("bad", 1, vec![0.0, f32::INFINITY])
        .expect("shape is valid");
    let err = matrix.distance(0, 1).expect_err("infinity must fail");
    assert!(matches!(err, DataSourceError::NonFinite { index: 0, .. }));
}

#[rstest]
#[case(0, vec![1.0], DenseMatrixError::ZeroDimension)]
#[case(2, vec![], DenseMatrixError::EmptyMatrix)]
#[case(2, vec![1.0, 2.0, 3.0], DenseMatrixError::ShapeMismatch { values: 3, dimension: 2 })]
fn malformed_buffers_are_rejected(
    #[case] dimension: usize,
    #[case] values: Vec<f32>,
    #[case] expected: DenseMatrixError,
) {
    let err = DenseMatrix::from_columns("bad", dimension, values)
        .expect_err("malformed buffer must fail");
    assert_eq!(err, expected);
}

#[test]
fn drives_the_constraint_calculators() {
    // The two-cluster line from the calculator suites, as 1-d columns.
    let matrix = DenseMatrix::from_columns(
        "two-clusters",
        1,
        vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
    )
    .expect("shape is valid");
    let labels = [0, 0, 0, 1, 1, 1];

    let mut constraints = Constraints::new(1).expect("k = 1 is valid");
    let targets = constraints
        .target_neighbours(&matrix, &labels)
        .expect("targets must succeed");
    assert_eq!(targets.column(0), &[1]);

    let impostors = constraints
        .impostors(&matrix, &labels)
        .expect("impostors must succeed");
    assert_eq!(impostors.column(0), &[3]);
    assert_eq!(impostors.column(3), &[2]);
}
