//! Property suite for the cross-cutting calculator invariants.
//!
//! Generates small multi-class datasets sized so every pool can satisfy the
//! sampled k, then checks the label, ordering, and batching guarantees the
//! calculators advertise.

use proptest::prelude::*;

use crate::{
    Constraints,
    datasource::DataSource,
    test_utils::{PointLine, suite_proptest_config},
};

/// Generates `(coordinates, labels, k)` with 2–3 classes of `k + 1` to 6
/// points each, classes interleaved round-robin so label runs are broken up.
fn labelled_dataset() -> impl Strategy<Value = (Vec<f32>, Vec<usize>, usize)> {
    (1usize..=2).prop_flat_map(|k| {
        let class = proptest::collection::vec(-50.0f32..50.0, (k + 1)..=6);
        proptest::collection::vec(class, 2..=3).prop_map(move |classes| {
            let mut iterators: Vec<_> = classes.into_iter().map(Vec::into_iter).collect();
            let mut data = Vec::new();
            let mut labels = Vec::new();
            let mut drained = false;
            while !drained {
                drained = true;
                for (label, iterator) in iterators.iter_mut().enumerate() {
                    if let Some(value) = iterator.next() {
                        data.push(value);
                        labels.push(label);
                        drained = false;
                    }
                }
            }
            (data, labels, k)
        })
    })
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn targets_and_impostors_respect_labels((data, labels, k) in labelled_dataset()) {
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let targets = constraints
            .target_neighbours(&source, &labels)
            .expect("pools are sized for k");
        let impostors = constraints
            .impostors(&source, &labels)
            .expect("pools are sized for k");

        for anchor in 0..labels.len() {
            for &target in targets.column(anchor) {
                prop_assert_ne!(target, anchor);
                prop_assert_eq!(labels[target], labels[anchor]);
            }
            for &impostor in impostors.column(anchor) {
                prop_assert_ne!(labels[impostor], labels[anchor]);
            }
        }
    }

    #[test]
    fn distances_are_non_decreasing_by_rank((data, labels, k) in labelled_dataset()) {
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let output = constraints
            .impostors_with_distances(&source, &labels)
            .expect("pools are sized for k");
        for (anchor, (ids, distances)) in output
            .neighbours()
            .iter_columns()
            .zip(output.distances().iter_columns())
            .enumerate()
        {
            prop_assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
            for (&id, &distance) in ids.iter().zip(distances) {
                let expected = source
                    .distance(anchor, id)
                    .expect("generated points are in bounds");
                prop_assert!((distance - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn any_batch_partition_reproduces_the_full_run(
        (data, labels, k) in labelled_dataset(),
        split_hint in 0usize..64,
    ) {
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let full = constraints
            .target_neighbours(&source, &labels)
            .expect("full run must succeed");
        let split = split_hint % (labels.len() + 1);
        let head = constraints
            .target_neighbours_range(&source, &labels, 0, split)
            .expect("head batch must succeed");
        let tail = constraints
            .target_neighbours_range(&source, &labels, split, labels.len() - split)
            .expect("tail batch must succeed");

        for point in 0..labels.len() {
            let batched = if point < split {
                head.column(point)
            } else {
                tail.column(point - split)
            };
            prop_assert_eq!(batched, full.column(point));
        }
    }

    #[test]
    fn subset_queries_align_to_subset_order((data, labels, k) in labelled_dataset()) {
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let full = constraints
            .impostors_with_distances(&source, &labels)
            .expect("full run must succeed");

        // Every other point, in descending order: unordered and non-contiguous.
        let points: Vec<usize> = (0..labels.len()).rev().step_by(2).collect();
        let subset = constraints
            .impostors_for_points(&source, &labels, &points)
            .expect("subset run must succeed");

        prop_assert_eq!(subset.neighbours().columns(), points.len());
        for (column, &point) in points.iter().enumerate() {
            prop_assert_eq!(
                subset.neighbours().column(column),
                full.neighbours().column(point)
            );
        }
    }

    #[test]
    fn triplets_are_complete_and_grounded((data, labels, k) in labelled_dataset()) {
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let targets = constraints
            .target_neighbours(&source, &labels)
            .expect("targets must succeed");
        let impostors = constraints
            .impostors(&source, &labels)
            .expect("impostors must succeed");
        let triplets = constraints
            .triplets(&source, &labels)
            .expect("triplets must succeed");

        prop_assert_eq!(triplets.len(), labels.len() * k);
        for (column, triplet) in triplets.iter().enumerate() {
            prop_assert_eq!(triplet.anchor, column / k);
            prop_assert!(targets.column(triplet.anchor).contains(&triplet.target));
            prop_assert!(impostors.column(triplet.anchor).contains(&triplet.impostor));
        }
    }

    #[test]
    fn equidistant_candidates_rank_by_ascending_index(
        class_size in 2usize..6,
        k in 1usize..3,
    ) {
        prop_assume!(k < class_size);
        // Two classes stacked on two coordinates: every same-label candidate
        // is equidistant from its anchor, so ranks must fall back to index
        // order.
        let mut data = vec![0.0f32; class_size];
        data.extend(std::iter::repeat_n(1.0f32, class_size));
        let labels: Vec<usize> = std::iter::repeat_n(0usize, class_size)
            .chain(std::iter::repeat_n(1usize, class_size))
            .collect();
        let source = PointLine::new(data, labels.clone());
        let mut constraints = Constraints::new(k).expect("sampled k is positive");

        let targets = constraints
            .target_neighbours(&source, &labels)
            .expect("targets must succeed");
        for anchor in 0..labels.len() {
            let expected: Vec<usize> = (0..labels.len())
                .filter(|&candidate| candidate != anchor && labels[candidate] == labels[anchor])
                .take(k)
                .collect();
            prop_assert_eq!(targets.column(anchor), expected.as_slice());
        }
    }
}
