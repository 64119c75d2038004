use proptest::prelude::*;
use strata_vector::{knn, top_k, Distance, DistanceFunction};

fn arb_distances() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1000.0f32..1000.0, 0..200)
}

fn arb_points(dims: usize) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-10.0f32..10.0, dims), 1..100)
}

proptest! {
    #[test]
    fn test_top_k_matches_full_sort(distances in arb_distances(), k in 0usize..250) {
        let mut sorted = distances.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let original = distances.clone();
        let mut scratch = distances;
        let ids = top_k(&mut scratch, k);

        prop_assert_eq!(ids.len(), k.min(original.len()));

        // Ties may resolve either way, so compare the selected values.
        let selected: Vec<f32> = ids.iter().map(|&i| original[i]).collect();
        prop_assert_eq!(&selected[..], &sorted[..ids.len()]);
        prop_assert_eq!(&scratch[..ids.len()], &sorted[..ids.len()]);
    }

    #[test]
    fn test_knn_is_exact(points in arb_points(4), query in prop::collection::vec(-10.0f32..10.0, 4), k in 1usize..20) {
        let metric = DistanceFunction::Euclidean;
        let ids = knn(&points, &metric, &query, k);

        let mut expected: Vec<f32> = points.iter().map(|p| metric.distance(p, &query)).collect();
        expected.sort_by(|a, b| a.total_cmp(b));

        let got: Vec<f32> = ids.iter().map(|&i| metric.distance(&points[i], &query)).collect();
        prop_assert_eq!(&got[..], &expected[..ids.len()]);

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        prop_assert_eq!(unique.len(), ids.len());
    }
}
