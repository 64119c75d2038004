//! Exact top-k selection.
//!
//! Quickselect places the k smallest distances in the front partition in
//! average O(n), then a quicksort of just that partition orders them. The
//! result is exact and distance-ordered, which makes it the reference that
//! approximate indices and custom metrics are validated against.

use crate::distance::Distance;

/// Return the indices of the `k` candidates nearest to `query`, nearest first.
///
/// `k` is clamped to the number of candidates.
///
/// # Example
///
/// ```
/// use strata_vector::{knn, DistanceFunction};
///
/// let candidates = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
/// assert_eq!(knn(&candidates, &DistanceFunction::Cosine, &[1.0, 0.0], 1), vec![0]);
/// ```
pub fn knn<V, D>(candidates: &[V], distance: &D, query: &[f32], k: usize) -> Vec<usize>
where
    V: AsRef<[f32]>,
    D: Distance + ?Sized,
{
    let mut distances: Vec<f32> = candidates
        .iter()
        .map(|candidate| distance.distance(candidate.as_ref(), query))
        .collect();
    top_k(&mut distances, k)
}

/// Return the positions of the `k` smallest values in `distances`, smallest first.
///
/// `distances` is reordered in place; on return its first `k` entries are the
/// selected distances in ascending order. Equal distances are not guaranteed
/// to keep their input order.
pub fn top_k(distances: &mut [f32], k: usize) -> Vec<usize> {
    let n = distances.len();
    let k = k.min(n);
    if k == 0 {
        return Vec::new();
    }

    let mut ids: Vec<usize> = (0..n).collect();
    if k < n {
        quick_select(&mut ids, distances, 0, n - 1, k);
    }
    quick_sort(&mut ids[..k], &mut distances[..k]);

    ids.truncate(k);
    ids
}

/// Partition until position `k` holds its final sorted value, so everything
/// before it is one of the k smallest.
fn quick_select(ids: &mut [usize], distances: &mut [f32], mut left: usize, mut right: usize, k: usize) {
    while left < right {
        let pivot = left + (right - left) / 2;
        let pivot = partition(ids, distances, left, right, pivot);
        match k.cmp(&pivot) {
            std::cmp::Ordering::Equal => return,
            std::cmp::Ordering::Less => right = pivot - 1,
            std::cmp::Ordering::Greater => left = pivot + 1,
        }
    }
}

fn quick_sort(ids: &mut [usize], distances: &mut [f32]) {
    if ids.len() < 2 {
        return;
    }

    let last = ids.len() - 1;
    let pivot = partition(ids, distances, 0, last, ids.len() / 2);

    let (ids_lo, ids_hi) = ids.split_at_mut(pivot);
    let (dist_lo, dist_hi) = distances.split_at_mut(pivot);
    quick_sort(ids_lo, dist_lo);
    quick_sort(&mut ids_hi[1..], &mut dist_hi[1..]);
}

/// Lomuto partition of `[left, right]` around the value at `pivot`, applied to
/// both parallel arrays. Returns the pivot's final position.
fn partition(
    ids: &mut [usize],
    distances: &mut [f32],
    left: usize,
    right: usize,
    pivot: usize,
) -> usize {
    let pivot_value = distances[pivot];
    swap(ids, distances, pivot, right);

    let mut store = left;
    for i in left..right {
        if distances[i] < pivot_value {
            swap(ids, distances, i, store);
            store += 1;
        }
    }

    swap(ids, distances, store, right);
    store
}

#[inline]
fn swap(ids: &mut [usize], distances: &mut [f32], a: usize, b: usize) {
    ids.swap(a, b);
    distances.swap(a, b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{cosine_distance, DistanceFunction};

    fn diagonal_fan() -> Vec<Vec<f32>> {
        (0..10)
            .map(|i| vec![1.0 - i as f32 / 10.0, i as f32 / 10.0])
            .collect()
    }

    #[test]
    fn test_same_vector_tie_break() {
        // A slight offset on the query keeps the expected order stable.
        let candidates = vec![vec![0.1, 0.9], vec![0.1, 0.9]];
        let got = knn(&candidates, &cosine_distance, &[0.100001, 0.9], 2);
        assert_eq!(got, vec![1, 0]);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        let orthogonal = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(knn(&orthogonal, &cosine_distance, &[1.0, 0.0], 1), vec![0]);

        let opposite = vec![vec![1.0, 0.0], vec![-1.0, 0.0]];
        assert_eq!(knn(&opposite, &cosine_distance, &[1.0, 0.0], 1), vec![0]);
    }

    #[test]
    fn test_fan_towards_y_axis() {
        let got = knn(&diagonal_fan(), &cosine_distance, &[0.0001, 1.0], 5);
        assert_eq!(got, vec![9, 8, 7, 6, 5]);
    }

    #[test]
    fn test_fan_towards_diagonal() {
        let got = knn(&diagonal_fan(), &cosine_distance, &[10001.0, 10000.0], 5);
        assert_eq!(got, vec![5, 4, 6, 3, 7]);
    }

    #[test]
    fn test_k_clamped_and_zero() {
        let candidates = vec![vec![3.0], vec![1.0], vec![2.0]];
        let metric = DistanceFunction::Euclidean;

        assert_eq!(knn(&candidates, &metric, &[0.0], 10), vec![1, 2, 0]);
        assert!(knn(&candidates, &metric, &[0.0], 0).is_empty());

        let empty: Vec<Vec<f32>> = Vec::new();
        assert!(knn(&empty, &metric, &[0.0], 3).is_empty());
    }

    #[test]
    fn test_top_k_reorders_distances() {
        let mut distances = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let ids = top_k(&mut distances, 3);
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(&distances[..3], &[1.0, 2.0, 3.0]);
    }
}
