//! Deterministic vector data for tests and benchmarks.
//!
//! Everything here is driven by a [`ChaCha8Rng`] so a failing case can be
//! replayed from its seed.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// `n` vectors with components uniform in `[-1, 1)`.
pub fn random_vectors<R: Rng + ?Sized>(rng: &mut R, n: usize, dims: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|_| (0..dims).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect()
}

/// `n` vectors scattered around `clusters` random centers with spread
/// `sigma` per component.
pub fn clustered_vectors<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    dims: usize,
    clusters: usize,
    sigma: f32,
) -> Vec<Vec<f32>> {
    let centers = random_vectors(rng, clusters.max(1), dims);
    (0..n)
        .map(|i| {
            centers[i % centers.len()]
                .iter()
                .map(|c| c + rng.gen_range(-sigma..=sigma))
                .collect()
        })
        .collect()
}

/// Points `0, 1, .., n-1` along the first axis. Nearest neighbors are known
/// without computing anything.
pub fn line_vectors(n: usize, dims: usize) -> Vec<Vec<f32>> {
    (0..n)
        .map(|i| {
            let mut v = vec![0.0; dims];
            if let Some(first) = v.first_mut() {
                *first = i as f32;
            }
            v
        })
        .collect()
}

/// Strategy: a finite vector of exactly `dims` components in `[-100, 100]`.
pub fn arb_vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dims)
}

/// Strategy: between `len.start` and `len.end - 1` vectors of `dims` components.
pub fn arb_vectors(
    dims: usize,
    len: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(arb_vector(dims), len)
}
