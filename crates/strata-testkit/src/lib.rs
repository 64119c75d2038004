//! Shared test support for strata crates.
//!
//! This crate provides tools for validating index correctness:
//! - Seeded vector generators and proptest strategies
//! - Recall computation against exact results
//! - A [`RecordingMeter`] that captures metrics and events
//!
//! # Usage
//!
//! ```
//! use strata_testkit::{random_vectors, recall_at_k, seeded_rng};
//!
//! let mut rng = seeded_rng(7);
//! let vectors = random_vectors(&mut rng, 100, 8);
//! assert_eq!(vectors.len(), 100);
//!
//! assert_eq!(recall_at_k(&[1, 2, 3], &[3, 2, 9]), 2.0 / 3.0);
//! ```

pub mod generators;
pub mod meter;

pub use generators::{
    arb_vector, arb_vectors, clustered_vectors, line_vectors, random_vectors, seeded_rng,
};
pub use meter::RecordingMeter;

use std::collections::HashSet;
use std::hash::Hash;

/// Fraction of `expected` ids that appear in `found`.
///
/// Returns 1.0 when `expected` is empty.
pub fn recall_at_k<T: Eq + Hash>(expected: &[T], found: &[T]) -> f64 {
    if expected.is_empty() {
        return 1.0;
    }
    let found: HashSet<&T> = found.iter().collect();
    let hits = expected.iter().filter(|id| found.contains(id)).count();
    hits as f64 / expected.len() as f64
}

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();
}
