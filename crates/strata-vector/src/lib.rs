//! Vector math for strata.
//!
//! This crate provides the pieces of similarity search that do not depend on
//! the graph:
//!
//! - **Distance functions**: Euclidean (L2), Cosine, Inner Product, plus the
//!   [`Distance`] trait that lets callers plug in their own metric
//! - **Validation**: dimension and finiteness checks shared by every index
//! - **Exact top-k**: [`knn`] / [`top_k`], a quickselect-based baseline used
//!   to validate metrics and approximate results
//!
//! # Architecture
//!
//! ```text
//! strata-vector:  distances, validation, exact top-k   <-- This crate
//!      ↑ used by
//! strata-hnsw:    multi-layer proximity graph (approximate search)
//! ```
//!
//! # Example
//!
//! ```
//! use strata_vector::{knn, DistanceFunction};
//!
//! let candidates = vec![vec![0.0, 0.0], vec![5.0, 5.0], vec![1.0, 1.0]];
//! let nearest = knn(&candidates, &DistanceFunction::Euclidean, &[0.9, 0.9], 2);
//! assert_eq!(nearest, vec![2, 0]);
//! ```

mod distance;
mod knn;

pub use distance::{
    cosine_distance, cosine_similarity, euclidean_distance, euclidean_distance_squared,
    inner_product, Distance, DistanceFn, DistanceFunction,
};
pub use knn::{knn, top_k};

/// Error type for vector operations.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid vector: {0}")]
    InvalidVector(String),
}

/// Result type for vector operations.
pub type Result<T> = std::result::Result<T, VectorError>;

/// Validate a vector's dimensions and values.
///
/// Rejects vectors whose length differs from `dimensions` and vectors with
/// NaN or infinite components, since either would make distance ordering
/// meaningless.
pub fn validate_vector(vector: &[f32], dimensions: usize) -> Result<()> {
    if vector.len() != dimensions {
        return Err(VectorError::DimensionMismatch {
            expected: dimensions,
            actual: vector.len(),
        });
    }

    for (i, &v) in vector.iter().enumerate() {
        if v.is_nan() {
            return Err(VectorError::InvalidVector(format!(
                "NaN value at index {}",
                i
            )));
        }
        if v.is_infinite() {
            return Err(VectorError::InvalidVector(format!(
                "Infinite value at index {}",
                i
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vector() {
        assert!(validate_vector(&[1.0, 2.0, 3.0], 3).is_ok());

        let result = validate_vector(&[1.0, 2.0], 3);
        assert!(matches!(
            result,
            Err(VectorError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));

        let result = validate_vector(&[1.0, f32::NAN, 3.0], 3);
        assert!(matches!(result, Err(VectorError::InvalidVector(_))));

        let result = validate_vector(&[f32::NEG_INFINITY, 0.0, 3.0], 3);
        assert!(matches!(result, Err(VectorError::InvalidVector(_))));
    }
}
