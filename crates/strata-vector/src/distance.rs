//! Distance metrics.
//!
//! An index only ever sees a [`Distance`]: any `Fn(&[f32], &[f32]) -> f32`
//! is one, so a plain function such as [`euclidean_distance`] can be handed
//! to a graph directly. [`DistanceFunction`] names the built-in metrics for
//! configuration and resolves each to its kernel.
//!
//! Smaller is always nearer. Inputs must have equal length; that is checked
//! by [`validate_vector`](crate::validate_vector) before vectors reach a
//! metric, and only debug-asserted here.

/// Scalar dissimilarity between two vectors of equal length.
///
/// Must be deterministic, since search results are ordered by it.
pub trait Distance: Send + Sync {
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Signature shared by every built-in kernel.
pub type DistanceFn = fn(&[f32], &[f32]) -> f32;

/// Built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistanceFunction {
    /// L2 norm of `a - b`.
    Euclidean,
    /// `1 - cos(a, b)`, in `[0, 2]`.
    Cosine,
    /// `-(a · b)`, for maximum inner product search.
    InnerProduct,
}

impl DistanceFunction {
    /// The kernel behind this metric.
    pub fn as_fn(self) -> DistanceFn {
        match self {
            Self::Euclidean => euclidean_distance,
            Self::Cosine => cosine_distance,
            Self::InnerProduct => negative_inner_product,
        }
    }
}

impl Distance for DistanceFunction {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        (self.as_fn())(a, b)
    }
}

/// Independent accumulators; wide enough for the compiler to keep them in
/// one SIMD register.
const LANES: usize = 8;

/// `sum(f(a[i], b[i]))`, accumulated per lane.
#[inline(always)]
fn lane_sum(a: &[f32], b: &[f32], f: impl Fn(f32, f32) -> f32) -> f32 {
    debug_assert_eq!(a.len(), b.len());

    let mut acc = [0.0f32; LANES];
    let (head_a, head_b) = (a.chunks_exact(LANES), b.chunks_exact(LANES));
    let tail: f32 = head_a
        .remainder()
        .iter()
        .zip(head_b.remainder())
        .map(|(&x, &y)| f(x, y))
        .sum();

    for (xs, ys) in head_a.zip(head_b) {
        for lane in 0..LANES {
            acc[lane] += f(xs[lane], ys[lane]);
        }
    }
    acc.iter().sum::<f32>() + tail
}

/// Squared L2 distance. Orders points like [`euclidean_distance`] without
/// the square root.
#[inline]
pub fn euclidean_distance_squared(a: &[f32], b: &[f32]) -> f32 {
    lane_sum(a, b, |x, y| (x - y) * (x - y))
}

/// L2 distance.
///
/// ```
/// use strata_vector::euclidean_distance;
///
/// assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// ```
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    euclidean_distance_squared(a, b).sqrt()
}

/// Dot product. Larger is more similar; see
/// [`DistanceFunction::InnerProduct`] for the distance form.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    lane_sum(a, b, |x, y| x * y)
}

fn negative_inner_product(a: &[f32], b: &[f32]) -> f32 {
    -inner_product(a, b)
}

/// Cosine of the angle between `a` and `b`, clamped to `[-1, 1]`.
///
/// A zero vector has no direction and scores 0 against anything.
///
/// ```
/// use strata_vector::cosine_similarity;
///
/// assert_eq!(cosine_similarity(&[2.0, 0.0], &[-0.5, 0.0]), -1.0);
/// assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
/// ```
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norms = (inner_product(a, a) * inner_product(b, b)).sqrt();
    if norms < f32::EPSILON {
        return 0.0;
    }
    (inner_product(a, b) / norms).clamp(-1.0, 1.0)
}

/// `1 - cosine_similarity(a, b)`: 0 for the same direction, 1 for orthogonal
/// (or zero) vectors, 2 for opposite ones.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}
