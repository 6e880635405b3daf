//! Weighted percentiles and medians.
//!
//! ## Purpose
//!
//! The band estimator aggregates bootstrap predictions through weighted
//! percentiles; the robustness and diagnostics layers need plain medians.
//! Both live here so every consumer shares one definition.
//!
//! ## Key concepts
//!
//! * **Weighted percentile**: sort `(value, weight)` ascending by value,
//!   normalize weights to sum 1, and return the first value whose
//!   cumulative weight reaches `p / 100`. Ties resolve by value order.
//! * **Median**: computed in place via Quickselect, averaging the two
//!   middle values for even lengths.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;

// ============================================================================
// Weighted Percentile
// ============================================================================

/// Weighted percentile `p` (in percent) of `(value, weight)` pairs.
///
/// Pairs are reordered in place. Non-positive total weight or an empty
/// slice yields `None`.
pub fn weighted_percentile<T: Float>(pairs: &mut [(T, T)], p: T) -> Option<T> {
    if pairs.is_empty() {
        return None;
    }

    let total = pairs
        .iter()
        .fold(T::zero(), |acc, &(_, w)| acc + w.max(T::zero()));
    if total <= T::zero() {
        return None;
    }

    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Equal));

    let threshold = p / T::from(100.0).unwrap();
    let mut cumulative = T::zero();
    for &(value, weight) in pairs.iter() {
        cumulative = cumulative + weight.max(T::zero()) / total;
        if cumulative >= threshold {
            return Some(value);
        }
    }

    // Rounding can leave the cumulative sum a hair below 1; the largest
    // value is the correct answer for any p <= 100.
    pairs.last().map(|&(value, _)| value)
}

// ============================================================================
// Median
// ============================================================================

/// Median of `vals`, computed in place via Quickselect.
pub fn median_inplace<T: Float>(vals: &mut [T]) -> T {
    let n = vals.len();
    if n == 0 {
        return T::zero();
    }

    let mid = n / 2;
    vals.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let upper = vals[mid];

    if n % 2 == 1 {
        return upper;
    }

    // Even length: the lower middle is the maximum of the left partition.
    let mut lower = vals[0];
    for &v in &vals[1..mid] {
        if v > lower {
            lower = v;
        }
    }
    (lower + upper) / T::from(2.0).unwrap()
}

/// Median of absolute values, in place.
pub fn median_abs_inplace<T: Float>(vals: &mut [T]) -> T {
    for v in vals.iter_mut() {
        *v = v.abs();
    }
    median_inplace(vals)
}
