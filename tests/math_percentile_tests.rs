//! Tests for weighted percentiles and medians.
//!
//! These tests verify the order statistics used by the band estimator and
//! the robustness loop:
//! - Weighted percentile thresholding and edge percentiles
//! - Degenerate weight handling
//! - Quickselect medians on odd/even lengths

use approx::assert_abs_diff_eq;
use odcurve::math::percentile::{median_abs_inplace, median_inplace, weighted_percentile};

// ============================================================================
// Weighted Percentile Tests
// ============================================================================

/// Uniform weights reproduce plain order statistics.
#[test]
fn test_uniform_weights() {
    let mut pairs: Vec<(f64, f64)> = [3.0, 1.0, 4.0, 2.0].iter().map(|&v| (v, 1.0)).collect();

    assert_eq!(weighted_percentile(&mut pairs, 25.0), Some(1.0));
    assert_eq!(weighted_percentile(&mut pairs, 50.0), Some(2.0));
    assert_eq!(weighted_percentile(&mut pairs, 100.0), Some(4.0));
}

/// A dominant weight drags the percentile onto its value.
#[test]
fn test_weight_dominance() {
    let mut pairs = vec![(1.0, 0.01), (2.0, 0.98), (3.0, 0.01)];

    assert_eq!(weighted_percentile(&mut pairs, 2.5), Some(2.0));
    assert_eq!(weighted_percentile(&mut pairs, 97.5), Some(2.0));
}

/// The extreme tails return the extreme values.
#[test]
fn test_tail_percentiles() {
    let mut pairs = vec![(10.0, 0.25), (20.0, 0.5), (30.0, 0.25)];

    assert_eq!(weighted_percentile(&mut pairs, 0.0), Some(10.0));
    assert_eq!(weighted_percentile(&mut pairs, 99.9), Some(30.0));
}

/// Empty input or all-zero weights yield nothing.
#[test]
fn test_degenerate_weights() {
    let mut empty: Vec<(f64, f64)> = vec![];
    assert_eq!(weighted_percentile(&mut empty, 50.0), None);

    let mut zeroed = vec![(1.0, 0.0), (2.0, 0.0)];
    assert_eq!(weighted_percentile(&mut zeroed, 50.0), None);
}

// ============================================================================
// Median Tests
// ============================================================================

/// Odd length takes the middle element.
#[test]
fn test_median_odd() {
    let mut vals = [5.0, 1.0, 3.0];
    assert_eq!(median_inplace(&mut vals), 3.0);
}

/// Even length averages the two middle elements.
#[test]
fn test_median_even() {
    let mut vals = [4.0, 1.0, 3.0, 2.0];
    assert_abs_diff_eq!(median_inplace(&mut vals), 2.5, epsilon = 1e-15);
}

/// The absolute-value median ignores sign, as the bisquare scale needs.
#[test]
fn test_median_abs() {
    let mut vals = [-6.0, 1.0, -2.0, 3.0, 5.0];
    assert_eq!(median_abs_inplace(&mut vals), 3.0);
}

/// Empty input is defined as zero rather than a panic.
#[test]
fn test_median_empty() {
    let mut vals: [f64; 0] = [];
    assert_eq!(median_inplace(&mut vals), 0.0);
}
