//! Sorting utilities for measurement sequences.
//!
//! ## Purpose
//!
//! The smoother operates on x-sorted arrays but callers hand in points in
//! arbitrary order, so this module implements the sort-process-unsort
//! pattern: sort by time with an index mapping, run the algorithm on the
//! sorted sequence, then map results back to the caller's original order.
//!
//! ## Invariants
//!
//! * The sort is stable: points with equal `x` keep their relative input
//!   order, which is what makes neighborhood tie-breaking deterministic.
//! * `indices[sorted_pos] = original_pos` is a valid permutation of `0..n`.
//!
//! ## Non-goals
//!
//! * No filtering happens here; non-finite points must be removed upstream.

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;

// Internal dependencies
use crate::primitives::point::Point;

// ============================================================================
// Data Structures
// ============================================================================

/// A point sequence split into parallel x/y arrays, sorted ascending by x.
pub struct SortedSeries<T> {
    /// Time coordinates, non-decreasing.
    pub x: Vec<T>,

    /// Values reordered to match `x`.
    pub y: Vec<T>,

    /// Index mapping where `indices[sorted_pos] = original_pos`.
    pub indices: Vec<usize>,
}

// ============================================================================
// Sorting Functions
// ============================================================================

/// Stably sort a point sequence by `x`, recording the permutation.
#[inline]
pub fn sort_points<T: Float>(points: &[Point<T>]) -> SortedSeries<T> {
    let n = points.len();

    // Fast path: already sorted by x
    if points.windows(2).all(|w| w[0].x <= w[1].x) {
        return SortedSeries {
            x: points.iter().map(|p| p.x).collect(),
            y: points.iter().map(|p| p.y).collect(),
            indices: (0..n).collect(),
        };
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        points[a]
            .x
            .partial_cmp(&points[b].x)
            .unwrap_or(Ordering::Equal)
    });

    SortedSeries {
        x: order.iter().map(|&i| points[i].x).collect(),
        y: order.iter().map(|&i| points[i].y).collect(),
        indices: order,
    }
}

/// Map values computed on the sorted sequence back to original order, O(n).
#[inline]
pub fn unsort<T: Float>(sorted_values: &[T], indices: &[usize]) -> Vec<T> {
    let mut result = vec![T::zero(); indices.len()];
    for (sorted_pos, &orig_pos) in indices.iter().enumerate() {
        result[orig_pos] = sorted_values[sorted_pos];
    }
    result
}
