//! Tests for neighborhood windows and window sizing.
//!
//! These tests verify the nearest-neighbor window for:
//! - Seeding and sliding over a sorted axis
//! - Nearest-neighbor selection at interior and edge targets
//! - Span-to-window-size resolution and clamping

use odcurve::primitives::window::{Neighborhood, window_size};

// ============================================================================
// Window Sizing Tests
// ============================================================================

/// Fractional spans take the ceiling of `span * n`.
#[test]
fn test_fractional_span() {
    assert_eq!(window_size(10, 0.3, 1), 3);
    assert_eq!(window_size(10, 0.25, 1), 3);
    assert_eq!(window_size(10, 1.0, 1), 10);
}

/// Spans above one are absolute counts, rounded.
#[test]
fn test_absolute_span() {
    assert_eq!(window_size(10, 4.4, 1), 4);
    assert_eq!(window_size(10, 4.6, 1), 5);
}

/// The window never drops below `degree + 1` or exceeds `n`.
#[test]
fn test_window_clamping() {
    assert_eq!(window_size(10, 0.01, 2), 3, "floor at degree + 1");
    assert_eq!(window_size(10, 99.0, 1), 10, "ceiling at n");
    assert_eq!(window_size(3, 0.5, 2), 3);
}

// ============================================================================
// Neighborhood Tests
// ============================================================================

/// Seeding starts at the left edge with k points.
#[test]
fn test_seed() {
    let w = Neighborhood::seed(3, 10);
    assert_eq!((w.lo, w.hi), (0, 2));
    assert_eq!(w.len(), 3);

    let full = Neighborhood::seed(10, 4);
    assert_eq!((full.lo, full.hi), (0, 3), "k >= n covers everything");
}

/// Recentring keeps the k nearest neighbors as the target advances.
#[test]
fn test_recenter_slides_to_nearest() {
    let x = [0.0, 1.0, 2.0, 3.0, 10.0];
    let mut w = Neighborhood::seed(3, x.len());

    // Target 3 (x=3): nearest three are {1, 2, 3}, not {3, 10}.
    w.recenter(&x, 3);
    assert_eq!((w.lo, w.hi), (1, 3));

    // Target 4 (x=10): window must reach the right edge.
    w.recenter(&x, 4);
    assert_eq!((w.lo, w.hi), (2, 4));
}

/// Sliding backwards finds the same windows as sliding forwards.
#[test]
fn test_recenter_direction_independent() {
    let x: Vec<f64> = (0..12).map(|i| i as f64).collect();
    let k = 4;

    let mut forward = Vec::new();
    let mut w = Neighborhood::seed(k, x.len());
    for t in 0..x.len() {
        w.recenter(&x, t);
        forward.push((w.lo, w.hi));
    }

    let mut backward = Vec::new();
    let mut w = Neighborhood::seed(k, x.len());
    w.recenter(&x, x.len() - 1);
    for t in (0..x.len()).rev() {
        w.recenter(&x, t);
        backward.push((w.lo, w.hi));
    }
    backward.reverse();

    assert_eq!(forward, backward);
}

/// max_distance reports the farther of the two window edges.
#[test]
fn test_max_distance() {
    let x = [0.0, 1.0, 2.0, 5.0];
    let w = Neighborhood { lo: 0, hi: 3 };
    assert_eq!(w.max_distance(&x, 1.0), 4.0);
    assert_eq!(w.max_distance(&x, 4.0), 4.0);
}
