//! Linear interpolation of a fitted curve onto a shared time grid.
//!
//! ## Purpose
//!
//! The band estimator compares curves fitted on different point sets, so
//! every curve is resampled onto one shared grid. Interpolation is linear
//! between bracketing knots and clamped at the ends (grid times before the
//! first knot take the first fitted value, times after the last knot take
//! the last).
//!
//! ## Invariants
//!
//! * Knot x-values must be sorted ascending (duplicates allowed).
//! * Output has exactly one value per grid time.

// External dependencies
use num_traits::Float;

/// Resample the curve `(xs, ys)` onto `grid`, clamping at both ends.
///
/// Duplicate knot times are legal; the last knot of a duplicate cluster
/// supplies the value at that time.
pub fn interp_clamped<T: Float>(xs: &[T], ys: &[T], grid: &[T]) -> Vec<T> {
    debug_assert_eq!(xs.len(), ys.len(), "interp_clamped: knot arrays differ");

    let n = xs.len();
    let mut out = Vec::with_capacity(grid.len());
    if n == 0 {
        return out;
    }

    for &g in grid {
        if g <= xs[0] {
            out.push(ys[0]);
            continue;
        }
        if g >= xs[n - 1] {
            out.push(ys[n - 1]);
            continue;
        }

        // First knot strictly past g; its predecessor brackets from below.
        let hi = xs.partition_point(|&xk| xk <= g);
        let lo = hi - 1;

        let denom = xs[hi] - xs[lo];
        if denom <= T::zero() {
            out.push(ys[lo]);
            continue;
        }

        let alpha = (g - xs[lo]) / denom;
        out.push(ys[lo] + alpha * (ys[hi] - ys[lo]));
    }
    out
}

/// Sorted unique union of several time axes, skipping non-finite values.
pub fn shared_grid<T: Float>(axes: &[&[T]]) -> Vec<T> {
    let mut grid: Vec<T> = axes
        .iter()
        .flat_map(|xs| xs.iter().copied())
        .filter(|v| v.is_finite())
        .collect();
    grid.sort_by(|a, b| a.partial_cmp(b).unwrap_or(core::cmp::Ordering::Equal));
    grid.dedup_by(|a, b| a == b);
    grid
}
