//! Tricube kernel weights for local regression.
//!
//! ## Purpose
//!
//! The tricube kernel `K(u) = (1 - |u|^3)^3` on `|u| < 1` (Cleveland's
//! original choice) assigns distance-based weights inside a neighborhood:
//! points close to the fit target dominate, the farthest point gets weight
//! zero, and influence decays smoothly in between.
//!
//! ## Invariants
//!
//! * Weights are non-negative and at most 1.
//! * A degenerate neighborhood (all points at the target's x, `dmax = 0`)
//!   produces uniform weight 1 for every point.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::window::Neighborhood;

/// Tricube kernel `(1 - u^3)^3` for a normalized distance `u = d / dmax >= 0`.
#[inline]
pub fn tricube<T: Float>(u: T) -> T {
    if u >= T::one() {
        return T::zero();
    }
    let tmp = T::one() - u * u * u;
    tmp * tmp * tmp
}

/// Fill `weights[window.lo..=window.hi]` with tricube weights relative to `xt`.
///
/// `dmax` is the maximum distance within the neighborhood; when it is zero
/// every point coincides with the target in `x` and all weights become 1.
/// Returns the sum of the weights written.
#[inline]
pub fn fill_tricube_weights<T: Float>(
    x: &[T],
    window: Neighborhood,
    xt: T,
    dmax: T,
    weights: &mut [T],
) -> T {
    let mut sum = T::zero();

    if dmax <= T::zero() {
        for w in weights[window.lo..=window.hi].iter_mut() {
            *w = T::one();
            sum = sum + T::one();
        }
        return sum;
    }

    for j in window.lo..=window.hi {
        let u = (x[j] - xt).abs() / dmax;
        let w = tricube(u);
        weights[j] = w;
        sum = sum + w;
    }
    sum
}
