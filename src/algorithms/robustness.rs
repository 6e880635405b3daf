//! Bisquare robustness weights for iterative reweighting.
//!
//! ## Purpose
//!
//! After an initial tricube-only pass, the smoother repeats the fit with
//! per-point robustness weights that downweight outliers. This module
//! computes those weights from the previous pass's residuals.
//!
//! ## Key concepts
//!
//! * **Bisquare**: `w = (1 - (r/s)^2)^2` for `|r| < s`, zero beyond, with
//!   scale `s = 6 * median(|residual|)` following Cleveland (1979).
//! * **Degenerate case**: a zero median residual means the fit already
//!   interpolates the data; reweighting is skipped and all weights stay 1.
//!
//! ## Invariants
//!
//! * Weights are in [0, 1].
//! * The scale is strictly positive whenever reweighting is applied.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::percentile::median_abs_inplace;

/// Scale multiplier applied to the median absolute residual, per Cleveland (1979).
const BISQUARE_SCALE_FACTOR: f64 = 6.0;

/// Fill `weights` with bisquare robustness weights from `residuals`.
///
/// Returns `false` for the zero-residual degenerate case: weights are set
/// to 1 and the caller should stop reweighting (further passes cannot
/// change the fit).
pub fn bisquare_weights<T: Float>(residuals: &[T], weights: &mut [T], scratch: &mut [T]) -> bool {
    debug_assert_eq!(residuals.len(), weights.len());
    debug_assert_eq!(residuals.len(), scratch.len());

    scratch.copy_from_slice(residuals);
    let scale = T::from(BISQUARE_SCALE_FACTOR).unwrap() * median_abs_inplace(scratch);

    if scale <= T::zero() {
        for w in weights.iter_mut() {
            *w = T::one();
        }
        return false;
    }

    for (w, &r) in weights.iter_mut().zip(residuals.iter()) {
        let u = (r / scale).abs();
        *w = if u >= T::one() {
            T::zero()
        } else {
            let tmp = T::one() - u * u;
            tmp * tmp
        };
    }
    true
}
