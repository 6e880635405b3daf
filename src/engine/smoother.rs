//! Robust LOESS smoother.
//!
//! ## Purpose
//!
//! Fits a locally weighted polynomial (degree 1 or 2) through a scatter of
//! `(time, value)` points, with iterative bisquare reweighting to resist
//! outliers. This is the single smoothing primitive every higher layer
//! (convergence driver, band estimator, workspace) is built on.
//!
//! ## Design notes
//!
//! * **Sort-process-unsort**: input order is arbitrary; points are stably
//!   sorted by time internally and results are returned in the caller's
//!   original order.
//! * **Neighborhoods**: each target uses its `k` nearest neighbors in `x`,
//!   maintained by sliding an index window over the sorted sequence.
//! * **Determinism**: no randomness anywhere; identical inputs give
//!   bit-identical outputs.
//!
//! ## Invariants
//!
//! * Output has exactly one smoothed value per input point, same order.
//! * Robustness weights stay in [0, 1].
//! * The effective window size is in `[degree + 1, n]`.
//!
//! ## Non-goals
//!
//! * No re-run loop here; see [`crate::engine::refine`].
//! * No filtering of non-finite points (ingestion layer responsibility).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::wls_poly_at;
use crate::algorithms::robustness::bisquare_weights;
use crate::engine::validator::Validator;
use crate::evaluation::diagnostics::FitDiagnostics;
use crate::math::kernel::fill_tricube_weights;
use crate::primitives::errors::CurveError;
use crate::primitives::point::Point;
use crate::primitives::sorting::{sort_points, unsort};
use crate::primitives::window::{Neighborhood, window_size};

// ============================================================================
// Parameters
// ============================================================================

/// Parameters for one smoothing operation.
///
/// `span <= 1` is a fraction of the point count, `span > 1` an absolute
/// window size. All fields are validated before any fit runs; invalid
/// values are rejected, never substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams<T> {
    /// Neighborhood size: fraction of points (<= 1) or absolute count (> 1).
    pub span: T,

    /// Local polynomial degree, 1 or 2.
    pub degree: u8,

    /// Total robust fitting passes (1 = tricube-only fit, no reweighting).
    pub robust_iterations: usize,

    /// Maximum re-run count for the convergence driver.
    pub max_refinements: usize,

    /// Pointwise convergence tolerance for the driver.
    pub tolerance: T,
}

impl<T: Float> Default for SmoothingParams<T> {
    fn default() -> Self {
        Self {
            span: T::from(0.67).unwrap(),
            degree: 1,
            robust_iterations: 3,
            max_refinements: 3,
            tolerance: T::from(1e-6).unwrap(),
        }
    }
}

impl<T: Float> SmoothingParams<T> {
    /// Set the span.
    pub fn span(mut self, span: T) -> Self {
        self.span = span;
        self
    }

    /// Set the polynomial degree (1 or 2).
    pub fn degree(mut self, degree: u8) -> Self {
        self.degree = degree;
        self
    }

    /// Set the number of robust fitting passes.
    pub fn robust_iterations(mut self, iterations: usize) -> Self {
        self.robust_iterations = iterations;
        self
    }

    /// Set the maximum refinement count for the convergence driver.
    pub fn max_refinements(mut self, refinements: usize) -> Self {
        self.max_refinements = refinements;
        self
    }

    /// Set the convergence tolerance for the driver.
    pub fn tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output of one smoothing operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothOutput<T> {
    /// Smoothed points, in the caller's original order.
    pub points: Vec<Point<T>>,

    /// Fit-quality metrics against the raw values.
    pub diagnostics: FitDiagnostics<T>,

    /// Effective neighborhood size used for every local fit.
    pub window_size: usize,

    /// Robust passes actually performed (ends early on zero residuals).
    pub robust_passes: usize,
}

// ============================================================================
// Smoother
// ============================================================================

/// Smooth a point scatter with robust LOESS.
///
/// Requires `points.len() >= degree + 1`; smaller inputs yield
/// [`CurveError::InsufficientData`] (any passthrough fallback is the
/// caller's policy, not this function's).
pub fn smooth<T: Float>(
    points: &[Point<T>],
    params: &SmoothingParams<T>,
) -> Result<SmoothOutput<T>, CurveError> {
    Validator::validate_params(params)?;
    Validator::validate_points(points, params.degree as usize + 1)?;

    let sorted = sort_points(points);
    let n = sorted.x.len();
    let k = window_size(n, params.span, params.degree);

    let mut y_smooth = vec![T::zero(); n];
    let mut weights = vec![T::zero(); n];
    let mut robustness = vec![T::one(); n];
    let mut residuals = vec![T::zero(); n];
    let mut scratch = vec![T::zero(); n];

    let mut passes = 0;
    for pass in 0..params.robust_iterations {
        passes = pass + 1;

        smooth_pass(
            &sorted.x,
            &sorted.y,
            k,
            pass > 0,
            &robustness,
            &mut weights,
            &mut y_smooth,
            params.degree,
        );

        // Reweight for the next pass (skip after the last one).
        if pass + 1 < params.robust_iterations {
            for i in 0..n {
                residuals[i] = sorted.y[i] - y_smooth[i];
            }
            if !bisquare_weights(&residuals, &mut robustness, &mut scratch) {
                // Zero median residual: further passes cannot change the fit.
                break;
            }
        }
    }

    let diagnostics = FitDiagnostics::compute(&sorted.y, &y_smooth);

    // Hand results back in the caller's original point order.
    let restored = unsort(&y_smooth, &sorted.indices);
    let out_points = points
        .iter()
        .zip(restored)
        .map(|(p, ys)| Point::new(p.x, ys))
        .collect();

    Ok(SmoothOutput {
        points: out_points,
        diagnostics,
        window_size: k,
        robust_passes: passes,
    })
}

/// One full fitting pass: every target gets a local weighted polynomial fit.
#[allow(clippy::too_many_arguments)]
fn smooth_pass<T: Float>(
    x: &[T],
    y: &[T],
    k: usize,
    use_robustness: bool,
    robustness: &[T],
    weights: &mut [T],
    y_smooth: &mut [T],
    degree: u8,
) {
    let n = x.len();
    let mut window = Neighborhood::seed(k, n);

    for target in 0..n {
        window.recenter(x, target);

        let xt = x[target];
        let dmax = window.max_distance(x, xt);

        let mut weight_sum = fill_tricube_weights(x, window, xt, dmax, weights);

        if use_robustness {
            weight_sum = T::zero();
            for j in window.lo..=window.hi {
                let w = weights[j] * robustness[j];
                weights[j] = w;
                weight_sum = weight_sum + w;
            }
        }

        let lo = window.lo;
        let hi = window.hi;

        y_smooth[target] = if weight_sum > T::zero() {
            wls_poly_at(&x[lo..=hi], &y[lo..=hi], &weights[lo..=hi], xt, degree)
                .unwrap_or_else(|| local_mean(&y[lo..=hi]))
        } else {
            // Every neighbor was rejected by robustness weighting: fall back
            // to the unweighted neighborhood mean.
            local_mean(&y[lo..=hi])
        };
    }
}

/// Unweighted mean of a neighborhood.
#[inline]
fn local_mean<T: Float>(y: &[T]) -> T {
    let n = T::from(y.len()).unwrap_or(T::one());
    y.iter().fold(T::zero(), |a, &v| a + v) / n
}
