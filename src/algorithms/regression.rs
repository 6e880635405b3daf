//! Regression logic.
//!
//! ## Purpose
//!
//! This module provides the fitting primitives the higher layers build on:
//!
//! * Weighted least-squares polynomial fits of degree 1 or 2, evaluated at
//!   the fit target (the LOESS local model).
//! * Ordinary least squares with an r² statistic (the per-window fit of the
//!   log-phase detector).
//!
//! ## Design notes
//!
//! * **Centering**: local fits work in `u = x - x0` coordinates, so the
//!   prediction at the target is simply the intercept and the normal
//!   equations stay well conditioned for time axes far from zero.
//! * **Degradation**: a numerically singular degree-2 system falls back to
//!   the degree-1 solution, which itself degrades to the weighted mean when
//!   all x-values coincide. Callers only see `None` when the total weight
//!   is non-positive.
//! * **Generics**: everything is generic over `num_traits::Float`.

// External dependencies
use num_traits::Float;

// ============================================================================
// Weighted Local Polynomial Fit
// ============================================================================

/// Fit a weighted polynomial of `degree` (1 or 2) over a neighborhood and
/// evaluate it at `x0`.
///
/// `x`, `y`, and `weights` are the neighborhood slices. Returns `None` when
/// the total weight is non-positive.
pub fn wls_poly_at<T: Float>(x: &[T], y: &[T], weights: &[T], x0: T, degree: u8) -> Option<T> {
    match degree {
        2 => wls_quadratic_at(x, y, weights, x0).or_else(|| wls_linear_at(x, y, weights, x0)),
        _ => wls_linear_at(x, y, weights, x0),
    }
}

/// Weighted linear fit in centered coordinates, evaluated at the center.
fn wls_linear_at<T: Float>(x: &[T], y: &[T], weights: &[T], x0: T) -> Option<T> {
    let n = x.len();
    if n == 0 {
        return None;
    }

    let mut s0 = T::zero();
    let mut s1 = T::zero();
    let mut s2 = T::zero();
    let mut t0 = T::zero();
    let mut t1 = T::zero();

    for i in 0..n {
        let w = weights[i];
        let u = x[i] - x0;
        let wu = w * u;
        s0 = s0 + w;
        s1 = s1 + wu;
        s2 = s2 + wu * u;
        t0 = t0 + w * y[i];
        t1 = t1 + wu * y[i];
    }

    if s0 <= T::zero() {
        return None;
    }

    let det = s0 * s2 - s1 * s1;
    let tol = T::from(1e-12).unwrap() * (s0 * s2).abs().max(T::one());
    if det.abs() <= tol {
        // All x effectively coincide with the target: weighted local mean.
        return Some(t0 / s0);
    }

    // Prediction at u = 0 is the intercept b0.
    let b0 = (s2 * t0 - s1 * t1) / det;
    Some(b0)
}

/// Weighted quadratic fit in centered coordinates, evaluated at the center.
///
/// Solves the 3x3 normal equations by Gaussian elimination with partial
/// pivoting; `None` signals a singular system (caller degrades to linear).
fn wls_quadratic_at<T: Float>(x: &[T], y: &[T], weights: &[T], x0: T) -> Option<T> {
    let n = x.len();
    if n == 0 {
        return None;
    }

    // Weighted moments s_k = sum w u^k (k = 0..4) and rhs t_k = sum w u^k y.
    let mut s = [T::zero(); 5];
    let mut t = [T::zero(); 3];

    for i in 0..n {
        let w = weights[i];
        let u = x[i] - x0;
        let u2 = u * u;
        s[0] = s[0] + w;
        s[1] = s[1] + w * u;
        s[2] = s[2] + w * u2;
        s[3] = s[3] + w * u2 * u;
        s[4] = s[4] + w * u2 * u2;
        t[0] = t[0] + w * y[i];
        t[1] = t[1] + w * u * y[i];
        t[2] = t[2] + w * u2 * y[i];
    }

    if s[0] <= T::zero() {
        return None;
    }

    let mut m = [
        [s[0], s[1], s[2], t[0]],
        [s[1], s[2], s[3], t[1]],
        [s[2], s[3], s[4], t[2]],
    ];

    // Forward elimination with partial pivoting.
    for col in 0..3 {
        let mut pivot = col;
        for row in (col + 1)..3 {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].abs() <= T::from(1e-12).unwrap() * s[0].max(T::one()) {
            return None;
        }
        m.swap(col, pivot);

        for row in (col + 1)..3 {
            let factor = m[row][col] / m[col][col];
            for k in col..4 {
                m[row][k] = m[row][k] - factor * m[col][k];
            }
        }
    }

    // Back substitution; only b0 (the prediction at u = 0) is needed.
    let b2 = m[2][3] / m[2][2];
    let b1 = (m[1][3] - m[1][2] * b2) / m[1][1];
    let b0 = (m[0][3] - m[0][1] * b1 - m[0][2] * b2) / m[0][0];

    if b0.is_finite() { Some(b0) } else { None }
}

// ============================================================================
// Ordinary Least Squares (detector windows)
// ============================================================================

/// Simple linear regression result with goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OlsLine<T> {
    /// Slope (growth rate in log space when y is `ln(OD)`).
    pub slope: T,

    /// Intercept.
    pub intercept: T,

    /// Coefficient of determination.
    pub r2: T,
}

impl<T: Float> OlsLine<T> {
    /// Fit OLS of `y` on `x` and compute r².
    ///
    /// A degenerate x-axis (zero variance) yields slope 0 through the mean;
    /// a degenerate y-axis yields r² = 1 for a perfect flat fit, 0 otherwise.
    pub fn fit(x: &[T], y: &[T]) -> Self {
        let n = x.len();
        debug_assert_eq!(n, y.len(), "OlsLine::fit: input lengths differ");

        if n == 0 {
            return Self {
                slope: T::zero(),
                intercept: T::zero(),
                r2: T::zero(),
            };
        }

        let n_t = T::from(n).unwrap_or(T::one());
        let x_mean = x.iter().fold(T::zero(), |a, &v| a + v) / n_t;
        let y_mean = y.iter().fold(T::zero(), |a, &v| a + v) / n_t;

        let mut sxx = T::zero();
        let mut syy = T::zero();
        let mut sxy = T::zero();
        for i in 0..n {
            let dx = x[i] - x_mean;
            let dy = y[i] - y_mean;
            sxx = sxx + dx * dx;
            syy = syy + dy * dy;
            sxy = sxy + dx * dy;
        }

        let tol = T::from(1e-12).unwrap();
        if sxx <= tol {
            return Self {
                slope: T::zero(),
                intercept: y_mean,
                r2: T::zero(),
            };
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let r2 = if syy <= tol {
            // Flat series: a zero-slope line through the mean is exact.
            T::one()
        } else {
            (sxy * sxy) / (sxx * syy)
        };

        Self {
            slope,
            intercept,
            r2,
        }
    }

    /// Predict y at a given x.
    #[inline]
    pub fn predict(&self, x: T) -> T {
        self.intercept + self.slope * x
    }
}
