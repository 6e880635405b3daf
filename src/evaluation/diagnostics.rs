//! Fit-quality metrics for smoothed curves.
//!
//! ## Purpose
//!
//! Every smoothing pass records how well the fitted curve tracks the raw
//! data, so hosts can label history entries and compare parameter choices.
//!
//! ## Key concepts
//!
//! * **Residual metrics**: RMSE and MAE measure prediction error.
//! * **Goodness of fit**: r² measures variance explained by the smoother.
//! * **Robust scale**: residual SD is estimated as `1.4826 * MAD`, which is
//!   unbiased for normal residuals and insensitive to outliers.
//!
//! ## Invariants
//!
//! * RMSE, MAE, and residual SD are non-negative.
//! * r² <= 1, with 1 meaning a perfect fit.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::math::percentile::median_inplace;

/// Constant converting MAD to an unbiased sigma estimate for normal data.
const MAD_TO_STD_FACTOR: f64 = 1.4826;

/// Diagnostic metrics for one smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitDiagnostics<T> {
    /// Root mean squared error of the fit.
    pub rmse: T,

    /// Mean absolute error of the fit.
    pub mae: T,

    /// Coefficient of determination.
    pub r_squared: T,

    /// Robust residual standard deviation (1.4826 * MAD).
    pub residual_sd: T,
}

impl<T: Float> FitDiagnostics<T> {
    /// Compute diagnostics from raw values and their smoothed counterparts.
    pub fn compute(y: &[T], y_smooth: &[T]) -> Self {
        let n = y.len();
        if n == 0 {
            return Self {
                rmse: T::zero(),
                mae: T::zero(),
                r_squared: T::zero(),
                residual_sd: T::zero(),
            };
        }

        let n_t = T::from(n).unwrap_or(T::one());
        let mean = y.iter().fold(T::zero(), |a, &v| a + v) / n_t;

        let mut ss_res = T::zero();
        let mut ss_tot = T::zero();
        let mut abs_sum = T::zero();
        let mut residuals = Vec::with_capacity(n);

        for (&yi, &ys) in y.iter().zip(y_smooth.iter()) {
            let r = yi - ys;
            let d = yi - mean;
            ss_res = ss_res + r * r;
            ss_tot = ss_tot + d * d;
            abs_sum = abs_sum + r.abs();
            residuals.push(r);
        }

        let rmse = (ss_res / n_t).sqrt();
        let mae = abs_sum / n_t;

        let r_squared = if ss_tot == T::zero() {
            if ss_res == T::zero() { T::one() } else { T::zero() }
        } else {
            T::one() - ss_res / ss_tot
        };

        // MAD of residuals, rescaled to a sigma estimate.
        let center = median_inplace(&mut residuals.clone());
        for r in residuals.iter_mut() {
            *r = (*r - center).abs();
        }
        let mad = median_inplace(&mut residuals);
        let residual_sd = mad * T::from(MAD_TO_STD_FACTOR).unwrap();

        Self {
            rmse,
            mae,
            r_squared,
            residual_sd,
        }
    }
}

impl<T: Float + Display> Display for FitDiagnostics<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Fit Diagnostics:")?;
        writeln!(f, "  RMSE:        {:.6}", self.rmse)?;
        writeln!(f, "  MAE:         {:.6}", self.mae)?;
        writeln!(f, "  R²:          {:.6}", self.r_squared)?;
        writeln!(f, "  Residual SD: {:.6}", self.residual_sd)
    }
}
