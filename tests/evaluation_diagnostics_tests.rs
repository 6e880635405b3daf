//! Tests for fit-quality diagnostics.
//!
//! These tests verify metric computation for:
//! - Perfect fits (all-zero error metrics, r² = 1)
//! - Hand-computed residual metrics
//! - Robust residual SD under contamination

use approx::assert_abs_diff_eq;
use odcurve::prelude::*;

// ============================================================================
// Metric Tests
// ============================================================================

/// A perfect fit scores zero error and full r².
#[test]
fn test_perfect_fit() {
    let y = [1.0, 2.0, 3.0, 4.0];
    let d = FitDiagnostics::compute(&y, &y);

    assert_eq!(d.rmse, 0.0);
    assert_eq!(d.mae, 0.0);
    assert_eq!(d.r_squared, 1.0);
    assert_eq!(d.residual_sd, 0.0);
}

/// RMSE, MAE, and r² match hand-computed values.
#[test]
fn test_hand_computed_metrics() {
    let y = [1.0, 2.0, 3.0, 4.0];
    let y_smooth = [1.5, 2.0, 2.5, 4.0]; // residuals: -0.5, 0, 0.5, 0

    let d = FitDiagnostics::compute(&y, &y_smooth);

    assert_abs_diff_eq!(d.rmse, (0.125_f64).sqrt(), epsilon = 1e-12);
    assert_abs_diff_eq!(d.mae, 0.25, epsilon = 1e-12);
    // ss_res = 0.5, ss_tot = 5.0
    assert_abs_diff_eq!(d.r_squared, 1.0 - 0.5 / 5.0, epsilon = 1e-12);
}

/// A constant series fit exactly has r² = 1 by convention, not 0/0.
#[test]
fn test_flat_series_convention() {
    let y = [2.0, 2.0, 2.0];
    let exact = FitDiagnostics::compute(&y, &y);
    assert_eq!(exact.r_squared, 1.0);

    let off = FitDiagnostics::compute(&y, &[2.0, 2.0, 3.0]);
    assert_eq!(off.r_squared, 0.0);
}

/// The MAD-based residual SD shrugs off a single gross outlier where the
/// RMSE cannot.
#[test]
fn test_residual_sd_is_robust() {
    let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
    let mut y_smooth = y;
    y_smooth[3] += 100.0; // one wild residual

    let d = FitDiagnostics::compute(&y, &y_smooth);
    assert!(d.rmse > 10.0, "RMSE blows up");
    assert_abs_diff_eq!(d.residual_sd, 0.0, epsilon = 1e-12);
}
