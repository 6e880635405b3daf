//! Tests for the sliding-window log-phase detector.
//!
//! These tests verify exponential-phase detection for:
//! - Option clamping from free-text UI values
//! - Detection on lag/exponential/plateau growth shapes
//! - Filtering rules (positivity, OD floor, r²)
//! - No-detection as a normal outcome
//!
//! ## Test Organization
//!
//! 1. **Option Clamping** - Out-of-range and non-finite values
//! 2. **Detection** - Canonical growth curves
//! 3. **Filtering** - OD floor, window budget
//! 4. **No Detection** - Flat and noisy series

use approx::assert_abs_diff_eq;
use odcurve::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// Lag (flat), exponential at `rate`, then plateau, sampled every 10 min.
/// Lag covers t in [0, 100), exponential [100, 300), plateau [300, 400].
fn canonical_growth(rate: f64) -> Vec<Point<f64>> {
    let mut pts = Vec::new();
    let lag_od = 0.05;
    for i in 0..=40 {
        let t = i as f64 * 10.0;
        let od = if t < 100.0 {
            lag_od
        } else if t < 300.0 {
            lag_od * (rate * (t - 100.0)).exp()
        } else {
            lag_od * (rate * 200.0).exp()
        };
        pts.push(Point::new(t, od));
    }
    pts
}

// ============================================================================
// Option Clamping Tests
// ============================================================================

/// Out-of-range option values are clamped into their valid ranges, never
/// rejected: the values come from free-text UI fields.
#[test]
fn test_options_are_clamped() {
    let opts = LogPhaseOptions::<f64> {
        window_size: 0,
        r2_min: 2.0,
        od_min: -1.0,
        frac_k_max: 1.5,
        mu_rel_min: 0.0,
        mu_rel_max: -3.0,
    }
    .clamped();

    assert_eq!(opts.window_size, 2);
    assert!(opts.r2_min <= 0.9999);
    assert_eq!(opts.od_min, LogPhaseOptions::<f64>::default().od_min);
    assert!(opts.frac_k_max <= 0.95);
    assert!(opts.mu_rel_min >= 0.1);
    assert!(opts.mu_rel_max >= opts.mu_rel_min + 1e-3);
}

/// Non-finite option values fall back to the defaults.
#[test]
fn test_non_finite_options_fall_back() {
    let defaults = LogPhaseOptions::<f64>::default();
    let opts = LogPhaseOptions::<f64> {
        r2_min: f64::NAN,
        od_min: f64::INFINITY,
        ..defaults
    }
    .clamped();

    assert_eq!(opts.r2_min, defaults.r2_min);
    assert_eq!(opts.od_min, defaults.od_min);
}

// ============================================================================
// Detection Tests
// ============================================================================

/// The exponential segment of a canonical growth curve is found, and the
/// reported rate matches the true one.
#[test]
fn test_detects_exponential_segment() {
    let rate = 0.02;
    let pts = canonical_growth(rate);
    let det = detect(&pts, &LogPhaseOptions::default());

    assert!(det.found());
    let (start, end) = (det.start_time.unwrap(), det.end_time.unwrap());
    assert!(!det.indices.is_empty());
    assert!(det.windows_evaluated > 0);

    // Lag is flat and the plateau carries a near-zero slope, so the
    // selected range should sit essentially on [100, 300].
    assert!(start >= 90.0 && start <= 140.0, "start {start}");
    assert!(end >= 260.0 && end <= 320.0, "end {end}");
    assert!(start < end);

    assert_abs_diff_eq!(det.mu.unwrap(), rate, epsilon = 0.004);
    assert!(det.r2.unwrap() >= 0.97);
    assert!(det.mu_max.unwrap() > 0.0);
}

/// A pure exponential is one single log phase: the selection spans nearly
/// the whole series, the fitted rate is within 1% of truth, and the
/// selected region carries the maximal rate itself.
#[test]
fn test_pure_exponential_spans_everything() {
    let rate = 0.02;
    let pts: Vec<Point<f64>> = (0..=60)
        .map(|i| {
            let t = i as f64 * 5.0;
            Point::new(t, (rate * t).exp())
        })
        .collect();

    let opts = LogPhaseOptions {
        r2_min: 0.99,
        ..LogPhaseOptions::default()
    };
    let det = detect(&pts, &opts);

    assert!(det.found());
    assert_eq!(det.start_time, Some(0.0));
    assert_eq!(det.end_time, Some(300.0));
    assert_abs_diff_eq!(det.mu.unwrap(), rate, epsilon = rate * 0.01);
    assert_abs_diff_eq!(det.mu_rel.unwrap(), 1.0, epsilon = 1e-9);
}

/// Structureless data (values bouncing between two levels) never produces
/// a window that is both well-fit and growing.
#[test]
fn test_structureless_series_no_detection() {
    let bounce = [0.6, 1.4, 0.7, 1.5, 0.55, 1.3];
    let pts: Vec<Point<f64>> = (0..30)
        .map(|i| Point::new(i as f64 * 5.0, bounce[i % bounce.len()]))
        .collect();

    let opts = LogPhaseOptions {
        r2_min: 0.9,
        ..LogPhaseOptions::default()
    };
    let det = detect(&pts, &opts);

    assert!(!det.found());
    assert!(det.start_time.is_none());
    assert!(det.end_time.is_none());
}

/// Reported indices point back into the caller's original point order.
#[test]
fn test_indices_refer_to_input_order() {
    let mut pts = canonical_growth(0.02);
    pts.reverse(); // detector sorts internally
    let det = detect(&pts, &LogPhaseOptions::default());

    let (start, end) = (det.start_time.unwrap(), det.end_time.unwrap());
    for &i in &det.indices {
        let t = pts[i].x;
        assert!(t >= start && t <= end, "index {i} (t={t}) outside range");
    }
}

/// Mild multiplicative noise does not break detection.
#[test]
fn test_detects_under_noise() {
    let mut pts = canonical_growth(0.02);
    // Fixed ±0.5% perturbation pattern.
    let wobble = [1.004, 0.997, 1.002, 0.995, 1.005, 0.998];
    for (i, p) in pts.iter_mut().enumerate() {
        p.y *= wobble[i % wobble.len()];
    }

    let det = detect(&pts, &LogPhaseOptions::default());
    assert!(det.start_time.is_some(), "noise at 0.5% should not mask growth");
    assert_abs_diff_eq!(det.mu.unwrap(), 0.02, epsilon = 0.005);
}

// ============================================================================
// Filtering Tests
// ============================================================================

/// Points below the OD floor never enter a window fit.
#[test]
fn test_od_floor_excludes_early_points() {
    let pts = canonical_growth(0.02);
    let opts = LogPhaseOptions {
        od_min: 0.06, // above the lag baseline of 0.05
        ..LogPhaseOptions::default()
    };
    let det = detect(&pts, &opts);

    if let Some(start) = det.start_time {
        // Every surviving point is above the floor, so the selection
        // cannot begin in the lag region.
        assert!(start > 100.0, "start {start} inside the excluded lag");
    }
}

/// Zero and negative OD values are dropped before the log transform.
#[test]
fn test_non_positive_values_dropped() {
    let mut pts = canonical_growth(0.02);
    pts[0].y = 0.0;
    pts[1].y = -0.5;

    // Must not panic on ln() and still detect growth.
    let det = detect(&pts, &LogPhaseOptions::default());
    assert!(det.start_time.is_some());
}

/// Fewer filtered points than one window means nothing to evaluate.
#[test]
fn test_window_larger_than_series() {
    let pts: Vec<Point<f64>> = (0..4)
        .map(|i| Point::new(i as f64, 0.1 * (i + 1) as f64))
        .collect();
    let opts = LogPhaseOptions {
        window_size: 10,
        ..LogPhaseOptions::default()
    };
    let det = detect(&pts, &opts);

    assert_eq!(det.windows_evaluated, 0);
    assert!(det.start_time.is_none());
    assert!(det.indices.is_empty());
}

// ============================================================================
// No-Detection Tests
// ============================================================================

/// A flat series has no growth phase; that is a normal outcome, not an
/// error.
#[test]
fn test_flat_series_no_detection() {
    let pts: Vec<Point<f64>> = (0..30)
        .map(|i| Point::new(i as f64 * 10.0, 0.08))
        .collect();
    let det = detect(&pts, &LogPhaseOptions::default());

    assert!(!det.found());
    assert!(det.start_time.is_none());
    assert!(det.end_time.is_none());
    assert!(det.mu.is_none());
    assert!(det.indices.is_empty());
}

/// A strictly decaying series has no positive growth rate to normalize
/// against, so nothing is detected.
#[test]
fn test_decaying_series_no_detection() {
    let pts: Vec<Point<f64>> = (0..30)
        .map(|i| {
            let t = i as f64 * 10.0;
            Point::new(t, 0.8 * (-0.01 * t).exp())
        })
        .collect();
    let det = detect(&pts, &LogPhaseOptions::default());

    assert!(det.start_time.is_none());
    assert!(det.windows_evaluated > 0, "windows were fitted and rejected");
}
