//! Uncertainty bands from exact combinatorial bootstrap over replicate wells.
//!
//! ## Purpose
//!
//! Quantifies smoothing uncertainty for a sample with replicate wells. An
//! `n`-draw bootstrap over `n` equally likely wells has a finite outcome
//! space — every integer composition of `n` draws among the wells — so for
//! small `n` the full resample distribution is enumerated exactly, with no
//! Monte-Carlo error. Each composition's pseudo-replicate set is re-smoothed
//! and resampled onto a shared time grid, and the weighted prediction
//! distribution becomes a pointwise or simultaneous confidence band.
//!
//! ## Key concepts
//!
//! * **Composition weight**: the exact multinomial mass
//!   `n! / (Π counts_i!) / n^n`; weights sum to 1 over the enumeration.
//! * **Pointwise band**: weighted 2.5th/97.5th percentile at each grid time
//!   independently.
//! * **Simultaneous band**: weighted 95th percentile of the per-composition
//!   `max |pred - main|` statistic, giving a constant-width band with joint
//!   coverage.
//! * **Scaling boundary**: enumeration is exponential in well count
//!   (`C(2n-1, n-1)` compositions), so [`MAX_EXACT_WELLS`] caps the exact
//!   path; beyond it the estimator uses the per-well spread fallback.
//!
//! ## Fallback chain
//!
//! 1. Exact bootstrap band (above).
//! 2. Per-well smoothed curves on the grid: mean ± sample SD wherever at
//!    least two wells contribute a finite value.
//! 3. Degenerate zero-width band at the main fit — the caller always
//!    receives a band object, with zero width flagging degeneracy.
//!
//! Composition evaluation is parallelized with `rayon`; aggregation is in
//! composition order, so results are deterministic.

// External dependencies
use log::debug;
use num_traits::Float;
use rayon::prelude::*;

// Internal dependencies
use crate::engine::refine::refine;
use crate::engine::smoother::SmoothingParams;
use crate::engine::validator::Validator;
use crate::math::interpolation::{interp_clamped, shared_grid};
use crate::math::percentile::weighted_percentile;
use crate::primitives::errors::CurveError;
use crate::primitives::point::Point;
use crate::primitives::sorting::sort_points;

// ============================================================================
// Public Types
// ============================================================================

/// Largest well count handled by exact enumeration.
///
/// `n` wells produce `C(2n-1, n-1)` compositions (6435 at `n = 8`), each of
/// which is a full smoothing run. Above this the estimator skips
/// enumeration and uses the per-well spread fallback directly.
pub const MAX_EXACT_WELLS: usize = 8;

/// Aggregation mode for the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandMode {
    /// Independent percentile interval at each grid time.
    Pointwise,

    /// Constant-width band with joint coverage across the grid.
    Simultaneous,
}

/// Which estimation path produced the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSource {
    /// Exact enumeration of all bootstrap compositions.
    ExactBootstrap,

    /// Mean ± sample SD of the individual well curves.
    WellSpread,

    /// Zero-width band at the main fit; signals degeneracy.
    Degenerate,
}

/// One grid time of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint<T> {
    /// Grid time (minutes).
    pub x: T,

    /// Lower bound.
    pub low: T,

    /// Upper bound.
    pub high: T,
}

/// A complete uncertainty band over the shared time grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BandCurve<T> {
    /// Band bounds, ascending in `x`, `low <= high` everywhere.
    pub points: Vec<BandPoint<T>>,

    /// Estimation path that produced the band.
    pub source: BandSource,
}

/// Band estimation outcome. Fewer than two replicate wells is a normal
/// "unavailable" outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum BandOutcome<T> {
    /// A band was produced (possibly by a fallback path).
    Available(BandCurve<T>),

    /// No band can be estimated for this sample.
    Unavailable,
}

// ============================================================================
// Estimator
// ============================================================================

/// Estimate an uncertainty band for one sample.
///
/// `wells` holds each replicate well's raw points; `aggregated` is the
/// sample's combined raw point set (the smoothing target). Invalid
/// smoothing parameters are rejected; everything else degrades through the
/// fallback chain rather than failing.
pub fn estimate<T>(
    wells: &[&[Point<T>]],
    aggregated: &[Point<T>],
    params: &SmoothingParams<T>,
    mode: BandMode,
) -> Result<BandOutcome<T>, CurveError>
where
    T: Float + Send + Sync,
{
    Validator::validate_params(params)?;

    let n = wells.len();
    if n < 2 {
        debug!("band unavailable: {n} replicate well(s), need at least 2");
        return Ok(BandOutcome::Unavailable);
    }

    // Shared time grid: sorted unique union of all wells' times.
    let axes: Vec<Vec<T>> = wells
        .iter()
        .map(|w| w.iter().map(|p| p.x).collect())
        .collect();
    let axis_refs: Vec<&[T]> = axes.iter().map(|a| a.as_slice()).collect();
    let grid = shared_grid(&axis_refs);
    if grid.is_empty() {
        debug!("band unavailable: empty time grid");
        return Ok(BandOutcome::Unavailable);
    }

    // Main fit on the aggregated raw points.
    let main_pred = match refine(aggregated, params) {
        Ok(r) => curve_on_grid(&r.output.points, &grid),
        Err(CurveError::InsufficientData { .. }) | Err(CurveError::EmptyInput) => {
            debug!("band unavailable: aggregated points insufficient for main fit");
            return Ok(BandOutcome::Unavailable);
        }
        Err(e) => return Err(e),
    };

    // Path 1: exact bootstrap enumeration, small n only.
    if n <= MAX_EXACT_WELLS {
        if let Some(points) = bootstrap_band(wells, params, mode, &grid, &main_pred) {
            return Ok(BandOutcome::Available(BandCurve {
                points,
                source: BandSource::ExactBootstrap,
            }));
        }
        debug!("bootstrap band yielded no grid points, trying per-well spread");
    } else {
        debug!("{n} wells exceeds MAX_EXACT_WELLS={MAX_EXACT_WELLS}, using per-well spread");
    }

    // Path 2: per-well curve spread.
    if let Some(points) = well_spread_band(wells, params, &grid) {
        return Ok(BandOutcome::Available(BandCurve {
            points,
            source: BandSource::WellSpread,
        }));
    }

    // Path 3: degenerate zero-width band at the main fit.
    let points = grid
        .iter()
        .zip(main_pred.iter())
        .filter(|&(_, &m)| m.is_finite())
        .map(|(&x, &m)| BandPoint {
            x,
            low: m,
            high: m,
        })
        .collect();

    Ok(BandOutcome::Available(BandCurve {
        points,
        source: BandSource::Degenerate,
    }))
}

// ============================================================================
// Composition Enumeration
// ============================================================================

/// Enumerate every integer composition of `n` draws among `n` wells,
/// paired with its exact multinomial probability mass
/// `n! / (Π counts_i!) / n^n`. Weights sum to 1 over the enumeration.
pub fn composition_weights(n: usize) -> Vec<(Vec<usize>, f64)> {
    let mut out = Vec::new();
    if n == 0 {
        return out;
    }
    let mut counts = vec![0usize; n];
    enumerate_counts(n, 0, n, &mut counts, &mut out);
    out
}

fn enumerate_counts(
    n: usize,
    slot: usize,
    remaining: usize,
    counts: &mut Vec<usize>,
    out: &mut Vec<(Vec<usize>, f64)>,
) {
    if slot == n - 1 {
        counts[slot] = remaining;
        out.push((counts.clone(), multinomial_mass(counts)));
        return;
    }
    for c in 0..=remaining {
        counts[slot] = c;
        enumerate_counts(n, slot + 1, remaining - c, counts, out);
    }
}

/// Exact multinomial mass of one composition: `n! / (Π c_i!) / n^n`.
fn multinomial_mass(counts: &[usize]) -> f64 {
    let n = counts.iter().sum::<usize>();
    let mut mass = factorial(n) / (n as f64).powi(n as i32);
    for &c in counts {
        mass /= factorial(c);
    }
    mass
}

fn factorial(n: usize) -> f64 {
    (1..=n).fold(1.0, |acc, k| acc * k as f64)
}

// ============================================================================
// Band Construction
// ============================================================================

/// Exact-bootstrap band; `None` when no grid point could be bounded.
fn bootstrap_band<T>(
    wells: &[&[Point<T>]],
    params: &SmoothingParams<T>,
    mode: BandMode,
    grid: &[T],
    main_pred: &[T],
) -> Option<Vec<BandPoint<T>>>
where
    T: Float + Send + Sync,
{
    let comps = composition_weights(wells.len());

    // One smoothed grid curve per composition, in enumeration order.
    // Compositions whose pseudo-replicate set cannot be fitted are dropped
    // (their weight is simply excluded; percentiles renormalize).
    let curves: Vec<Option<(f64, Vec<T>)>> = comps
        .par_iter()
        .map(|(counts, weight)| {
            let mut pseudo: Vec<Point<T>> = Vec::new();
            for (well, &c) in wells.iter().zip(counts.iter()) {
                for _ in 0..c {
                    pseudo.extend_from_slice(well);
                }
            }
            refine(&pseudo, params)
                .ok()
                .map(|r| (*weight, curve_on_grid(&r.output.points, grid)))
        })
        .collect();

    let curves: Vec<(f64, Vec<T>)> = curves.into_iter().flatten().collect();
    if curves.is_empty() {
        return None;
    }

    match mode {
        BandMode::Pointwise => {
            let lo_p = T::from(2.5).unwrap();
            let hi_p = T::from(97.5).unwrap();
            let mut points = Vec::with_capacity(grid.len());

            for (j, &x) in grid.iter().enumerate() {
                let mut pairs: Vec<(T, T)> = curves
                    .iter()
                    .filter(|(_, pred)| pred[j].is_finite())
                    .map(|(w, pred)| (pred[j], T::from(*w).unwrap()))
                    .collect();

                let low = weighted_percentile(&mut pairs, lo_p);
                let high = weighted_percentile(&mut pairs, hi_p);
                if let (Some(low), Some(high)) = (low, high) {
                    points.push(BandPoint {
                        x,
                        low: low.min(high),
                        high: high.max(low),
                    });
                }
            }

            if points.is_empty() { None } else { Some(points) }
        }
        BandMode::Simultaneous => {
            // Weighted 95th percentile of the max-deviation statistic.
            let mut pairs: Vec<(T, T)> = curves
                .iter()
                .filter_map(|(w, pred)| {
                    let max_diff = pred
                        .iter()
                        .zip(main_pred.iter())
                        .filter(|(p, m)| p.is_finite() && m.is_finite())
                        .fold(T::zero(), |acc, (&p, &m)| acc.max((p - m).abs()));
                    max_diff
                        .is_finite()
                        .then_some((max_diff, T::from(*w).unwrap()))
                })
                .collect();

            let c = weighted_percentile(&mut pairs, T::from(95.0).unwrap())?;

            let points: Vec<BandPoint<T>> = grid
                .iter()
                .zip(main_pred.iter())
                .filter(|&(_, &m)| m.is_finite())
                .map(|(&x, &m)| BandPoint {
                    x,
                    low: m - c,
                    high: m + c,
                })
                .collect();

            if points.is_empty() { None } else { Some(points) }
        }
    }
}

/// Per-well spread band: mean ± sample SD of the individual well curves,
/// at grid times where at least two wells contribute a finite value.
fn well_spread_band<T>(
    wells: &[&[Point<T>]],
    params: &SmoothingParams<T>,
    grid: &[T],
) -> Option<Vec<BandPoint<T>>>
where
    T: Float + Send + Sync,
{
    let curves: Vec<Vec<T>> = wells
        .iter()
        .filter_map(|well| {
            refine(well, params)
                .ok()
                .map(|r| curve_on_grid(&r.output.points, grid))
        })
        .collect();

    if curves.len() < 2 {
        return None;
    }

    let mut points = Vec::with_capacity(grid.len());
    for (j, &x) in grid.iter().enumerate() {
        let values: Vec<T> = curves
            .iter()
            .map(|c| c[j])
            .filter(|v| v.is_finite())
            .collect();
        if values.len() < 2 {
            continue;
        }

        let n_t = T::from(values.len()).unwrap();
        let mean = values.iter().fold(T::zero(), |a, &v| a + v) / n_t;
        let var = values
            .iter()
            .fold(T::zero(), |a, &v| a + (v - mean) * (v - mean))
            / (n_t - T::one());
        let sd = var.max(T::zero()).sqrt();

        points.push(BandPoint {
            x,
            low: mean - sd,
            high: mean + sd,
        });
    }

    if points.is_empty() { None } else { Some(points) }
}

/// Resample a smoothed point set onto the shared grid (sorts first; the
/// smoother returns points in the caller's original order).
fn curve_on_grid<T: Float>(points: &[Point<T>], grid: &[T]) -> Vec<T> {
    let sorted = sort_points(points);
    interp_clamped(&sorted.x, &sorted.y, grid)
}
