//! # odcurve — growth-curve smoothing and log-phase detection
//!
//! The numerical core for turning raw microbial growth-curve measurements
//! (OD600 vs. time, per well) into smoothed curves, bootstrap uncertainty
//! bands, and an automatically detected exponential ("log") growth phase.
//!
//! The crate is organized in layers, lower layers knowing nothing about the
//! ones above:
//!
//! 1. **Primitives** — points, errors, sorting, neighborhood windows.
//! 2. **Math** — tricube kernel, weighted percentiles, grid interpolation.
//! 3. **Algorithms** — local polynomial regression and robust reweighting.
//! 4. **Engine** — the LOESS smoother, the convergence driver, validation.
//! 5. **Evaluation** — uncertainty bands, log-phase detection, diagnostics.
//! 6. **Workspace** — per-sample histories and batch orchestration.
//!
//! ## Quick start
//!
//! ```rust
//! use odcurve::prelude::*;
//!
//! let points: Vec<Point<f64>> = (0..20)
//!     .map(|i| Point::new(i as f64 * 5.0, 0.05 + 0.01 * i as f64))
//!     .collect();
//!
//! let params = SmoothingParams::default().span(0.5).degree(1);
//! let refined = refine(&points, &params)?;
//!
//! assert_eq!(refined.output.points.len(), points.len());
//! assert!(refined.loops <= params.max_refinements);
//! # Ok::<(), CurveError>(())
//! ```
//!
//! ## What this crate is not
//!
//! No file I/O, no persistence, no rendering. Instrument parsing, plate
//! mapping, and chart drawing are host concerns; this crate consumes
//! validated `(time, value)` sequences and hands back smoothing states,
//! bands, and phase selections.
//!
//! ## References
//!
//! - Cleveland, W. S. (1979). "Robust Locally Weighted Regression and Smoothing Scatterplots"
//! - Davison, A. C. & Hinkley, D. V. (1997). "Bootstrap Methods and their Application"

// Layer 1: Primitives - data structures and basic utilities.
pub mod primitives;

// Layer 2: Math - pure mathematical functions.
pub mod math;

// Layer 3: Algorithms - regression and robustness kernels.
pub mod algorithms;

// Layer 4: Engine - smoother, convergence driver, validation.
pub mod engine;

// Layer 5: Evaluation - bands, detection, fit diagnostics.
pub mod evaluation;

// Layer 6: Workspace - sample histories and batch orchestration.
pub mod workspace;

// Export payloads for the host UI / JSON layer.
pub mod export;

/// Standard prelude re-exporting the types most callers need.
pub mod prelude {
    pub use crate::engine::refine::{RefineOutput, refine};
    pub use crate::engine::smoother::{SmoothOutput, SmoothingParams, smooth};
    pub use crate::evaluation::bands::{
        BandCurve, BandMode, BandOutcome, BandPoint, BandSource, MAX_EXACT_WELLS,
    };
    pub use crate::evaluation::detector::{LogPhaseDetection, LogPhaseOptions, detect};
    pub use crate::evaluation::diagnostics::FitDiagnostics;
    pub use crate::export::SmoothedCurvesPayload;
    pub use crate::primitives::errors::CurveError;
    pub use crate::primitives::point::Point;
    pub use crate::workspace::{
        BatchReport, CurveWorkspace, LogPhaseSelection, SelectionPolicy,
        sample::{ReplicateWell, Sample, SmoothingState},
    };
}
