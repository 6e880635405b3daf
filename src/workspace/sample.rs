//! Per-sample state: replicate wells, aggregated raw points, and the
//! smoothing history.
//!
//! ## Purpose
//!
//! A `Sample` ties together everything the workspace knows about one
//! biological sample: its replicate wells, the aggregated raw point set the
//! smoother operates on, and a stack of smoothing states. `history[0]` is
//! always the raw state; later entries are appended by smoothing operations
//! and popped by undo, so the raw data can never be smoothed away.
//!
//! Non-finite measurements are dropped at construction and logged at debug
//! level; nothing downstream has to re-check.

// External dependencies
use log::debug;

// Internal dependencies
use crate::evaluation::diagnostics::FitDiagnostics;
use crate::primitives::point::Point;
use crate::primitives::sorting::sort_points;
use crate::workspace::LogPhaseSelection;

// ============================================================================
// Replicate Wells
// ============================================================================

/// One physical well's raw measurements for a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicateWell {
    /// Plate well identifier, e.g. `"B4"`.
    pub well_id: String,

    /// 1-based replicate number within the sample.
    pub replicate_index: u32,

    /// Raw `(time, OD600)` measurements; finite only after ingestion.
    pub points: Vec<Point<f64>>,
}

impl ReplicateWell {
    /// Build a well, dropping non-finite measurements.
    pub fn new(
        well_id: impl Into<String>,
        replicate_index: u32,
        points: Vec<Point<f64>>,
    ) -> Self {
        let well_id = well_id.into();
        let total = points.len();
        let points: Vec<Point<f64>> = points.into_iter().filter(|p| p.is_finite()).collect();
        if points.len() < total {
            debug!(
                "well {well_id}: dropped {} non-finite point(s) at ingestion",
                total - points.len()
            );
        }
        Self {
            well_id,
            replicate_index: replicate_index.max(1),
            points,
        }
    }
}

// ============================================================================
// Smoothing History
// ============================================================================

/// Convergence and fit-quality record attached to a smoothed history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingDiagnostics {
    /// Refinement loops the driver ran.
    pub loops: usize,

    /// Whether the driver converged within its loop budget.
    pub converged: bool,

    /// Neighborhood size used by the smoother.
    pub window_size: usize,

    /// Robustness passes actually applied.
    pub robust_passes: usize,

    /// Fit-quality metrics of the final pass.
    pub fit: FitDiagnostics<f64>,
}

/// One entry in a sample's smoothing history.
///
/// `history[0]` is the raw state (`diagnostics` is `None`); every later
/// entry is the result of one smoothing operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingState {
    /// Human-readable label, e.g. `"raw"` or
    /// `"loess span=0.60 deg=2 (converged, 2 loops)"`.
    pub label: String,

    /// The curve at this state, ascending in time.
    pub points: Vec<Point<f64>>,

    /// Present on smoothed entries, absent on the raw state.
    pub diagnostics: Option<SmoothingDiagnostics>,
}

impl SmoothingState {
    /// The raw (unsmoothed) state.
    pub fn raw(points: Vec<Point<f64>>) -> Self {
        Self {
            label: "raw".to_string(),
            points,
            diagnostics: None,
        }
    }
}

// ============================================================================
// Sample
// ============================================================================

/// A named sample: wells, aggregated raw points, smoothing history.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Sample name, unique within a workspace.
    pub name: String,

    /// Display color, an opaque string the host assigns (e.g. `"#1f77b4"`).
    pub color: String,

    /// Replicate wells, in replicate order.
    pub wells: Vec<ReplicateWell>,

    /// Smoothing history; `history[0]` is the raw state and is never
    /// removed or mutated.
    pub history: Vec<SmoothingState>,

    /// Current log-phase selection, manual or auto-detected.
    pub selection: Option<LogPhaseSelection>,
}

impl Sample {
    /// Build a sample from its wells.
    ///
    /// The aggregated raw point set is the union of all finite well points,
    /// stably sorted by time, and becomes `history[0]`.
    pub fn new(name: impl Into<String>, color: impl Into<String>, wells: Vec<ReplicateWell>) -> Self {
        let mut aggregated: Vec<Point<f64>> = wells
            .iter()
            .flat_map(|w| w.points.iter().copied())
            .collect();
        let sorted = sort_points(&aggregated);
        aggregated = sorted
            .x
            .iter()
            .zip(sorted.y.iter())
            .map(|(&x, &y)| Point::new(x, y))
            .collect();

        Self {
            name: name.into(),
            color: color.into(),
            wells,
            history: vec![SmoothingState::raw(aggregated)],
            selection: None,
        }
    }

    /// The raw state, `history[0]`.
    pub fn raw(&self) -> &SmoothingState {
        &self.history[0]
    }

    /// The most recent history entry.
    pub fn latest(&self) -> &SmoothingState {
        // history is never empty: construction seeds the raw state and
        // step_back refuses to pop it.
        &self.history[self.history.len() - 1]
    }

    /// Append a smoothed state.
    pub fn push_state(&mut self, state: SmoothingState) {
        self.history.push(state);
    }

    /// Pop the latest smoothed state. Returns `false` when only the raw
    /// state remains (the raw state is never popped).
    pub fn step_back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Borrow each well's raw points, for the band estimator.
    pub fn well_point_slices(&self) -> Vec<&[Point<f64>]> {
        self.wells.iter().map(|w| w.points.as_slice()).collect()
    }
}
