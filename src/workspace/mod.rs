//! Sample orchestration: batch smoothing, undo, selections, bands, export.
//!
//! ## Purpose
//!
//! `CurveWorkspace` is the stateful front of the crate. It owns samples in
//! insertion order and drives the lower layers over them: batch smoothing
//! with per-sample skip accounting, history undo, log-phase selection
//! (manual or auto-refreshed after every mutating operation), band
//! estimation, and export payload assembly.
//!
//! ## Design notes
//!
//! * Batch operations process samples strictly in insertion order, one at a
//!   time. A host scheduler that wants incremental progress can call
//!   `apply_smoothing_one` itself.
//! * A sample with too few points for the requested fit is skipped and
//!   counted, never a batch failure. Naming a sample the workspace does not
//!   hold IS an error, caught before anything is mutated.
//! * Smoothing always runs on the raw state (`history[0]`), so repeating an
//!   operation is idempotent rather than compounding.
//! * Auto-detection refresh honors [`SelectionPolicy`]: `AutoReplace` lets
//!   detection overwrite or clear any selection, `KeepManual` refreshes
//!   only selections the detector created.

pub mod sample;

// Standard library dependencies
use std::time::{SystemTime, UNIX_EPOCH};

// External dependencies
use log::debug;

// Internal dependencies
use crate::engine::refine::refine;
use crate::engine::smoother::SmoothingParams;
use crate::engine::validator::Validator;
use crate::evaluation::bands::{self, BandMode, BandOutcome};
use crate::evaluation::detector::{self, LogPhaseOptions};
use crate::primitives::errors::CurveError;
use crate::primitives::point::Point;
use crate::workspace::sample::{Sample, SmoothingDiagnostics, SmoothingState};

// ============================================================================
// Selections
// ============================================================================

/// How auto-detection interacts with existing selections after a mutating
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Detection overwrites or clears any selection, manual ones included.
    #[default]
    AutoReplace,

    /// Detection refreshes only selections it created itself; manual
    /// selections are left untouched.
    KeepManual,
}

/// Who created a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    /// Set by the host through `select_log_phase`.
    Manual,

    /// Produced by the detector.
    Auto,
}

/// A log-phase time range on one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPhaseSelection {
    /// Owning sample name.
    pub sample: String,

    /// Range start (minutes), strictly before `end`.
    pub start: f64,

    /// Range end (minutes).
    pub end: f64,

    /// Creation timestamp, unix milliseconds.
    pub created_at: u64,

    /// Manual or auto-detected.
    pub origin: SelectionOrigin,

    /// Latest history entry's points inside `[start, end]`, captured at
    /// selection time.
    pub points: Option<Vec<Point<f64>>>,
}

// ============================================================================
// Batch Accounting
// ============================================================================

/// Outcome of a batch operation over several samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Samples the operation changed.
    pub applied: usize,

    /// Samples skipped as no-ops (too little data, or already at the raw
    /// state for undo).
    pub skipped: usize,
}

// ============================================================================
// Workspace
// ============================================================================

/// Owns samples and orchestrates operations over them.
#[derive(Debug, Clone)]
pub struct CurveWorkspace {
    samples: Vec<Sample>,
    params: SmoothingParams<f64>,
    detector_options: LogPhaseOptions<f64>,
    policy: SelectionPolicy,
}

impl Default for CurveWorkspace {
    fn default() -> Self {
        Self::new(SelectionPolicy::default())
    }
}

impl CurveWorkspace {
    /// An empty workspace with default smoothing parameters and detector
    /// options.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            samples: Vec::new(),
            params: SmoothingParams::default(),
            detector_options: LogPhaseOptions::default(),
            policy,
        }
    }

    // ------------------------------------------------------------------
    // Sample management
    // ------------------------------------------------------------------

    /// Add a sample. A sample with the same name replaces the existing one
    /// in place, keeping its insertion position.
    pub fn add_sample(&mut self, sample: Sample) {
        match self.samples.iter_mut().find(|s| s.name == sample.name) {
            Some(slot) => *slot = sample,
            None => self.samples.push(sample),
        }
    }

    /// Samples in insertion order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Look up a sample by name.
    pub fn sample(&self, name: &str) -> Option<&Sample> {
        self.samples.iter().find(|s| s.name == name)
    }

    /// Replace the detector options; values are clamped into their valid
    /// ranges once here.
    pub fn set_detector_options(&mut self, options: LogPhaseOptions<f64>) {
        self.detector_options = options.clamped();
    }

    /// Change how auto-detection treats existing selections.
    pub fn set_selection_policy(&mut self, policy: SelectionPolicy) {
        self.policy = policy;
    }

    /// The smoothing parameters of the most recent batch (defaults before
    /// any batch has run).
    pub fn smoothing_params(&self) -> &SmoothingParams<f64> {
        &self.params
    }

    // ------------------------------------------------------------------
    // Batch smoothing
    // ------------------------------------------------------------------

    /// Smooth each named sample's raw points and append the result to its
    /// history. Samples with too few points are skipped and counted.
    pub fn apply_smoothing(
        &mut self,
        names: &[&str],
        params: &SmoothingParams<f64>,
    ) -> Result<BatchReport, CurveError> {
        Validator::validate_params(params)?;
        self.check_names(names)?;
        self.params = *params;

        let mut report = BatchReport::default();
        for &name in names {
            if self.smooth_one(name, params)? {
                report.applied += 1;
            } else {
                report.skipped += 1;
            }
        }
        Ok(report)
    }

    /// Smooth a single sample; `Ok(true)` when a state was appended,
    /// `Ok(false)` when the sample was skipped for insufficient data.
    pub fn apply_smoothing_one(
        &mut self,
        name: &str,
        params: &SmoothingParams<f64>,
    ) -> Result<bool, CurveError> {
        Validator::validate_params(params)?;
        self.check_names(&[name])?;
        self.params = *params;
        self.smooth_one(name, params)
    }

    fn smooth_one(&mut self, name: &str, params: &SmoothingParams<f64>) -> Result<bool, CurveError> {
        let sample = self
            .samples
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| CurveError::UnknownSample(name.to_string()))?;

        // Always fit the raw state, never a previously smoothed one.
        let raw_points = sample.raw().points.clone();
        let refined = match refine(&raw_points, params) {
            Ok(r) => r,
            Err(CurveError::InsufficientData { got, min }) => {
                debug!("sample {name}: skipped, {got} point(s) but fit needs {min}");
                return Ok(false);
            }
            Err(CurveError::EmptyInput) => {
                debug!("sample {name}: skipped, no points");
                return Ok(false);
            }
            Err(e) => return Err(e),
        };

        let label = format!(
            "loess span={:.2} deg={} ({}, {} loop{})",
            params.span,
            params.degree,
            if refined.converged {
                "converged"
            } else {
                "not converged"
            },
            refined.loops,
            if refined.loops == 1 { "" } else { "s" },
        );

        sample.push_state(SmoothingState {
            label,
            points: refined.output.points,
            diagnostics: Some(SmoothingDiagnostics {
                loops: refined.loops,
                converged: refined.converged,
                window_size: refined.output.window_size,
                robust_passes: refined.output.robust_passes,
                fit: refined.output.diagnostics,
            }),
        });

        self.refresh_detection(name);
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------

    /// Pop the latest smoothing state of each named sample. Samples already
    /// at the raw state are skipped and counted.
    pub fn step_back(&mut self, names: &[&str]) -> Result<BatchReport, CurveError> {
        self.check_names(names)?;

        let mut report = BatchReport::default();
        for &name in names {
            let popped = self
                .samples
                .iter_mut()
                .find(|s| s.name == name)
                .map(Sample::step_back)
                .unwrap_or(false);

            if popped {
                report.applied += 1;
                self.refresh_detection(name);
            } else {
                report.skipped += 1;
            }
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Log-phase selections
    // ------------------------------------------------------------------

    /// Manually select a log-phase range on one sample.
    pub fn select_log_phase(&mut self, name: &str, start: f64, end: f64) -> Result<(), CurveError> {
        Validator::validate_range(start, end)?;
        let sample = self
            .samples
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| CurveError::UnknownSample(name.to_string()))?;

        let points = points_in_range(sample.latest(), start, end);
        sample.selection = Some(LogPhaseSelection {
            sample: name.to_string(),
            start,
            end,
            created_at: unix_millis(),
            origin: SelectionOrigin::Manual,
            points: Some(points),
        });
        Ok(())
    }

    /// Remove a sample's selection, whatever its origin.
    pub fn clear_log_phase(&mut self, name: &str) -> Result<(), CurveError> {
        self.samples
            .iter_mut()
            .find(|s| s.name == name)
            .map(|s| s.selection = None)
            .ok_or_else(|| CurveError::UnknownSample(name.to_string()))
    }

    /// Re-run the detector on one sample's latest state and update its
    /// selection per the workspace policy.
    fn refresh_detection(&mut self, name: &str) {
        let policy = self.policy;
        let options = self.detector_options;
        let Some(sample) = self.samples.iter_mut().find(|s| s.name == name) else {
            return;
        };

        if policy == SelectionPolicy::KeepManual
            && matches!(
                sample.selection,
                Some(LogPhaseSelection {
                    origin: SelectionOrigin::Manual,
                    ..
                })
            )
        {
            return;
        }

        let detection = detector::detect(&sample.latest().points, &options);
        sample.selection = match (detection.start_time, detection.end_time) {
            (Some(start), Some(end)) => {
                let points = points_in_range(sample.latest(), start, end);
                Some(LogPhaseSelection {
                    sample: name.to_string(),
                    start,
                    end,
                    created_at: unix_millis(),
                    origin: SelectionOrigin::Auto,
                    points: Some(points),
                })
            }
            _ => None,
        };
    }

    // ------------------------------------------------------------------
    // Uncertainty bands
    // ------------------------------------------------------------------

    /// Estimate an uncertainty band for one sample from its replicate
    /// wells. `span` and `degree` override the defaults; the driver's
    /// other knobs stay at their defaults.
    pub fn band(
        &self,
        name: &str,
        span: f64,
        degree: u8,
        mode: BandMode,
    ) -> Result<BandOutcome<f64>, CurveError> {
        let sample = self
            .sample(name)
            .ok_or_else(|| CurveError::UnknownSample(name.to_string()))?;

        let params = SmoothingParams::default().span(span).degree(degree);
        let wells = sample.well_point_slices();
        bands::estimate(&wells, &sample.raw().points, &params, mode)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Snapshot the workspace into its serde export form.
    pub fn export_payload(&self) -> crate::export::SmoothedCurvesPayload {
        crate::export::SmoothedCurvesPayload::from_workspace(self)
    }

    // ------------------------------------------------------------------
    // Internal
    // ------------------------------------------------------------------

    /// Reject a batch up front when it names a sample the workspace does
    /// not hold.
    fn check_names(&self, names: &[&str]) -> Result<(), CurveError> {
        for &name in names {
            if self.sample(name).is_none() {
                return Err(CurveError::UnknownSample(name.to_string()));
            }
        }
        Ok(())
    }
}

/// Points of a history entry inside `[start, end]`, inclusive.
fn points_in_range(state: &SmoothingState, start: f64, end: f64) -> Vec<Point<f64>> {
    state
        .points
        .iter()
        .copied()
        .filter(|p| p.x >= start && p.x <= end)
        .collect()
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
