//! Serde payloads handed to the host UI / JSON layer.
//!
//! ## Purpose
//!
//! Flat, serde-derived mirrors of workspace state. The host serializes
//! these to JSON for charting and persistence; field names follow the
//! host's existing wire format (`logPhases`, `t_min`, `od600`), so renames
//! live here and nowhere else. Floats pass through serde untouched — no
//! rounding — so an export → import round-trip preserves values exactly.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::evaluation::bands::BandCurve;
use crate::primitives::point::Point;
use crate::workspace::CurveWorkspace;

// ============================================================================
// Smoothed Curves
// ============================================================================

/// Everything the host needs to redraw a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothedCurvesPayload {
    /// Parameters of the most recent smoothing batch.
    pub smoothing: SmoothingMeta,

    /// Per-sample curves, in workspace insertion order.
    pub samples: Vec<SamplePayload>,

    /// Current log-phase selections, one per selected sample.
    #[serde(rename = "logPhases")]
    pub log_phases: Vec<LogPhasePayload>,
}

/// Smoothing parameters echoed into the payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothingMeta {
    pub span: f64,
    pub degree: u8,
}

/// One sample's wells and smoothing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplePayload {
    pub sample: String,
    pub color: String,

    /// Well identifiers, in replicate order.
    pub wells: Vec<String>,

    /// Full history, raw state first.
    pub history: Vec<HistoryEntryPayload>,
}

/// One history entry: label plus curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntryPayload {
    pub label: String,
    pub points: Vec<Point<f64>>,
}

/// One log-phase selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogPhasePayload {
    pub sample: String,
    pub start: f64,
    pub end: f64,

    /// Curve points inside the selected range, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<PhasePoint>>,
}

/// A point inside a log-phase selection, in the host's wire naming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePoint {
    /// Time in minutes.
    pub t_min: f64,

    /// Optical density at 600 nm.
    pub od600: f64,
}

impl SmoothedCurvesPayload {
    /// Snapshot a workspace into its export form.
    pub fn from_workspace(workspace: &CurveWorkspace) -> Self {
        let params = workspace.smoothing_params();

        let samples = workspace
            .samples()
            .iter()
            .map(|s| SamplePayload {
                sample: s.name.clone(),
                color: s.color.clone(),
                wells: s.wells.iter().map(|w| w.well_id.clone()).collect(),
                history: s
                    .history
                    .iter()
                    .map(|state| HistoryEntryPayload {
                        label: state.label.clone(),
                        points: state.points.clone(),
                    })
                    .collect(),
            })
            .collect();

        let log_phases = workspace
            .samples()
            .iter()
            .filter_map(|s| s.selection.as_ref())
            .map(|sel| LogPhasePayload {
                sample: sel.sample.clone(),
                start: sel.start,
                end: sel.end,
                points: sel.points.as_ref().map(|pts| {
                    pts.iter()
                        .map(|p| PhasePoint {
                            t_min: p.x,
                            od600: p.y,
                        })
                        .collect()
                }),
            })
            .collect();

        Self {
            smoothing: SmoothingMeta {
                span: params.span,
                degree: params.degree,
            },
            samples,
            log_phases,
        }
    }
}

// ============================================================================
// Bands
// ============================================================================

/// One sample's uncertainty band in export form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPayload {
    pub sample: String,
    pub points: Vec<BandPointPayload>,
}

/// One band point: `low <= high` at grid time `x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPointPayload {
    pub x: f64,
    pub low: f64,
    pub high: f64,
}

impl BandPayload {
    /// Flatten a band curve for export.
    pub fn from_curve(sample: impl Into<String>, curve: &BandCurve<f64>) -> Self {
        Self {
            sample: sample.into(),
            points: curve
                .points
                .iter()
                .map(|p| BandPointPayload {
                    x: p.x,
                    low: p.low,
                    high: p.high,
                })
                .collect(),
        }
    }
}
