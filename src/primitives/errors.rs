//! Error types for growth-curve operations.
//!
//! ## Purpose
//!
//! This module defines the error conditions that can occur while smoothing,
//! refining, or orchestrating growth-curve data: invalid parameters,
//! insufficient data, and unknown batch targets.
//!
//! ## Design notes
//!
//! * **Contextual**: Errors carry the offending values (e.g. actual vs.
//!   required point counts).
//! * **Rejected, not clamped**: Smoothing parameters are validated up front
//!   and never silently substituted. Detector options, which originate from
//!   free-text UI fields, are clamped elsewhere and never reach this enum.
//! * **Normal outcomes are not errors**: an unavailable band or an empty
//!   log-phase detection is reported through a dedicated outcome type, not
//!   through `CurveError`.
//!
//! ## Invariants
//!
//! * All variants provide sufficient context for diagnosis.
//! * Numeric values in errors use `f64` regardless of the working precision.

// External dependencies
use core::fmt::{Display, Formatter, Result};
use std::error::Error;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for growth-curve smoothing and orchestration.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Input point sequence is empty.
    EmptyInput,

    /// Smoothing span must be positive and finite.
    InvalidSpan(f64),

    /// Local polynomial degree must be 1 or 2.
    InvalidDegree(u8),

    /// At least one robustness iteration is required.
    InvalidIterations(usize),

    /// At least one refinement loop is required.
    InvalidRefinements(usize),

    /// Convergence tolerance must be positive and finite.
    InvalidTolerance(f64),

    /// Number of points is below the minimum for the requested fit.
    InsufficientData {
        /// Number of usable points provided.
        got: usize,
        /// Minimum required points.
        min: usize,
    },

    /// A manual phase range must satisfy `start < end`.
    InvalidRange {
        /// Requested range start (minutes).
        start: f64,
        /// Requested range end (minutes).
        end: f64,
    },

    /// A batch operation referenced a sample name the workspace does not hold.
    UnknownSample(String),
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for CurveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input point sequence is empty"),
            Self::InvalidSpan(span) => {
                write!(f, "Invalid span: {span} (must be > 0 and finite)")
            }
            Self::InvalidDegree(degree) => {
                write!(f, "Invalid degree: {degree} (must be 1 or 2)")
            }
            Self::InvalidIterations(iter) => {
                write!(f, "Invalid robustness iterations: {iter} (must be >= 1)")
            }
            Self::InvalidRefinements(refinements) => {
                write!(f, "Invalid refinement count: {refinements} (must be >= 1)")
            }
            Self::InvalidTolerance(tol) => {
                write!(f, "Invalid tolerance: {tol} (must be > 0 and finite)")
            }
            Self::InsufficientData { got, min } => {
                write!(f, "Too few points: got {got}, need at least {min}")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "Invalid phase range: [{start}, {end}] (start must be < end)")
            }
            Self::UnknownSample(name) => write!(f, "Unknown sample: '{name}'"),
        }
    }
}

impl Error for CurveError {}
