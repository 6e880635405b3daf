//! Input validation for smoothing parameters and point data.
//!
//! ## Purpose
//!
//! Fail-fast checks for everything the host hands the engine. Smoothing
//! parameters are rejected outright when invalid — never silently
//! substituted — while detector options are clamped in their own module
//! because they originate from free-text UI fields.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first violation.
//! * **Ordering**: Checks run cheapest first.
//! * **Side-effect free**: Validation never mutates its inputs.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::smoother::SmoothingParams;
use crate::primitives::errors::CurveError;
use crate::primitives::point::Point;

/// Validation utility for smoothing parameters and input data.
pub struct Validator;

impl Validator {
    /// Validate a full smoothing parameter set.
    pub fn validate_params<T: Float>(params: &SmoothingParams<T>) -> Result<(), CurveError> {
        if !params.span.is_finite() || params.span <= T::zero() {
            return Err(CurveError::InvalidSpan(
                params.span.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if params.degree != 1 && params.degree != 2 {
            return Err(CurveError::InvalidDegree(params.degree));
        }
        if params.robust_iterations < 1 {
            return Err(CurveError::InvalidIterations(params.robust_iterations));
        }
        if params.max_refinements < 1 {
            return Err(CurveError::InvalidRefinements(params.max_refinements));
        }
        if !params.tolerance.is_finite() || params.tolerance <= T::zero() {
            return Err(CurveError::InvalidTolerance(
                params.tolerance.to_f64().unwrap_or(f64::NAN),
            ));
        }
        Ok(())
    }

    /// Validate a point sequence against the minimum size for a fit.
    ///
    /// Points are expected to be pre-filtered of non-finite values by the
    /// ingestion layer; the count check is the engine's own responsibility.
    pub fn validate_points<T: Float>(points: &[Point<T>], min: usize) -> Result<(), CurveError> {
        if points.is_empty() {
            return Err(CurveError::EmptyInput);
        }
        if points.len() < min {
            return Err(CurveError::InsufficientData {
                got: points.len(),
                min,
            });
        }
        Ok(())
    }

    /// Validate a manual phase range.
    pub fn validate_range(start: f64, end: f64) -> Result<(), CurveError> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(CurveError::InvalidRange { start, end });
        }
        Ok(())
    }
}
