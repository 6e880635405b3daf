//! The `(time, value)` measurement point shared by every layer.
//!
//! Time is in minutes, value is the raw measurement (typically OD600).
//! No uniqueness constraint is placed on `x`; duplicate time stamps are
//! legal and handled by the sorting and interpolation layers.

// External dependencies
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// A single measurement: `x` = time (minutes), `y` = measured value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<T> {
    /// Time coordinate, in minutes.
    pub x: T,

    /// Measured value (e.g. OD600).
    pub y: T,
}

impl<T: Float> Point<T> {
    /// Construct a point from coordinates.
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are finite (no NaN, no infinities).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
