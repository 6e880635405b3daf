//! Pure mathematical functions: kernels, percentiles, interpolation.

pub mod interpolation;
pub mod kernel;
pub mod percentile;
