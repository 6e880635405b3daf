//! Post-processing: uncertainty bands, log-phase detection, fit diagnostics.

pub mod bands;
pub mod detector;
pub mod diagnostics;
