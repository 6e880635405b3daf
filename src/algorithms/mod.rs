//! Core regression algorithms: local polynomial fits and robust reweighting.

pub mod regression;
pub mod robustness;
