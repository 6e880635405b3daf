//! Primitive data structures and utilities shared by all layers.

pub mod errors;
pub mod point;
pub mod sorting;
pub mod window;
