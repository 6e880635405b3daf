//! Execution engine: LOESS smoother, convergence driver, validation.

pub mod refine;
pub mod smoother;
pub mod validator;
