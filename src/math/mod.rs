//! Numerical routines: Levenberg–Marquardt and an SVD least-squares fallback.

pub mod lm;
pub mod ols;

pub use lm::*;
pub use ols::*;
