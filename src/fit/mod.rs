//! Per-file model fitting.

pub mod fitter;

pub use fitter::*;
