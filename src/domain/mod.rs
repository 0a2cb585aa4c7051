//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the batch configuration (`BatchConfig`, `PlotStyle`, `DataTransform`, `FitErrorPolicy`)
//! - loaded data (`DataSet`)
//! - fit outputs and the run report (`FitResult`, `FileFit`, `BatchReport`)

pub mod config;
pub mod types;

pub use config::*;
pub use types::*;
