//! Shared domain types.
//!
//! These are the values that flow through one batch run:
//!
//! - `DataSet`: the `(x, y)` columns loaded from one file
//! - `FitResult` / `FileFit`: fitted parameters per file
//! - `Skip`: a file that did not make it through a stage, and why
//! - `BatchReport`: everything a run produced

use std::path::PathBuf;

/// Two equal-length numeric columns loaded from one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    pub path: PathBuf,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl DataSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

/// Best-fit parameters for one data set.
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    /// One value per model parameter, in declaration order.
    pub params: Vec<f64>,
    pub sse: f64,
    pub rmse: f64,
    pub iterations: usize,
}

/// A file paired with its fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFit {
    pub path: PathBuf,
    pub fit: FitResult,
}

/// The stage at which a file dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipStage {
    Load,
    Fit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skip {
    pub path: PathBuf,
    pub stage: SkipStage,
    pub reason: String,
}

/// Outputs of a batch run, in processing order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub files: usize,
    pub fits: Vec<FileFit>,
    pub skipped: Vec<Skip>,
    pub images: Vec<PathBuf>,
    pub aggregate: Option<PathBuf>,
}
