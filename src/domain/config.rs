//! Batch configuration.
//!
//! The binary runs with `BatchConfig::default()`; there are no flags. The
//! struct exists so the pipeline takes its settings explicitly and tests can
//! vary them per run.

use std::path::PathBuf;

use crate::math::LmOptions;
use crate::models::Model;

/// Optional manipulation applied to each `(x, y)` pair after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataTransform {
    #[default]
    None,
    /// `x * 60` (minutes to seconds).
    MinutesToSeconds,
    /// `ln(y)`.
    LogY,
}

impl DataTransform {
    pub fn apply(self, x: f64, y: f64) -> (f64, f64) {
        match self {
            DataTransform::None => (x, y),
            DataTransform::MinutesToSeconds => (x * 60.0, y),
            DataTransform::LogY => (x, y.ln()),
        }
    }
}

/// What to do when a loaded file cannot be fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitErrorPolicy {
    /// Report the failure, still plot the raw data, and continue.
    #[default]
    Skip,
    /// Stop the batch.
    Abort,
}

/// Figure appearance.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub x_label: String,
    pub y_label: String,
    /// Fixed x range; `None` uses the data extent.
    pub x_range: Option<(f64, f64)>,
    /// Fixed y range; `None` uses the data (and fit) extent.
    pub y_range: Option<(f64, f64)>,
    pub legend: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            x_label: "X axis / units".to_string(),
            y_label: "Y axis / units".to_string(),
            x_range: None,
            y_range: None,
            legend: false,
            width: 640,
            height: 480,
        }
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Fit `model` to every loaded file.
    pub fit: bool,
    /// Write the aggregate parameter table. Ignored unless `fit` is set.
    pub output: bool,
    pub model: Model,
    pub transform: DataTransform,
    pub on_fit_error: FitErrorPolicy,
    /// Inserted before the extension of every output file name.
    pub suffix: String,
    pub image_extension: String,
    /// Aggregate table path without suffix or extension.
    pub aggregate_base: PathBuf,
    pub aggregate_extension: String,
    pub plot: PlotStyle,
    pub solver: LmOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            fit: false,
            output: false,
            model: Model::linear(),
            transform: DataTransform::None,
            on_fit_error: FitErrorPolicy::Skip,
            suffix: "_output".to_string(),
            image_extension: "png".to_string(),
            aggregate_base: PathBuf::from("fit_data"),
            aggregate_extension: "csv".to_string(),
            plot: PlotStyle::default(),
            solver: LmOptions::default(),
        }
    }
}

impl BatchConfig {
    /// Aggregate output only makes sense when there are fits to collect.
    pub fn aggregate_enabled(&self) -> bool {
        self.output && self.fit
    }

    /// `<aggregate_base><suffix>.<aggregate_extension>`
    pub fn aggregate_path(&self) -> PathBuf {
        let mut name = self.aggregate_base.clone().into_os_string();
        name.push(&self.suffix);
        name.push(".");
        name.push(&self.aggregate_extension);
        PathBuf::from(name)
    }
}
