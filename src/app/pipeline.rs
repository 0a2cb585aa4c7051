//! The batch loop.
//!
//! For every discovered file, in order:
//! load -> (fit) -> plot
//! and, once all files are done, the optional aggregate table.
//!
//! Load failures always skip the file. Fit failures follow
//! `BatchConfig::on_fit_error`. Write failures abort the run; files already
//! written stay on disk.

use std::path::{Path, PathBuf};

use crate::domain::{
    BatchConfig, BatchReport, DataSet, FileFit, FitErrorPolicy, FitResult, Skip, SkipStage,
};
use crate::error::{AppError, EXIT_FIT};
use crate::fit::fit_data;
use crate::io::{load_xy, output_path, write_aggregate_csv};
use crate::plot::{Figure, render_png};

/// Run the batch over `files` and return what was produced.
pub fn run_batch(config: &BatchConfig, files: &[PathBuf]) -> Result<BatchReport, AppError> {
    let total = files.len();
    println!("A total of {total} csv files will be processed. Any other files will be ignored.");

    let mut report = BatchReport {
        files: total,
        ..BatchReport::default()
    };

    for (idx, path) in files.iter().enumerate() {
        println!("Processing file {} of {}", idx + 1, total);

        let data = match load_xy(path, config.transform) {
            Ok(data) => data,
            Err(e) => {
                println!(
                    "Could not process file {}. {e}. It has been skipped.",
                    path.display()
                );
                log::warn!("Skipped {}: {e}", path.display());
                report.skipped.push(Skip {
                    path: path.clone(),
                    stage: SkipStage::Load,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        log::debug!("Loaded {} point(s) from {}", data.len(), path.display());

        let fit = if config.fit {
            fit_file(config, &data, &mut report)?
        } else {
            None
        };

        let image = output_path(path, &config.suffix, &config.image_extension);
        plot_file(config, &data, fit.as_ref(), &image)?;
        log::info!("Wrote plot {}", image.display());
        report.images.push(image);

        if let Some(fit) = fit {
            report.fits.push(FileFit {
                path: path.clone(),
                fit,
            });
        }
    }

    if config.aggregate_enabled() && !report.fits.is_empty() {
        let path = config.aggregate_path();
        write_aggregate_csv(&path, config.model.param_names(), &report.fits)?;
        log::info!("Wrote {} fit(s) to {}", report.fits.len(), path.display());
        report.aggregate = Some(path);
    }

    if total > 0 {
        println!("All files processed");
    }

    Ok(report)
}

/// Fit one data set, applying the configured failure policy.
fn fit_file(
    config: &BatchConfig,
    data: &DataSet,
    report: &mut BatchReport,
) -> Result<Option<FitResult>, AppError> {
    match fit_data(&config.model, data, &config.solver) {
        Ok(fit) => {
            log::debug!(
                "Fitted {} to {}: params={:?} rmse={:.6} iterations={}",
                config.model.name(),
                data.path.display(),
                fit.params,
                fit.rmse,
                fit.iterations
            );
            Ok(Some(fit))
        }
        Err(e) => match config.on_fit_error {
            FitErrorPolicy::Abort => Err(AppError::new(
                EXIT_FIT,
                format!("Failed to fit '{}': {e}", data.path.display()),
            )),
            FitErrorPolicy::Skip => {
                println!(
                    "Could not fit file {}. {e}. Only the data has been plotted.",
                    data.path.display()
                );
                log::warn!("Fit failed for {}: {e}", data.path.display());
                report.skipped.push(Skip {
                    path: data.path.clone(),
                    stage: SkipStage::Fit,
                    reason: e.to_string(),
                });
                Ok(None)
            }
        },
    }
}

fn plot_file(
    config: &BatchConfig,
    data: &DataSet,
    fit: Option<&FitResult>,
    image: &Path,
) -> Result<(), AppError> {
    let points = data.points();
    let curve: Option<Vec<(f64, f64)>> = fit.map(|fit| {
        data.x
            .iter()
            .zip(config.model.predict(&data.x, &fit.params))
            .map(|(&x, y)| (x, y))
            .collect()
    });
    let title = data.path.display().to_string();

    render_png(
        image,
        &Figure {
            title: &title,
            data: &points,
            fit: curve.as_deref(),
            style: &config.plot,
        },
    )
}
