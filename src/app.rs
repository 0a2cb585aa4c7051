//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - initializes logging
//! - parses CLI arguments
//! - expands the glob patterns into CSV paths
//! - runs the batch with the built-in configuration

use clap::Parser;

use crate::domain::BatchConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `csvfit` binary.
pub fn run() -> Result<(), AppError> {
    init_logging();

    let cli = crate::cli::Cli::parse();
    let files = crate::io::discover_csv_files(cli.patterns.as_slice());
    let config = BatchConfig::default();

    let report = pipeline::run_batch(&config, &files)?;
    log::info!(
        "{} file(s): {} plotted, {} fitted, {} skipped",
        report.files,
        report.images.len(),
        report.fits.len(),
        report.skipped.len()
    );

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).try_init();
}
