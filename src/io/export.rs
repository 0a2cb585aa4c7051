//! Output naming and the aggregate parameter table.
//!
//! The aggregate table is meant to be easy to consume in spreadsheets or
//! downstream scripts: one row per fitted file, header
//! `File Name,<param1>,<param2>,...`.

use std::path::{Path, PathBuf};

use crate::domain::FileFit;
use crate::error::{AppError, EXIT_IO};

/// Header of the file-name column in the aggregate table.
pub const FILE_NAME_HEADER: &str = "File Name";

/// Output path for an input file: extension replaced by `<suffix>.<extension>`.
///
/// `data/run1.csv` with suffix `_output` and extension `png` becomes
/// `data/run1_output.png`, next to the input.
pub fn output_path(input: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// Header record for the aggregate table.
pub fn aggregate_header(param_names: &[String]) -> Vec<String> {
    std::iter::once(FILE_NAME_HEADER.to_string())
        .chain(param_names.iter().cloned())
        .collect()
}

/// Write the aggregate table, replacing any existing file at `path`.
pub fn write_aggregate_csv(
    path: &Path,
    param_names: &[String],
    fits: &[FileFit],
) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_path(path)
        .map_err(|e| {
            AppError::new(EXIT_IO, format!("Failed to create '{}': {e}", path.display()))
        })?;

    writer
        .write_record(aggregate_header(param_names))
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write aggregate header: {e}")))?;

    for fit in fits {
        let row = std::iter::once(fit.path.display().to_string())
            .chain(fit.fit.params.iter().map(|v| format!("{v:?}")));
        writer
            .write_record(row)
            .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write aggregate row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_IO, format!("Failed to write '{}': {e}", path.display())))?;

    Ok(())
}
