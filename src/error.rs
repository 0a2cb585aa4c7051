//! Error types.
//!
//! `AppError` is the run-level error: it carries the process exit code and a
//! human-readable message and is what `main` reports. Per-file failures are
//! typed (`LoadError`, `FitError`) so the batch loop can decide whether to
//! skip the file or abort the run.

use thiserror::Error;

/// Exit code for filesystem failures (image / aggregate writes).
pub const EXIT_IO: u8 = 2;
/// Exit code for a fitting failure under the abort policy.
pub const EXIT_FIT: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Why a single input file could not be turned into an `(x, y)` data set.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),

    #[error("failed to read file: {0}")]
    Read(#[source] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("non-numeric value {token:?} on line {line}, column {column}")]
    NonNumeric {
        line: u64,
        column: usize,
        token: String,
    },

    #[error("line {line} has {found} column(s), at least 2 are required")]
    TooFewColumns { line: u64, found: usize },

    #[error("line {line} has {found} column(s), expected {expected}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("transformed value on line {line} is not finite")]
    NonFinite { line: u64 },

    #[error("no data rows after the header")]
    NoData,
}

/// Why a model could not be fitted to a data set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("{points} data point(s) cannot determine {params} parameter(s)")]
    Underdetermined { points: usize, params: usize },

    #[error("x has {x} value(s) but y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("initial guess has {found} value(s), model has {expected} parameter(s)")]
    InitialGuess { expected: usize, found: usize },

    #[error("model produced a non-finite value")]
    NonFinite,

    #[error("normal equations are singular")]
    Singular,

    #[error("solver did not converge after {iterations} iteration(s)")]
    NotConverged { iterations: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_keeps_exit_code_and_message() {
        let e = AppError::new(EXIT_FIT, "fit failed");
        assert_eq!(e.exit_code(), 4);
        assert_eq!(e.to_string(), "fit failed");
    }

    #[test]
    fn load_error_display_names_the_line() {
        let e = LoadError::NonNumeric {
            line: 3,
            column: 1,
            token: "abc".to_string(),
        };
        assert_eq!(e.to_string(), r#"non-numeric value "abc" on line 3, column 1"#);
    }

    #[test]
    fn fit_error_display_underdetermined() {
        let e = FitError::Underdetermined { points: 1, params: 2 };
        assert_eq!(e.to_string(), "1 data point(s) cannot determine 2 parameter(s)");
    }
}
