//! Command-line parsing.
//!
//! The tool takes no options of its own: every argument is a glob pattern
//! (quoted patterns are expanded by the tool, unquoted ones by the shell).

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "csvfit",
    version,
    about = "Plot (and optionally fit) two-column CSV files in bulk"
)]
pub struct Cli {
    /// Glob patterns selecting input files; only paths ending in `.csv` are used.
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,
}
