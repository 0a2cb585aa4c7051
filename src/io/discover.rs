//! Input discovery: expand glob patterns into CSV file paths.
//!
//! Every argument is treated as a pattern. Matches are kept in the order the
//! patterns were given (and, within a pattern, in the order `glob` yields
//! them); duplicates across patterns are not removed. As in a shell,
//! wildcards do not match a leading `.`; dotfiles need an explicit `.`.

use std::path::PathBuf;

use glob::MatchOptions;

/// Only paths ending in this literal (case-sensitive) suffix are processed.
pub const CSV_SUFFIX: &str = ".csv";

/// Expand every pattern and keep the `.csv` matches.
///
/// Invalid patterns and unreadable entries are logged and contribute no
/// matches.
pub fn discover_csv_files<S: AsRef<str>>(patterns: &[S]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let entries = match glob::glob_with(pattern, options) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring invalid pattern {pattern:?}: {e}");
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(path) if is_csv(&path) => files.push(path),
                Ok(path) => log::debug!("Ignoring non-CSV path {}", path.display()),
                Err(e) => log::debug!("Ignoring unreadable path: {e}"),
            }
        }
    }
    files
}

fn is_csv(path: &std::path::Path) -> bool {
    path.to_string_lossy().ends_with(CSV_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn keeps_only_csv_matches_in_pattern_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.csv", "notes.txt", "upper.CSV", ".hidden.csv"] {
            fs::write(dir.path().join(name), "x,y\n1,2\n").unwrap();
        }

        let all = format!("{}/*", dir.path().display());
        let b = dir.path().join("b.csv").display().to_string();
        let files = discover_csv_files(&[b.clone(), all]);

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["b.csv", "a.csv", "b.csv"]);
    }

    #[test]
    fn dotfiles_need_an_explicit_dot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden.csv"), "x,y\n1,2\n").unwrap();

        let wildcard = format!("{}/*.csv", dir.path().display());
        assert!(discover_csv_files(&[wildcard]).is_empty());

        let explicit = format!("{}/.*.csv", dir.path().display());
        assert_eq!(discover_csv_files(&[explicit]), vec![dir.path().join(".hidden.csv")]);
    }

    #[test]
    fn no_matches_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.csv", dir.path().display());
        assert!(discover_csv_files(&[pattern]).is_empty());
        assert!(discover_csv_files::<&str>(&[]).is_empty());
    }

    #[test]
    fn invalid_pattern_is_skipped() {
        assert!(discover_csv_files(&["[unclosed"]).is_empty());
    }
}
