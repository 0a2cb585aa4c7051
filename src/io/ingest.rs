//! CSV ingest.
//!
//! Turns one comma-delimited file into an `(x, y)` data set:
//!
//! - the first physical line is a header and is discarded unread, whatever
//!   it holds (blank or `#` lines included)
//! - every other row must hold at least two numeric fields; the first two are
//!   `x` and `y`, further columns are checked but otherwise ignored
//! - all rows must have the same number of fields
//! - after the header, blank lines and `#` comment lines are skipped
//!
//! Any violation fails the whole file; the batch loop decides what to do with
//! the error.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DataSet, DataTransform};
use crate::error::LoadError;

/// Load `(x, y)` from the CSV file at `path`.
pub fn load_xy(path: &Path, transform: DataTransform) -> Result<DataSet, LoadError> {
    let file = File::open(path).map_err(LoadError::Open)?;
    read_xy(file, path, transform)
}

/// Load `(x, y)` from any reader; `path` is recorded on the result.
pub fn read_xy<R: Read>(
    reader: R,
    path: &Path,
    transform: DataTransform,
) -> Result<DataSet, LoadError> {
    let mut reader = BufReader::new(reader);
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header).map_err(LoadError::Read)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut expected_columns: Option<usize> = None;
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        // Positions restart after the header line.
        let line = record.position().map(|p| p.line() + 1).unwrap_or(0);

        let found = record.len();
        if found < 2 {
            return Err(LoadError::TooFewColumns { line, found });
        }
        let expected = *expected_columns.get_or_insert(found);
        if found != expected {
            return Err(LoadError::RaggedRow { line, expected, found });
        }

        let mut values = [0.0f64; 2];
        for (column, field) in record.iter().enumerate() {
            let value = parse_number(field).ok_or_else(|| LoadError::NonNumeric {
                line,
                column: column + 1,
                token: field.to_string(),
            })?;
            if column < 2 {
                values[column] = value;
            }
        }

        let (xv, yv) = transform.apply(values[0], values[1]);
        if transform != DataTransform::None && !(xv.is_finite() && yv.is_finite()) {
            return Err(LoadError::NonFinite { line });
        }
        x.push(xv);
        y.push(yv);
    }

    if x.is_empty() {
        return Err(LoadError::NoData);
    }

    Ok(DataSet {
        path: path.to_path_buf(),
        x,
        y,
    })
}

fn parse_number(field: &str) -> Option<f64> {
    field.parse::<f64>().ok()
}
