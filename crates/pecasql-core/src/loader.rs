use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::model::Row;

const BOM: char = '\u{feff}';

/// How the delimited input is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub delimiter: u8,
    /// Strip surrounding whitespace from headers and values.
    pub trim: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            trim: false,
        }
    }
}

/// Read a delimited file with a header row into rows, in file order.
pub fn load_rows(path: &Path, options: &LoadOptions) -> Result<Vec<Row>> {
    let file = File::open(path).map_err(|err| {
        PipelineError::malformed(Some(path), None, format!("unreadable input: {err}"))
    })?;
    let rows = read_rows(file, options, Some(path))?;
    tracing::debug!(event = "rows_loaded", path = %path.display(), rows = rows.len());
    Ok(rows)
}

/// Same as [`load_rows`] over text the caller already holds.
pub fn parse_rows<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<Row>> {
    read_rows(reader, options, None)
}

fn read_rows<R: Read>(reader: R, options: &LoadOptions, path: Option<&Path>) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(false)
        .trim(if options.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|err| map_csv_error(err, path))?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            if idx == 0 {
                name.trim_start_matches(BOM).to_string()
            } else {
                name.to_string()
            }
        })
        .collect::<Vec<_>>();

    if headers.is_empty() || headers.iter().all(|name| name.is_empty()) {
        return Err(PipelineError::malformed(path, None, "input is empty"));
    }

    let mut seen = HashSet::new();
    for name in &headers {
        if !seen.insert(name.as_str()) {
            return Err(PipelineError::malformed(
                path,
                Some(1),
                format!("duplicate column {name} in header"),
            ));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| map_csv_error(err, path))?;
        let row = Row::from_pairs(headers.iter().map(String::as_str).zip(record.iter()));
        rows.push(row);
    }

    Ok(rows)
}

fn map_csv_error(err: csv::Error, path: Option<&Path>) -> PipelineError {
    let line = err.position().map(|pos| pos.line());
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} columns as in the header, found {len}"),
        csv::ErrorKind::Utf8 { .. } => "input is not valid UTF-8".to_string(),
        csv::ErrorKind::Io(io) => format!("unreadable input: {io}"),
        _ => err.to_string(),
    };
    PipelineError::malformed(path, line, reason)
}
