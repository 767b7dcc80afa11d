// VoiceMerge - platform/csv_source.rs
//
// Reads an export file from disk into raw rows for ingestion.
// The only place that touches input files; everything downstream works on
// plain `Vec<Vec<String>>`.

use crate::util::constants::{DEFAULT_DELIMITER, DEFAULT_HAS_HEADERS, MAX_INPUT_FILE_SIZE};
use crate::util::error::{Result, VoiceMergeError};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How input files are tokenised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_headers: DEFAULT_HAS_HEADERS,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

/// Read every record of a CSV file as a row of strings.
///
/// Records may have differing lengths; short rows are left for the
/// normaliser to reject.
pub fn read_rows(path: &Path, options: CsvOptions) -> Result<Vec<Vec<String>>> {
    let io_err = |operation: &'static str, source: std::io::Error| VoiceMergeError::Io {
        path: path.to_path_buf(),
        operation,
        source,
    };

    let size = std::fs::metadata(path)
        .map_err(|e| io_err("stat", e))?
        .len();
    if size > MAX_INPUT_FILE_SIZE {
        return Err(VoiceMergeError::InputTooLarge {
            path: path.to_path_buf(),
            size,
            max: MAX_INPUT_FILE_SIZE,
        });
    }

    let file = File::open(path).map_err(|e| io_err("open", e))?;
    let rows = read_rows_from(file, options).map_err(|source| VoiceMergeError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = rows.len(), bytes = size, "CSV file read");
    Ok(rows)
}

/// Tokenise CSV from any reader.
pub fn read_rows_from<R: Read>(
    reader: R,
    options: CsvOptions,
) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    csv_reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}
