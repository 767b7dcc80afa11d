// VoiceMerge - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation between layers.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for VoiceMerge operations that abort the run.
/// Errors are categorised by the subsystem that produced them.
///
/// Ingestion failures only reject one batch and stay `IngestError`.
#[derive(Debug)]
pub enum VoiceMergeError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Export operation failed.
    Export(ExportError),

    /// An input CSV file could not be read or tokenised.
    Csv { path: PathBuf, source: csv::Error },

    /// An input file exceeds the maximum accepted size.
    InputTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for VoiceMergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Csv { path, source } => {
                write!(f, "Cannot read CSV '{}': {source}", path.display())
            }
            Self::InputTooLarge { path, size, max } => write!(
                f,
                "Input '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for VoiceMergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::InputTooLarge { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row faults
// ---------------------------------------------------------------------------

/// The specific reason a single row could not be normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFault {
    /// The row ends before a required positional field.
    MissingField { field: &'static str, index: usize },

    /// A required field is present but blank.
    EmptyField { field: &'static str },

    /// A date field is not in an accepted date-time form.
    InvalidTimestamp { field: &'static str, raw: String },

    /// A numeric field is not a non-negative integer.
    InvalidInteger { field: &'static str, raw: String },

    /// `firstDate` is later than `lastDate`.
    InvertedDateRange { first: String, last: String },
}

impl fmt::Display for RowFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field, index } => {
                write!(f, "missing field '{field}' (column {})", index + 1)
            }
            Self::EmptyField { field } => write!(f, "required field '{field}' is empty"),
            Self::InvalidTimestamp { field, raw } => {
                write!(f, "cannot parse '{field}' value '{raw}' as a date-time")
            }
            Self::InvalidInteger { field, raw } => {
                write!(f, "'{field}' value '{raw}' is not a non-negative integer")
            }
            Self::InvertedDateRange { first, last } => {
                write!(f, "first date {first} is after last date {last}")
            }
        }
    }
}

/// A row that the normaliser rejected, carried together with its fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRow {
    /// The offending row exactly as supplied.
    pub row: Vec<String>,

    /// Why the row was rejected.
    pub fault: RowFault,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in row [{}]", self.fault, self.row.join(", "))
    }
}

impl std::error::Error for MalformedRow {}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors that reject a whole batch. None of them leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// A batch with this source name was already ingested this session.
    DuplicateFile { name: String },

    /// A surviving row failed normalisation; the batch was discarded.
    MalformedRow {
        /// 1-based position of the row within the submitted batch.
        row_number: usize,
        source: MalformedRow,
    },

    /// Any other failure (unreadable input, session cap reached, ...).
    Unexpected { reason: String },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateFile { name } => {
                write!(f, "File '{name}' has already been uploaded")
            }
            Self::MalformedRow { row_number, source } => {
                write!(f, "Row {row_number} is malformed: {source}")
            }
            Self::Unexpected { reason } => write!(f, "Unexpected error: {reason}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedRow { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum entry count.
    TooManyEntries { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyEntries { count, max } => write!(
                f,
                "Export of {count} entries exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for VoiceMergeError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for VoiceMergeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for VoiceMerge results.
pub type Result<T> = std::result::Result<T, VoiceMergeError>;
