// VoiceMerge - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Config validation and the core layer both read from here.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "VoiceMerge";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "VoiceMerge";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Row normalisation
// =============================================================================

/// Number of positional fields an export row must carry.
pub const ROW_FIELD_COUNT: usize = 9;

/// Rows with fewer non-empty fields than this are blank placeholders and are
/// dropped before normalisation.
pub const MIN_NON_EMPTY_FIELDS: usize = 2;

/// Zone-less date-time layouts accepted from the export (interpreted as UTC).
/// Tried in order after RFC 3339 fails.
pub const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts accepted when the value is not strict RFC 3339
/// (RFC 3339 requires seconds; exports sometimes omit them).
pub const OFFSET_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

// =============================================================================
// Session limits
// =============================================================================

/// Hard upper bound on the number of entries held by one session.
///
/// A batch that would push the session past this cap is rejected as a whole.
pub const MAX_TOTAL_ENTRIES: usize = 1_000_000;

/// Maximum size of a single CSV file accepted by the file reader.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MB

// =============================================================================
// Table view
// =============================================================================

/// Page sizes offered by the table. Any other requested size snaps to the
/// nearest of these.
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 30, 40, 50];

/// Page size used until the user or config picks another.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page numbers within this distance of the current page are always shown
/// in the page window.
pub const PAGE_WINDOW_RADIUS: usize = 2;

// =============================================================================
// Input
// =============================================================================

/// Default field delimiter for export files.
pub const DEFAULT_DELIMITER: u8 = b',';

/// Whether export files start with a header row by default.
pub const DEFAULT_HAS_HEADERS: bool = true;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of entries that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 5_000_000;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
