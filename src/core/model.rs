// VoiceMerge - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::Serialize;

// =============================================================================
// Entry (normalised output of one export row)
// =============================================================================

/// One call-log record after matching and validation.
///
/// Entries are only built by the normaliser and never mutated afterwards;
/// `first_date <= last_date` holds for every instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Phone number exactly as it appeared in the export.
    pub original_phone_number: String,

    /// Canonical number resolved during contact matching.
    pub phone_number: String,

    /// Contact display name. Empty when the number matched no contact.
    pub name: String,

    /// Earliest call timestamp for this number.
    pub first_date: DateTime<Utc>,

    /// Latest call timestamp for this number.
    pub last_date: DateTime<Utc>,

    /// Length of the phone-number match against the contact (0 = unmatched).
    #[serde(rename = "match")]
    pub match_length: u64,

    /// Source location of the record inside the export archive.
    pub path: String,

    /// Size of the record file in bytes.
    pub file_size: u64,

    /// Size of attached media in bytes.
    pub media_size: u64,

    /// Combined size shown in the table.
    pub size: u64,
}

impl Entry {
    /// First segment of `path`, split on `/` or `\`.
    ///
    /// Empty segments produced by a leading separator are skipped; when the
    /// path has no separator at all the whole path is returned.
    pub fn label(&self) -> &str {
        path_label(&self.path)
    }
}

/// See [`Entry::label`].
pub fn path_label(path: &str) -> &str {
    path.split(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(path)
}

// =============================================================================
// FileBatch (one ingested source file)
// =============================================================================

/// Metadata about one ingested source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileBatch {
    /// Source name; unique within a session (case-sensitive).
    pub name: String,

    /// Number of entries this batch added.
    pub count: usize,

    /// Label of the batch's first entry, empty if the batch added none.
    pub label: String,
}

impl FileBatch {
    /// Build the batch record for a freshly ingested set of entries.
    pub fn new(name: impl Into<String>, added: &[Entry]) -> Self {
        Self {
            name: name.into(),
            count: added.len(),
            label: added
                .first()
                .map(|e| e.label().to_string())
                .unwrap_or_default(),
        }
    }
}
