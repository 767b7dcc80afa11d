// VoiceMerge - core/ingest.rs
//
// Validates a batch of raw rows and merges it into the session's entries
// and file-batch registry.
// Core layer: pure logic, no I/O.
//
// A batch is all-or-nothing: a duplicate source name or any row that fails
// normalisation leaves the dataset exactly as it was before the call.

use crate::core::model::{Entry, FileBatch};
use crate::core::normalize::{is_blank_row, normalize};
use crate::util::constants::MAX_TOTAL_ENTRIES;
use crate::util::error::IngestError;

/// Entries and file batches accumulated over one session.
///
/// Append-only: entries keep insertion order across uploads and are never
/// removed or edited. Batches are kept most-recent-first.
#[derive(Debug, Default)]
pub struct Dataset {
    entries: Vec<Entry>,
    batches: Vec<FileBatch>,
    max_entries: Option<usize>,
}

impl Dataset {
    /// Empty dataset bounded by `MAX_TOTAL_ENTRIES`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty dataset with a custom entry cap.
    pub fn with_capacity_limit(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::default()
        }
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Registered file batches, most recently added first.
    pub fn batches(&self) -> &[FileBatch] {
        &self.batches
    }

    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// True if a batch with exactly this name was already ingested.
    pub fn contains_batch(&self, name: &str) -> bool {
        self.batches.iter().any(|b| b.name == name)
    }

    /// Ingest a batch of raw rows.
    ///
    /// Rows with fewer than two non-empty fields are dropped silently and do
    /// not count towards the returned total. When `source_name` is given a
    /// `FileBatch` is registered for it, even if every row was blank.
    ///
    /// Returns the number of entries appended.
    pub fn ingest(
        &mut self,
        rows: &[Vec<String>],
        source_name: Option<&str>,
    ) -> Result<usize, IngestError> {
        if let Some(name) = source_name {
            if self.contains_batch(name) {
                tracing::warn!(source = name, "Rejected duplicate upload");
                return Err(IngestError::DuplicateFile {
                    name: name.to_string(),
                });
            }
        }

        let mut added = Vec::with_capacity(rows.len());
        let mut dropped = 0usize;
        for (idx, row) in rows.iter().enumerate() {
            if is_blank_row(row) {
                dropped += 1;
                continue;
            }
            let entry = normalize(row).map_err(|source| {
                tracing::warn!(
                    source_name = source_name.unwrap_or("<unnamed>"),
                    row_number = idx + 1,
                    fault = %source.fault,
                    "Rejected batch: malformed row"
                );
                IngestError::MalformedRow {
                    row_number: idx + 1,
                    source,
                }
            })?;
            added.push(entry);
        }

        let limit = self.max_entries.unwrap_or(MAX_TOTAL_ENTRIES);
        if self.entries.len() + added.len() > limit {
            return Err(IngestError::Unexpected {
                reason: format!(
                    "batch of {} entries would exceed the session limit of {limit}",
                    added.len()
                ),
            });
        }

        let count = added.len();
        if let Some(name) = source_name {
            self.batches.insert(0, FileBatch::new(name, &added));
        }
        self.entries.append(&mut added);

        tracing::info!(
            source = source_name.unwrap_or("<unnamed>"),
            added = count,
            dropped,
            total = self.entries.len(),
            "Batch ingested"
        );
        Ok(count)
    }
}
