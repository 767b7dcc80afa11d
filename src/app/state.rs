// VoiceMerge - app/state.rs
//
// Application state management. Holds the ingested entries and file
// batches, the table view state, and the single active error message.
// The table view is derived from the current entries on every read.

use crate::core::column::ColumnId;
use crate::core::export;
use crate::core::filter::ColumnFilter;
use crate::core::ingest::Dataset;
use crate::core::model::{Entry, FileBatch};
use crate::core::table::{SortDirection, TableEngine, TableView};
use crate::platform::config::AppConfig;
use crate::platform::csv_source::{self, CsvOptions};
use crate::util::error::{ExportError, IngestError};
use std::io::Write;
use std::path::Path;

/// Output format for `AppState::export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// All entries and file batches ingested this session.
    dataset: Dataset,

    /// Sort/filter/page state over `dataset`'s entries.
    table: TableEngine,

    /// Most recent ingestion error, replaced by the next one.
    error: Option<String>,

    /// How input files are tokenised.
    csv_options: CsvOptions,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    /// Create initial state from validated configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_dataset(Dataset::new(), config)
    }

    /// Create initial state around an existing (usually empty) dataset.
    pub fn with_dataset(dataset: Dataset, config: &AppConfig) -> Self {
        let mut table = TableEngine::default();
        table.set_page_size(dataset.entries(), config.page_size);
        Self {
            dataset,
            table,
            error: None,
            csv_options: CsvOptions {
                has_headers: config.has_headers,
                delimiter: config.delimiter,
            },
        }
    }

    // -------------------------------------------------------------------------
    // Ingestion
    // -------------------------------------------------------------------------

    /// Ingest a parsed batch of rows.
    ///
    /// On failure the error's message becomes the active error and the
    /// dataset is unchanged. A success leaves any earlier error in place
    /// until it is dismissed.
    pub fn ingest(
        &mut self,
        rows: &[Vec<String>],
        source_name: Option<&str>,
    ) -> Result<usize, IngestError> {
        self.dataset
            .ingest(rows, source_name)
            .map_err(|e| self.record_error(e))
    }

    /// Read a CSV export from disk and ingest it under its file name.
    pub fn ingest_file(&mut self, path: &Path) -> Result<usize, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Reject duplicates before paying for the read.
        if self.dataset.contains_batch(&name) {
            return Err(self.record_error(IngestError::DuplicateFile { name }));
        }

        let rows = match csv_source::read_rows(path, self.csv_options) {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input file");
                return Err(self.record_error(IngestError::Unexpected {
                    reason: e.to_string(),
                }));
            }
        };
        self.ingest(&rows, Some(&name))
    }

    fn record_error(&mut self, e: IngestError) -> IngestError {
        self.error = Some(e.to_string());
        e
    }

    /// The single active error message, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn entries(&self) -> &[Entry] {
        self.dataset.entries()
    }

    /// File batches, most recently added first.
    pub fn batches(&self) -> &[FileBatch] {
        self.dataset.batches()
    }

    // -------------------------------------------------------------------------
    // Table view
    // -------------------------------------------------------------------------

    pub fn table(&self) -> &TableEngine {
        &self.table
    }

    /// The filtered, sorted and paged view of the current entries.
    pub fn view(&self) -> TableView<'_> {
        self.table.view(self.dataset.entries())
    }

    pub fn set_filter(&mut self, column: ColumnId, filter: ColumnFilter) {
        self.table.set_filter(column, filter);
    }

    pub fn set_sort(&mut self, column: ColumnId, direction: Option<SortDirection>) {
        self.table.set_sort(column, direction);
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.table.set_page_size(self.dataset.entries(), size);
    }

    /// Jump to a zero-based page (clamped).
    pub fn set_page(&mut self, index: usize) {
        self.table.set_page(self.dataset.entries(), index);
    }

    /// Entries on the current page, in display order.
    pub fn visible_entries(&self) -> Vec<&Entry> {
        self.view().visible()
    }

    /// Export every filtered row (all pages) in the current sort order.
    pub fn export<W: Write>(
        &self,
        format: ExportFormat,
        writer: W,
        export_path: &Path,
    ) -> Result<usize, ExportError> {
        let rows = self.view().all_rows();
        match format {
            ExportFormat::Csv => export::export_csv(&rows, writer, export_path),
            ExportFormat::Json => export::export_json(&rows, writer, export_path),
        }
    }
}
