// VoiceMerge - core/table.rs
//
// Table view engine: column set plus sort, filter and pagination state.
// Core layer: pure logic, no I/O.
//
// The engine holds view state only. Row order is derived from the entry
// slice on every `view` call, so entries appended since the last call are
// always included and the current page is clamped against the live count.

use crate::core::column::{default_columns, ColumnId, ColumnSpec, SortKey};
use crate::core::filter::{apply_filters, ColumnFilter, FilterState};
use crate::core::model::Entry;
use crate::core::page_window::{self, PageMarker};
use crate::util::constants::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// Sort direction for the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// The single active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// Snap a requested page size to the nearest offered size (ties go to the
/// smaller one).
pub fn snap_page_size(requested: usize) -> usize {
    PAGE_SIZE_OPTIONS
        .iter()
        .copied()
        .min_by_key(|opt| (opt.abs_diff(requested), *opt))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Number of pages needed for `rows` rows; never less than 1.
pub fn page_count(rows: usize, page_size: usize) -> usize {
    rows.div_ceil(page_size.max(1)).max(1)
}

/// Stable sort of `rows` (indices into `entries`) by one column.
///
/// Keys are extracted once per row. Rows with equal keys keep their
/// incoming order in both directions.
pub fn sort_rows(
    entries: &[Entry],
    rows: &mut Vec<usize>,
    spec: &ColumnSpec,
    direction: SortDirection,
) {
    let mut keyed: Vec<(usize, SortKey)> = rows
        .iter()
        .map(|&idx| (idx, spec.value(&entries[idx]).into_sort_key()))
        .collect();
    keyed.sort_by(|(_, a), (_, b)| match direction {
        SortDirection::Ascending => a.cmp(b),
        SortDirection::Descending => b.cmp(a),
    });
    *rows = keyed.into_iter().map(|(idx, _)| idx).collect();
}

/// Sort, filter and pagination state over a column set.
#[derive(Debug, Clone)]
pub struct TableEngine {
    columns: Vec<ColumnSpec>,
    sort: Option<SortState>,
    filters: FilterState,
    page_size: usize,

    /// Requested zero-based page; clamped whenever a view is derived.
    page_index: usize,
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::new(default_columns())
    }
}

impl TableEngine {
    /// Engine over the given columns with no sort, no filters and the
    /// default page size.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            sort: None,
            filters: FilterState::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
        }
    }

    // -------------------------------------------------------------------------
    // State accessors
    // -------------------------------------------------------------------------

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Active filter on one column, if any.
    pub fn filter(&self, column: ColumnId) -> Option<&ColumnFilter> {
        self.filters.get(column)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Derive the filtered -> sorted -> paged view of `entries`.
    pub fn view<'e>(&self, entries: &'e [Entry]) -> TableView<'e> {
        let mut rows = apply_filters(entries, &self.columns, &self.filters);
        if let Some(sort) = self.sort {
            if let Some(spec) = self.column(sort.column) {
                sort_rows(entries, &mut rows, spec, sort.direction);
            }
        }
        let pages = page_count(rows.len(), self.page_size);
        let page_index = self.page_index.min(pages - 1);

        tracing::debug!(
            total = entries.len(),
            rows = rows.len(),
            page = page_index,
            pages,
            "Table view derived"
        );

        TableView {
            entries,
            rows,
            page_size: self.page_size,
            page_index,
        }
    }

    fn page_count_for(&self, entries: &[Entry]) -> usize {
        let matching = apply_filters(entries, &self.columns, &self.filters).len();
        page_count(matching, self.page_size)
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Set or clear the filter on `column`, then return to the first page.
    ///
    /// A filter whose kind differs from the column's declared kind, or one on
    /// a column the engine does not have, is ignored.
    pub fn set_filter(&mut self, column: ColumnId, filter: ColumnFilter) {
        let Some(spec) = self.column(column) else {
            tracing::warn!(column = %column, "Ignoring filter on unknown column");
            return;
        };
        if spec.filter_kind != filter.kind() {
            tracing::warn!(
                column = %column,
                expected = ?spec.filter_kind,
                got = ?filter.kind(),
                "Ignoring filter of the wrong kind"
            );
            return;
        }
        self.filters.set(column, filter);
        self.page_index = 0;
    }

    /// Set (`Some`) or clear (`None`) the sort, then return to the first page.
    pub fn set_sort(&mut self, column: ColumnId, direction: Option<SortDirection>) {
        if self.column(column).is_none() {
            tracing::warn!(column = %column, "Ignoring sort on unknown column");
            return;
        }
        self.sort = direction.map(|direction| SortState { column, direction });
        self.page_index = 0;
    }

    /// Change the page size (snapped to an offered size). The current page
    /// is kept and clamped, not reset.
    pub fn set_page_size(&mut self, entries: &[Entry], size: usize) {
        let snapped = snap_page_size(size);
        if snapped != size {
            tracing::debug!(requested = size, snapped, "Page size snapped");
        }
        self.page_size = snapped;
        self.page_index = self.page_index.min(self.page_count_for(entries) - 1);
    }

    /// Jump to a zero-based page, clamped into range.
    pub fn set_page(&mut self, entries: &[Entry], index: usize) {
        self.page_index = index.min(self.page_count_for(entries) - 1);
    }

    pub fn first_page(&mut self) {
        self.page_index = 0;
    }

    pub fn previous_page(&mut self, entries: &[Entry]) {
        let current = self.page_index.min(self.page_count_for(entries) - 1);
        self.page_index = current.saturating_sub(1);
    }

    pub fn next_page(&mut self, entries: &[Entry]) {
        self.set_page(entries, self.page_index.saturating_add(1));
    }

    pub fn last_page(&mut self, entries: &[Entry]) {
        self.set_page(entries, usize::MAX);
    }
}

/// One derived snapshot of the table over a borrowed entry slice.
#[derive(Debug)]
pub struct TableView<'e> {
    entries: &'e [Entry],
    rows: Vec<usize>,
    page_size: usize,
    page_index: usize,
}

impl<'e> TableView<'e> {
    /// Filtered and sorted row indices across all pages.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows surviving the filters.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), self.page_size)
    }

    /// Zero-based current page, always within `0..page_count`.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// Row indices on the current page.
    pub fn visible_rows(&self) -> &[usize] {
        let start = (self.page_index * self.page_size).min(self.rows.len());
        let end = (start + self.page_size).min(self.rows.len());
        &self.rows[start..end]
    }

    /// Entries on the current page, in display order.
    pub fn visible(&self) -> Vec<&'e Entry> {
        self.resolve(self.visible_rows())
    }

    /// Every filtered entry across all pages, in display order.
    pub fn all_rows(&self) -> Vec<&'e Entry> {
        self.resolve(&self.rows)
    }

    fn resolve(&self, rows: &[usize]) -> Vec<&'e Entry> {
        let entries = self.entries;
        rows.iter().filter_map(|&idx| entries.get(idx)).collect()
    }

    /// Page controls for the current page.
    pub fn page_window(&self) -> Vec<PageMarker> {
        page_window::render(self.page_count(), self.page_index + 1)
    }

    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }
}
