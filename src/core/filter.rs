// VoiceMerge - core/filter.rs
//
// Per-column filter engine for the entry table.
// All active column filters are AND-combined.
// Core layer: pure logic, no I/O.

use crate::core::column::{CellValue, ColumnId, ColumnSpec, FilterKind};
use crate::core::model::Entry;
use std::collections::BTreeMap;

/// Filter value for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnFilter {
    /// Case-insensitive substring. Empty = no filter.
    Text(String),

    /// Inclusive bounds; either may be unset.
    Range { min: Option<i64>, max: Option<i64> },
}

impl ColumnFilter {
    /// Filter kind this value belongs to.
    pub fn kind(&self) -> FilterKind {
        match self {
            ColumnFilter::Text(_) => FilterKind::Text,
            ColumnFilter::Range { .. } => FilterKind::Range,
        }
    }

    /// False when the filter would match everything.
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Text(needle) => !needle.is_empty(),
            ColumnFilter::Range { min, max } => min.is_some() || max.is_some(),
        }
    }

    /// Build a filter of the given kind from user input.
    ///
    /// Text input is taken as-is. Range input is `min..max`, `min..`, `..max`
    /// or a single number meaning an exact value; blank sides are unset.
    /// Returns `None` when a range side is not an integer.
    pub fn from_input(kind: FilterKind, raw: &str) -> Option<ColumnFilter> {
        match kind {
            FilterKind::Text => Some(ColumnFilter::Text(raw.to_string())),
            FilterKind::Range => {
                let bound = |s: &str| -> Option<Option<i64>> {
                    let s = s.trim();
                    if s.is_empty() {
                        Some(None)
                    } else {
                        s.parse().ok().map(Some)
                    }
                };
                let (min, max) = match raw.split_once("..") {
                    Some((lo, hi)) => (bound(lo)?, bound(hi)?),
                    None => {
                        let exact = bound(raw)?;
                        (exact, exact)
                    }
                };
                Some(ColumnFilter::Range { min, max })
            }
        }
    }
}

fn matches_text(value: &CellValue, needle_lower: &str) -> bool {
    needle_lower.is_empty() || value.to_string().to_lowercase().contains(needle_lower)
}

fn matches_range(value: &CellValue, min: Option<i64>, max: Option<i64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    // Bounds on a value with no numeric view exclude the row.
    let Some(n) = value.as_number() else {
        return false;
    };
    min.map_or(true, |lo| n >= i128::from(lo)) && max.map_or(true, |hi| n <= i128::from(hi))
}

/// Active filters keyed by column. Inactive values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    filters: BTreeMap<ColumnId, ColumnFilter>,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Active filter for a column, if any.
    pub fn get(&self, column: ColumnId) -> Option<&ColumnFilter> {
        self.filters.get(&column)
    }

    /// Set or clear a column's filter. An inactive value clears it.
    pub fn set(&mut self, column: ColumnId, filter: ColumnFilter) {
        if filter.is_active() {
            self.filters.insert(column, filter);
        } else {
            self.filters.remove(&column);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &ColumnFilter)> {
        self.filters.iter().map(|(id, f)| (*id, f))
    }
}

/// Apply filters to a slice of entries, returning indices of matching entries.
///
/// Indices point into `entries` and keep insertion order. Filters on columns
/// missing from `columns` are ignored.
pub fn apply_filters(
    entries: &[Entry],
    columns: &[ColumnSpec],
    filter: &FilterState,
) -> Vec<usize> {
    if filter.is_empty() {
        return (0..entries.len()).collect();
    }

    // Resolve columns and lowercase text needles once, not per row.
    let active: Vec<(&ColumnSpec, Prepared)> = filter
        .iter()
        .filter_map(|(id, f)| {
            let spec = columns.iter().find(|c| c.id == id)?;
            let prepared = match f {
                ColumnFilter::Text(needle) => Prepared::Text(needle.to_lowercase()),
                ColumnFilter::Range { min, max } => Prepared::Range(*min, *max),
            };
            Some((spec, prepared))
        })
        .collect();

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            active.iter().all(|(spec, prepared)| {
                let value = spec.value(entry);
                match prepared {
                    Prepared::Text(needle) => matches_text(&value, needle),
                    Prepared::Range(min, max) => matches_range(&value, *min, *max),
                }
            })
        })
        .map(|(idx, _)| idx)
        .collect()
}

enum Prepared {
    Text(String),
    Range(Option<i64>, Option<i64>),
}
