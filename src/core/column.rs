// VoiceMerge - core/column.rs
//
// Column definitions for the entry table: identity, header text, how a
// cell value is pulled out of an Entry, and which filter the column takes.
// The filter kind is part of the definition and never guessed from data.

use crate::core::model::Entry;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Column identity
// =============================================================================

/// The table's columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    OriginalPhoneNumber,
    FirstDate,
    LastDate,
    Name,
    Match,
    Path,
    Size,
}

impl ColumnId {
    /// All columns in display order.
    pub fn all() -> &'static [ColumnId] {
        &[
            ColumnId::OriginalPhoneNumber,
            ColumnId::FirstDate,
            ColumnId::LastDate,
            ColumnId::Name,
            ColumnId::Match,
            ColumnId::Path,
            ColumnId::Size,
        ]
    }

    /// Stable identifier, matching the Entry's serialised field name.
    pub fn key(&self) -> &'static str {
        match self {
            ColumnId::OriginalPhoneNumber => "originalPhoneNumber",
            ColumnId::FirstDate => "firstDate",
            ColumnId::LastDate => "lastDate",
            ColumnId::Name => "name",
            ColumnId::Match => "match",
            ColumnId::Path => "path",
            ColumnId::Size => "size",
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColumn(pub String);

impl fmt::Display for UnknownColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = ColumnId::all().iter().map(|c| c.key()).collect();
        write!(
            f,
            "unknown column '{}'; expected one of: {}",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownColumn {}

impl FromStr for ColumnId {
    type Err = UnknownColumn;

    /// Accepts camelCase or snake_case keys, case-insensitively
    /// (`firstDate`, `first_date`, `FIRSTDATE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        ColumnId::all()
            .iter()
            .copied()
            .find(|c| c.key().to_lowercase() == folded)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

// =============================================================================
// Cell values
// =============================================================================

/// Which filter widget a column takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring search.
    Text,
    /// Inclusive numeric min/max.
    Range,
}

/// A typed cell value extracted from an Entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Integer(u64),
    Timestamp(DateTime<Utc>),
}

impl CellValue {
    /// Numeric view used by range filters. Text has none.
    pub fn as_number(&self) -> Option<i128> {
        match self {
            CellValue::Integer(n) => Some(i128::from(*n)),
            CellValue::Timestamp(_) | CellValue::Text(_) => None,
        }
    }

    /// Key used for sorting, computed once per row.
    pub fn into_sort_key(self) -> SortKey {
        match self {
            CellValue::Integer(n) => SortKey::Integer(n),
            CellValue::Timestamp(ts) => SortKey::Timestamp(ts),
            CellValue::Text(raw) => SortKey::Text {
                folded: raw.to_lowercase(),
                raw,
            },
        }
    }
}

/// Totally ordered sort key for a cell.
///
/// Text orders case-folded first, then by bytes. Keys of different variants
/// (never produced by one column) order as Integer < Timestamp < Text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Integer(u64),
    Timestamp(DateTime<Utc>),
    Text { folded: String, raw: String },
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Timestamp(ts) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

// =============================================================================
// Column specs
// =============================================================================

/// Definition of one table column.
#[derive(Clone, Copy)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub header: &'static str,
    pub filter_kind: FilterKind,
    value_of: fn(&Entry) -> CellValue,
}

impl ColumnSpec {
    pub fn new(
        id: ColumnId,
        header: &'static str,
        filter_kind: FilterKind,
        value_of: fn(&Entry) -> CellValue,
    ) -> Self {
        Self {
            id,
            header,
            filter_kind,
            value_of,
        }
    }

    /// Extract this column's value from an entry.
    pub fn value(&self, entry: &Entry) -> CellValue {
        (self.value_of)(entry)
    }
}

impl fmt::Debug for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("filter_kind", &self.filter_kind)
            .finish_non_exhaustive()
    }
}

/// The standard column set for call-log entries.
pub fn default_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::new(
            ColumnId::OriginalPhoneNumber,
            "Phone Number (html)",
            FilterKind::Text,
            |e| CellValue::Text(e.original_phone_number.clone()),
        ),
        ColumnSpec::new(ColumnId::FirstDate, "First Date", FilterKind::Text, |e| {
            CellValue::Timestamp(e.first_date)
        }),
        ColumnSpec::new(ColumnId::LastDate, "Last Date", FilterKind::Text, |e| {
            CellValue::Timestamp(e.last_date)
        }),
        ColumnSpec::new(ColumnId::Name, "Name (VCF)", FilterKind::Text, |e| {
            CellValue::Text(e.name.clone())
        }),
        ColumnSpec::new(ColumnId::Match, "Match Length", FilterKind::Range, |e| {
            CellValue::Integer(e.match_length)
        }),
        ColumnSpec::new(ColumnId::Path, "Path", FilterKind::Text, |e| {
            CellValue::Text(e.path.clone())
        }),
        ColumnSpec::new(ColumnId::Size, "Size", FilterKind::Range, |e| {
            CellValue::Integer(e.size)
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_id_parses_both_cases() {
        assert_eq!("firstDate".parse::<ColumnId>(), Ok(ColumnId::FirstDate));
        assert_eq!("first_date".parse::<ColumnId>(), Ok(ColumnId::FirstDate));
        assert_eq!(
            "original-phone-number".parse::<ColumnId>(),
            Ok(ColumnId::OriginalPhoneNumber)
        );
        assert_eq!("SIZE".parse::<ColumnId>(), Ok(ColumnId::Size));
        assert!("duration".parse::<ColumnId>().is_err());
    }

    #[test]
    fn test_default_columns_follow_display_order() {
        let ids: Vec<_> = default_columns().iter().map(|c| c.id).collect();
        assert_eq!(ids, ColumnId::all());
    }

    #[test]
    fn test_numeric_columns_declare_range_filters() {
        for spec in default_columns() {
            let expected = matches!(spec.id, ColumnId::Match | ColumnId::Size);
            assert_eq!(spec.filter_kind == FilterKind::Range, expected, "{:?}", spec.id);
        }
    }

    fn key(value: CellValue) -> SortKey {
        value.into_sort_key()
    }

    #[test]
    fn test_text_sort_key_is_case_insensitive_first() {
        assert!(key(CellValue::Text("alice".into())) < key(CellValue::Text("Bob".into())));
        assert!(key(CellValue::Text("Amy".into())) < key(CellValue::Text("amy".into())));
        assert!(key(CellValue::Text(String::new())) < key(CellValue::Text("a".into())));
    }

    #[test]
    fn test_integer_sort_key_is_numeric() {
        assert!(key(CellValue::Integer(9)) < key(CellValue::Integer(10)));
    }

    #[test]
    fn test_timestamp_sort_key_is_chronological() {
        use chrono::TimeZone;
        let early = Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        assert!(key(CellValue::Timestamp(early)) < key(CellValue::Timestamp(late)));
    }
}
