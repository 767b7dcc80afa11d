// VoiceMerge - core/normalize.rs
//
// Converts one raw export row into an `Entry`.
// Core layer: pure function, no I/O, no logging of row content.
//
// Row layout (positional):
//   0 originalPhoneNumber   3 name          6 path
//   1 firstDate             4 phoneNumber   7 fileSize
//   2 lastDate              5 match         8 mediaSize

use crate::core::model::Entry;
use crate::util::constants::{
    MIN_NON_EMPTY_FIELDS, NAIVE_TIMESTAMP_FORMATS, OFFSET_TIMESTAMP_FORMATS, ROW_FIELD_COUNT,
};
use crate::util::error::{MalformedRow, RowFault};
use chrono::{DateTime, NaiveDateTime, Utc};

const FIELD_NAMES: [&str; ROW_FIELD_COUNT] = [
    "originalPhoneNumber",
    "firstDate",
    "lastDate",
    "name",
    "phoneNumber",
    "match",
    "path",
    "fileSize",
    "mediaSize",
];

/// Number of fields in `row` that contain something other than whitespace.
pub fn non_empty_field_count<S: AsRef<str>>(row: &[S]) -> usize {
    row.iter().filter(|f| !f.as_ref().trim().is_empty()).count()
}

/// True for blank placeholder rows that ingestion drops silently.
pub fn is_blank_row<S: AsRef<str>>(row: &[S]) -> bool {
    non_empty_field_count(row) < MIN_NON_EMPTY_FIELDS
}

/// Normalise one row into an `Entry`.
///
/// Blank rows (see [`is_blank_row`]) are expected to be filtered out by the
/// caller; if one arrives anyway it is rejected like any other malformed row.
pub fn normalize<S: AsRef<str>>(row: &[S]) -> Result<Entry, MalformedRow> {
    build_entry(row).map_err(|fault| MalformedRow {
        row: row.iter().map(|f| f.as_ref().to_string()).collect(),
        fault,
    })
}

fn build_entry<S: AsRef<str>>(row: &[S]) -> Result<Entry, RowFault> {
    if is_blank_row(row) {
        return Err(RowFault::EmptyField {
            field: FIELD_NAMES[0],
        });
    }
    if row.len() < ROW_FIELD_COUNT {
        return Err(RowFault::MissingField {
            field: FIELD_NAMES[row.len()],
            index: row.len(),
        });
    }
    let field = |idx: usize| row[idx].as_ref().trim();

    let original_phone_number = row[0].as_ref();
    if original_phone_number.trim().is_empty() {
        return Err(RowFault::EmptyField {
            field: FIELD_NAMES[0],
        });
    }

    let first_date = parse_timestamp(field(1)).ok_or_else(|| RowFault::InvalidTimestamp {
        field: FIELD_NAMES[1],
        raw: field(1).to_string(),
    })?;
    let last_date = parse_timestamp(field(2)).ok_or_else(|| RowFault::InvalidTimestamp {
        field: FIELD_NAMES[2],
        raw: field(2).to_string(),
    })?;
    if first_date > last_date {
        return Err(RowFault::InvertedDateRange {
            first: first_date.to_rfc3339(),
            last: last_date.to_rfc3339(),
        });
    }

    let phone_number = match field(4) {
        "" => original_phone_number.to_string(),
        resolved => resolved.to_string(),
    };

    let path = field(6);
    if path.is_empty() {
        return Err(RowFault::EmptyField {
            field: FIELD_NAMES[6],
        });
    }

    let match_length = parse_count(field(5), FIELD_NAMES[5])?;
    let file_size = parse_count(field(7), FIELD_NAMES[7])?;
    let media_size = parse_count(field(8), FIELD_NAMES[8])?;

    Ok(Entry {
        original_phone_number: original_phone_number.to_string(),
        phone_number,
        name: field(3).to_string(),
        first_date,
        last_date,
        match_length,
        path: path.to_string(),
        file_size,
        media_size,
        size: file_size.saturating_add(media_size),
    })
}

/// Parse a non-negative integer field; blank means 0.
fn parse_count(raw: &str, field: &'static str) -> Result<u64, RowFault> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<u64>().map_err(|_| RowFault::InvalidInteger {
        field,
        raw: raw.to_string(),
    })
}

/// Parse an export date-time into UTC.
///
/// Attempts in order:
///   1. Strict RFC 3339 (`2021-01-01T00:00:00.000-05:00`, `...Z`).
///   2. RFC 3339 without seconds (`2021-01-01T00:00Z`, `2021-01-01T00:00+02:00`).
///   3. Zone-less layouts from `NAIVE_TIMESTAMP_FORMATS`, taken as UTC.
///
/// Date-only values are rejected.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // chrono's %:z does not take a bare `Z`; swap it for an explicit offset.
    let offset_form = match trimmed.strip_suffix(['Z', 'z']) {
        Some(body) => format!("{body}+00:00"),
        None => trimmed.to_string(),
    };
    for fmt in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&offset_form, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    fn valid_row() -> Vec<String> {
        row(&[
            "+1 (555) 010-9999",
            "2021-01-01T00:00Z",
            "2021-01-02T00:00Z",
            "Bob",
            "+15550109999",
            "7",
            "Calls/Bob - Text.html",
            "10",
            "20",
        ])
    }

    #[test]
    fn test_normalize_valid_row() {
        let entry = normalize(&valid_row()).unwrap();
        assert_eq!(entry.original_phone_number, "+1 (555) 010-9999");
        assert_eq!(entry.phone_number, "+15550109999");
        assert_eq!(entry.name, "Bob");
        assert_eq!(
            entry.first_date,
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(entry.match_length, 7);
        assert_eq!(entry.file_size, 10);
        assert_eq!(entry.media_size, 20);
        assert_eq!(entry.size, 30);
        assert!(entry.first_date <= entry.last_date);
    }

    #[test]
    fn test_original_phone_number_is_verbatim() {
        let mut r = valid_row();
        r[0] = "  555 0100 ".to_string();
        r[4] = String::new();
        let entry = normalize(&r).unwrap();
        assert_eq!(entry.original_phone_number, "  555 0100 ");
        assert_eq!(entry.phone_number, "  555 0100 ");
    }

    #[test]
    fn test_optional_fields_default() {
        let r = row(&[
            "555",
            "2021-01-01T00:00Z",
            "2021-01-01T00:00Z",
            "",
            "",
            "",
            "p",
            "",
            "",
        ]);
        let entry = normalize(&r).unwrap();
        assert_eq!(entry.name, "");
        assert_eq!(entry.match_length, 0);
        assert_eq!(entry.size, 0);
    }

    #[test]
    fn test_short_row_reports_missing_field() {
        let err = normalize(&row(&["555", "2021-01-01T00:00Z", "2021-01-02T00:00Z"])).unwrap_err();
        assert_eq!(
            err.fault,
            RowFault::MissingField {
                field: "name",
                index: 3
            }
        );
        assert_eq!(err.row.len(), 3);
    }

    #[test]
    fn test_bad_date_is_malformed() {
        let mut r = valid_row();
        r[1] = "yesterday".to_string();
        let err = normalize(&r).unwrap_err();
        assert!(matches!(
            err.fault,
            RowFault::InvalidTimestamp { field: "firstDate", .. }
        ));
        assert_eq!(err.row, r);
    }

    #[test]
    fn test_inverted_dates_rejected() {
        let mut r = valid_row();
        r.swap(1, 2);
        let err = normalize(&r).unwrap_err();
        assert!(matches!(err.fault, RowFault::InvertedDateRange { .. }));
    }

    #[test]
    fn test_negative_match_rejected() {
        let mut r = valid_row();
        r[5] = "-1".to_string();
        let err = normalize(&r).unwrap_err();
        assert!(matches!(err.fault, RowFault::InvalidInteger { field: "match", .. }));
    }

    #[test]
    fn test_empty_path_rejected() {
        let mut r = valid_row();
        r[6] = "   ".to_string();
        let err = normalize(&r).unwrap_err();
        assert_eq!(err.fault, RowFault::EmptyField { field: "path" });
    }

    #[test]
    fn test_blank_row_detection() {
        assert!(is_blank_row::<&str>(&[]));
        assert!(is_blank_row(&["", " ", ""]));
        assert!(is_blank_row(&["only-one"]));
        assert!(!is_blank_row(&["a", "b"]));
    }

    #[test]
    fn test_parse_timestamp_rfc3339_with_offset() {
        let ts = parse_timestamp("2021-03-04T10:20:30.500-05:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-03-04T15:20:30.500+00:00");
    }

    #[test]
    fn test_parse_timestamp_without_seconds() {
        let z = parse_timestamp("2021-01-01T00:00Z").unwrap();
        assert_eq!(z, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());

        let offset = parse_timestamp("2021-01-01T02:00+02:00").unwrap();
        assert_eq!(offset, z);
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp("2021-06-01 08:15:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2021, 6, 1, 8, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_rejects_other_forms() {
        assert!(parse_timestamp("2021-01-01").is_none());
        assert!(parse_timestamp("01/02/2021 10:00").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("bad-date-row").is_none());
    }
}
