// VoiceMerge - core/export.rs
//
// CSV and JSON export of the table's filtered, sorted rows.
// Core layer: writes to any Write trait object.

use crate::core::column::CellValue;
use crate::core::model::Entry;
use crate::util::constants::MAX_EXPORT_ENTRIES;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

fn check_limit(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count,
            max: MAX_EXPORT_ENTRIES,
        });
    }
    Ok(())
}

/// Export entries to CSV format.
///
/// Writes: originalPhoneNumber, phoneNumber, name, firstDate, lastDate,
/// match, path, fileSize, mediaSize, size
pub fn export_csv<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_limit(entries.len())?;
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "originalPhoneNumber",
            "phoneNumber",
            "name",
            "firstDate",
            "lastDate",
            "match",
            "path",
            "fileSize",
            "mediaSize",
            "size",
        ])
        .map_err(csv_err)?;

    for entry in entries {
        csv_writer
            .write_record([
                entry.original_phone_number.clone(),
                entry.phone_number.clone(),
                entry.name.clone(),
                CellValue::Timestamp(entry.first_date).to_string(),
                CellValue::Timestamp(entry.last_date).to_string(),
                entry.match_length.to_string(),
                entry.path.clone(),
                entry.file_size.to_string(),
                entry.media_size.to_string(),
                entry.size.to_string(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    tracing::info!(count = entries.len(), path = %export_path.display(), "CSV export written");
    Ok(entries.len())
}

/// Export entries to JSON format (array of objects).
pub fn export_json<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_limit(entries.len())?;
    serde_json::to_writer_pretty(writer, entries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    tracing::info!(count = entries.len(), path = %export_path.display(), "JSON export written");
    Ok(entries.len())
}
