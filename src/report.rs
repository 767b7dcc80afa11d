// VoiceMerge - report.rs
//
// Plain-text rendering of the session for the terminal: uploaded file
// batches, active filters, the current table page and the page window.
// Ingestion errors go to stderr from main, not here.
// Binary-side only; the library never prints.

use std::fmt::Write as _;
use voicemerge::app::state::AppState;
use voicemerge::core::column::ColumnId;
use voicemerge::core::filter::ColumnFilter;
use voicemerge::core::page_window::PageMarker;
use voicemerge::core::table::{SortDirection, TableView};

/// Maximum characters shown per cell before truncation with "…".
const MAX_CELL_WIDTH: usize = 40;

/// Render everything the user needs to see into one string.
pub fn render(state: &AppState) -> String {
    let view = state.view();
    let mut out = String::new();
    render_batches(state, &mut out);
    render_filters(state, &mut out);
    render_table(state, &view, &mut out);
    render_pager(&view, &mut out);
    out
}

fn render_batches(state: &AppState, out: &mut String) {
    if state.batches().is_empty() {
        return;
    }
    let _ = writeln!(out, "Files:");
    for batch in state.batches() {
        let _ = writeln!(
            out,
            "  {} ({} entries{})",
            batch.name,
            batch.count,
            if batch.label.is_empty() {
                String::new()
            } else {
                format!(", {}", batch.label)
            }
        );
    }
    out.push('\n');
}

fn filter_text(filter: &ColumnFilter) -> String {
    match filter {
        ColumnFilter::Text(needle) => format!("~ \"{needle}\""),
        ColumnFilter::Range { min, max } => {
            let side = |b: &Option<i64>| b.map(|n| n.to_string()).unwrap_or_default();
            format!("in {}..{}", side(min), side(max))
        }
    }
}

fn render_filters(state: &AppState, out: &mut String) {
    let table = state.table();
    let active: Vec<String> = table
        .columns()
        .iter()
        .filter_map(|c| {
            let filter = table.filter(c.id)?;
            Some(format!("{} {}", c.id, filter_text(filter)))
        })
        .collect();
    if !active.is_empty() {
        let _ = writeln!(out, "Filters: {}\n", active.join(", "));
    }
}

fn header_text(state: &AppState, id: ColumnId, header: &str) -> String {
    match state.table().sort() {
        Some(sort) if sort.column == id => match sort.direction {
            SortDirection::Ascending => format!("{header} ^"),
            SortDirection::Descending => format!("{header} v"),
        },
        _ => header.to_string(),
    }
}

fn truncate(cell: String) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell;
    }
    let mut short: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    short.push('…');
    short
}

fn render_table(state: &AppState, view: &TableView<'_>, out: &mut String) {
    let columns = state.table().columns();
    let headers: Vec<String> = columns
        .iter()
        .map(|c| header_text(state, c.id, c.header))
        .collect();
    let rows: Vec<Vec<String>> = view
        .visible()
        .into_iter()
        .map(|entry| {
            columns
                .iter()
                .map(|c| truncate(c.value(entry).to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "{}", line(&headers));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    if rows.is_empty() {
        let _ = writeln!(out, "(no entries)");
    }
    for row in &rows {
        let _ = writeln!(out, "{}", line(row));
    }
}

fn render_pager(view: &TableView<'_>, out: &mut String) {
    let mut parts: Vec<String> = Vec::new();
    parts.push(if view.can_previous_page() { "<<  <" } else { "     " }.to_string());
    for marker in view.page_window() {
        parts.push(match marker {
            PageMarker::Page {
                number,
                current: true,
            } => format!("[{number}]"),
            PageMarker::Page { number, .. } => number.to_string(),
            PageMarker::Ellipsis => "…".to_string(),
        });
    }
    if view.can_next_page() {
        parts.push(">  >>".to_string());
    }
    let _ = writeln!(
        out,
        "\n{}\nPage {} of {} ({} rows, {} per page)",
        parts.join(" ").trim(),
        view.page_index() + 1,
        view.page_count(),
        view.row_count(),
        view.page_size()
    );
}
