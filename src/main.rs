// VoiceMerge - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Ingesting each CSV export given on the command line
// 4. Applying the requested sort/filter/page and printing or exporting

mod report;

use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use voicemerge::app::state::{AppState, ExportFormat};
use voicemerge::core::column::ColumnId;
use voicemerge::core::filter::ColumnFilter;
use voicemerge::core::table::SortDirection;
use voicemerge::platform::config::{load_config, load_config_file, PlatformPaths};
use voicemerge::util;
use voicemerge::util::error::{Result, VoiceMergeError};

/// VoiceMerge - merge call-log CSV exports into one table.
///
/// Each file is ingested as one batch; a file whose name was already
/// ingested, or that contains a malformed row, is rejected as a whole.
#[derive(Parser, Debug)]
#[command(name = "VoiceMerge", version, about)]
struct Cli {
    /// CSV export files to ingest, in order.
    files: Vec<PathBuf>,

    /// Column filter, repeatable: `name=smith` or `match=10..` / `size=..2048`.
    #[arg(short = 'f', long = "filter", value_name = "COLUMN=VALUE")]
    filters: Vec<String>,

    /// Sort column with optional direction: `lastDate:desc`.
    #[arg(short = 's', long = "sort", value_name = "COLUMN[:asc|desc]")]
    sort: Option<String>,

    /// Rows per page (10, 20, 30, 40 or 50).
    #[arg(long = "page-size")]
    page_size: Option<usize>,

    /// Page to show (1-based).
    #[arg(short = 'p', long = "page", default_value_t = 1)]
    page: usize,

    /// Write all filtered rows to this file instead of printing a page.
    #[arg(short = 'o', long = "export")]
    export: Option<PathBuf>,

    /// Export format.
    #[arg(long = "format", value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Alternative config.toml location (must exist).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Json => ExportFormat::Json,
        }
    }
}

/// Split `COLUMN=VALUE` and resolve the column.
fn parse_filter_arg(raw: &str) -> std::result::Result<(ColumnId, String), String> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("filter '{raw}' must look like COLUMN=VALUE"))?;
    let column = column.parse::<ColumnId>().map_err(|e| e.to_string())?;
    Ok((column, value.to_string()))
}

/// Parse `COLUMN[:asc|desc]`.
fn parse_sort_arg(raw: &str) -> std::result::Result<(ColumnId, SortDirection), String> {
    let (column, direction) = match raw.split_once(':') {
        Some((c, d)) => (c, d),
        None => (raw, "asc"),
    };
    let direction = match direction.to_lowercase().as_str() {
        "asc" | "ascending" => SortDirection::Ascending,
        "desc" | "descending" => SortDirection::Descending,
        other => return Err(format!("unknown sort direction '{other}' (use asc or desc)")),
    };
    let column = column.parse::<ColumnId>().map_err(|e| e.to_string())?;
    Ok((column, direction))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "VoiceMerge failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let (config, config_warnings) = match cli.config {
        Some(ref path) => load_config_file(path)?,
        None => load_config(&PlatformPaths::resolve().config_file()),
    };

    util::logging::init(cli.debug, config.log_level.as_deref());
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    tracing::info!(
        version = util::constants::APP_VERSION,
        files = cli.files.len(),
        debug = cli.debug,
        "VoiceMerge starting"
    );

    let mut state = AppState::new(&config);

    // Each failure is reported here, once; the report does not repeat it.
    let mut failed = 0usize;
    for path in &cli.files {
        match state.ingest_file(path) {
            Ok(added) => tracing::info!(path = %path.display(), added, "File ingested"),
            Err(e) => {
                failed += 1;
                eprintln!("Error: {}: {e}", path.display());
            }
        }
    }

    // View state: page size first so the requested page clamps against it.
    if let Some(size) = cli.page_size {
        state.set_page_size(size);
    }
    for raw in &cli.filters {
        let (column, value) = match parse_filter_arg(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(ExitCode::from(2));
            }
        };
        let Some(kind) = state.table().column(column).map(|c| c.filter_kind) else {
            continue;
        };
        match ColumnFilter::from_input(kind, &value) {
            Some(filter) => state.set_filter(column, filter),
            None => {
                eprintln!("Error: '{value}' is not a valid range for column '{column}'");
                return Ok(ExitCode::from(2));
            }
        }
    }
    if let Some(ref raw) = cli.sort {
        match parse_sort_arg(raw) {
            Ok((column, direction)) => state.set_sort(column, Some(direction)),
            Err(e) => {
                eprintln!("Error: {e}");
                return Ok(ExitCode::from(2));
            }
        }
    }
    state.set_page(cli.page.saturating_sub(1));

    if let Some(ref export_path) = cli.export {
        let file = File::create(export_path).map_err(|source| VoiceMergeError::Io {
            path: export_path.clone(),
            operation: "create export file",
            source,
        })?;
        let count = state.export(cli.format.into(), BufWriter::new(file), export_path)?;
        println!("Exported {count} entries to {}", export_path.display());
    } else {
        print!("{}", report::render(&state));
    }

    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_arg() {
        assert_eq!(
            parse_filter_arg("name=smith"),
            Ok((ColumnId::Name, "smith".to_string()))
        );
        assert_eq!(
            parse_filter_arg("match=10.."),
            Ok((ColumnId::Match, "10..".to_string()))
        );
        assert!(parse_filter_arg("name").is_err());
        assert!(parse_filter_arg("colour=red").is_err());
    }

    #[test]
    fn test_parse_sort_arg() {
        assert_eq!(
            parse_sort_arg("lastDate:desc"),
            Ok((ColumnId::LastDate, SortDirection::Descending))
        );
        assert_eq!(
            parse_sort_arg("size"),
            Ok((ColumnId::Size, SortDirection::Ascending))
        );
        assert!(parse_sort_arg("size:sideways").is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "voicemerge",
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
        ]);
        assert!(matches!(run(&cli), Err(VoiceMergeError::Config(_))));
    }

    #[test]
    fn test_export_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let cli = Cli::parse_from([
            "voicemerge",
            "--config",
            config.to_str().unwrap(),
            "--export",
            dir.path().join("no-such-dir").join("out.csv").to_str().unwrap(),
        ]);
        assert!(matches!(
            run(&cli),
            Err(VoiceMergeError::Io {
                operation: "create export file",
                ..
            })
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
