// VoiceMerge - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for VoiceMerge configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/voicemerge/ or %APPDATA%\VoiceMerge\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[input]` section.
    pub input: InputSection,
    /// `[table]` section.
    pub table: TableSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[input]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct InputSection {
    /// Whether export files start with a header row.
    pub has_headers: Option<bool>,
    /// Single-byte ASCII field delimiter, e.g. "," or ";".
    pub delimiter: Option<String>,
}

/// `[table]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TableSection {
    /// Initial page size (one of the offered sizes).
    pub page_size: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Skip the first record of every input file.
    pub has_headers: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Initial page size.
    pub page_size: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            has_headers: constants::DEFAULT_HAS_HEADERS,
            delimiter: constants::DEFAULT_DELIMITER,
            page_size: constants::DEFAULT_PAGE_SIZE,
            log_level: None,
        }
    }
}

/// Load and validate the config file at its default location.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning describing the problem,
/// so the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    match load_config_file(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Load and validate a config file the user named explicitly.
///
/// Unlike [`load_config`], a missing or unparseable file is an error.
/// Out-of-range values still only produce warnings.
pub fn load_config_file(config_path: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw = read_raw_config(config_path)?;
    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    Ok(validate(&raw))
}

/// Turn raw config values into an `AppConfig`, collecting a warning for
/// every value that falls back to its default.
pub fn validate(raw: &RawConfig) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Input: has_headers --
    if let Some(has_headers) = raw.input.has_headers {
        config.has_headers = has_headers;
    }

    // -- Input: delimiter --
    if let Some(ref delimiter) = raw.input.delimiter {
        match parse_delimiter(delimiter) {
            Ok(byte) => config.delimiter = byte,
            Err(e) => warnings.push(format!("[input] {e}. Using default (',').")),
        }
    }

    // -- Table: page_size --
    if let Some(size) = raw.table.page_size {
        if constants::PAGE_SIZE_OPTIONS.contains(&size) {
            config.page_size = size;
        } else {
            warnings.push(format!(
                "[table] page_size = {size} is not one of {:?}. Using default ({}).",
                constants::PAGE_SIZE_OPTIONS,
                constants::DEFAULT_PAGE_SIZE,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    (config, warnings)
}

fn read_raw_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// A delimiter must be exactly one ASCII character.
pub fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::ValueOutOfRange {
            field: "delimiter".to_string(),
            value: raw.to_string(),
            expected: "a single ASCII character".to_string(),
        }),
    }
}
