// VoiceMerge - platform/mod.rs
//
// Platform layer: config directories, config.toml, and reading input files.

pub mod config;
pub mod csv_source;
