// VoiceMerge - core/mod.rs
//
// Core business logic layer.
// Must NOT depend on: platform, app, or any file I/O.

pub mod column;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod model;
pub mod normalize;
pub mod page_window;
pub mod table;
