// VoiceMerge - app/mod.rs
//
// Application layer: session state wiring ingestion to the table view.
// Dependencies: core and platform layers.

pub mod state;
