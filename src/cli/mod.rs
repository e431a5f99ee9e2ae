//! CLI command handlers

pub mod commands;

pub use commands::{extract_text, history, init, predict, result, series, show, SeriesInput};
