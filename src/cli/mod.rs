//! CLI command handlers

pub mod commands;

pub use commands::{fill, labels, load_records};
