//! CLI command handlers.

pub mod args;
pub mod ingest;
pub mod inspect;

pub use args::{Cli, Commands};
