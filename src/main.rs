//! Pictor - an image ingestion pipeline for web assets.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod datauri;
mod gif;
mod ingest;
mod logger;
mod size;
mod svg;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PictorConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = PictorConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Ingest { args } => cli::ingest::run(args, &config),
        Commands::Inspect { path } => cli::inspect::run(path),
    }
}
