//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::AssetKind;

/// Pictor image ingestion CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pictor.toml)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the full pipeline on an image and print its asset descriptor
    #[command(visible_alias = "i")]
    Ingest {
        #[command(flatten)]
        args: IngestArgs,
    },

    /// Report what the pipeline sees in an image (animation, colors, size)
    #[command(visible_alias = "x")]
    Inspect {
        /// Image file to inspect
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },
}

/// Ingest command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct IngestArgs {
    /// Image file, or `-` to read a data URI / base64 payload from stdin
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,

    /// Force a classification instead of letting color analysis decide
    #[arg(long = "as", value_enum)]
    pub kind: Option<KindArg>,

    /// Persist the asset (pictures go to the store, icons stay local)
    #[arg(short, long)]
    pub store: bool,

    /// Write the descriptor to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON descriptor
    #[arg(short, long)]
    pub pretty: bool,
}

/// Requested asset kind, as spelled on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Icon,
    Picture,
}

impl From<KindArg> for AssetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Icon => Self::Icon,
            KindArg::Picture => Self::Picture,
        }
    }
}
