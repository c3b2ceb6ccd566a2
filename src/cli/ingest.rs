//! The `ingest` command: run the full pipeline and emit a JSON descriptor.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::runtime::Runtime;

use crate::cli::args::IngestArgs;
use crate::config::PictorConfig;
use crate::core::IngestedAsset;
use crate::ingest::{IngestSource, Ingestor, LocalStore};
use crate::log;
use crate::svg::UsvgProcessor;

pub fn run(args: &IngestArgs, config: &PictorConfig) -> Result<()> {
    let source = resolve_source(&args.path)?;

    let ingestor = Ingestor::new(
        UsvgProcessor::new(config.svg.cache_entries),
        LocalStore::new(&config.store.dir, config.limits.max_bytes_len()),
        config.size_limits(),
    );

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let outcome = runtime.block_on(async {
        let Some(asset) = ingestor
            .ingest(source, args.kind.map(Into::into))
            .await?
        else {
            return Ok(None);
        };

        if args.store {
            ingestor.upload(asset).await.map(Some)
        } else {
            Ok(Some(asset))
        }
    });

    let asset = match outcome {
        Ok(Some(asset)) => asset,
        // "No asset" has already been explained to the user
        Ok(None) => return Ok(()),
        Err(e) if e.is_user_error() => {
            log!("error"; "{e}");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    emit(&asset, args)
}

/// `-` reads a data URI (or bare base64) from stdin; anything else is a file.
fn resolve_source(path: &Path) -> Result<IngestSource> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(IngestSource::Uri(text));
    }
    Ok(IngestSource::Path(path.to_path_buf()))
}

fn emit(asset: &IngestedAsset, args: &IngestArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(asset)?
    } else {
        serde_json::to_string(asset)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("ingest"; "descriptor written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
