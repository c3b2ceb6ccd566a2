//! The `inspect` command: report what the pipeline sees in an image without
//! running it. Useful for answering "why did this classify as a picture".

use std::path::Path;

use anyhow::{Context, Result};

use crate::datauri::{DataUri, mime};
use crate::gif;
use crate::log;
use crate::size::derive_size;
use crate::svg::classify::icon_eligible;
use crate::svg::extract_colors;

pub fn run(path: &Path) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;

    // Prefer content sniffing; fall back to the file extension
    let media_type = mime::from_magic_bytes(&bytes)
        .unwrap_or_else(|| mime::from_extension(path.extension().and_then(|e| e.to_str())));

    log!("inspect"; "{}: {} ({} bytes)", path.display(), media_type, bytes.len());

    let uri = DataUri::from_bytes(media_type, bytes);

    match derive_size(&uri) {
        Ok((width, height)) => log!("inspect"; "size: {width}x{height}"),
        Err(e) => log!("inspect"; "size: unavailable ({e})"),
    }

    if uri.is_gif() {
        report_gif(&uri)?;
    }
    if uri.is_svg() {
        report_svg(&uri)?;
    }
    Ok(())
}

fn report_gif(uri: &DataUri) -> Result<()> {
    let animated = gif::is_animated_gif(uri.data())?;
    log!("inspect"; "animated: {}", if animated { "yes" } else { "no" });
    Ok(())
}

fn report_svg(uri: &DataUri) -> Result<()> {
    let colors = extract_colors(uri.text()?)?;

    if colors.is_empty() {
        log!("inspect"; "colors: none declared");
    } else {
        let list: Vec<&str> = colors.iter().collect();
        log!("inspect"; "colors: {} ({})", colors.len(), list.join(", "));
    }
    if colors.has_current_color() {
        log!("inspect"; "uses currentColor: yes");
    }

    let verdict = if icon_eligible(&colors) {
        "icon candidate"
    } else {
        "picture (not a single recolorable paint)"
    };
    log!("inspect"; "classification: {verdict}");
    Ok(())
}
