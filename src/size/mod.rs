//! Natural-size derivation and best-effort downscaling.
//!
//! Sizing decodes only as much as needed to learn pixel dimensions (usvg for
//! SVG, the image crate for raster payloads). Downscaling keeps oversized
//! uploads inside the editor's budget: whichever dimension is larger gets
//! clamped to the bound, the other is left at 0 ("auto") and inferred from
//! the aspect ratio by the resize routine.
//!
//! Downscale failure is never fatal: the original asset is left untouched
//! and the failure only logged.

use std::io::Cursor;

use image::ImageFormat;
use image::imageops::FilterType;

use crate::core::{ImageAsset, IngestError};
use crate::datauri::{DataUri, mime};
use crate::debug;

/// Largest dimension an asset may keep without downscaling.
pub const MAX_DIMENSION: u32 = 4096;
/// Largest encoded payload that skips downscaling: 4 MiB.
pub const MAX_BYTES: usize = 4 * 1024 * 1024;

/// Downscale thresholds, overridable from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub max_dimension: u32,
    pub max_bytes: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            max_bytes: MAX_BYTES,
        }
    }
}

/// Decode the natural pixel dimensions of a payload.
pub fn derive_size(uri: &DataUri) -> Result<(u32, u32), IngestError> {
    if uri.is_svg() {
        let tree = usvg::Tree::from_data(uri.data(), &usvg::Options::default())
            .map_err(|e| IngestError::Decode(format!("could not read svg size: {e}")))?;
        let size = tree.size();
        return Ok((
            size.width().round().max(1.0) as u32,
            size.height().round().max(1.0) as u32,
        ));
    }

    let img = image::load_from_memory(uri.data())
        .map_err(|e| IngestError::Decode(format!("could not read image size: {e}")))?;
    Ok((img.width(), img.height()))
}

/// Whether an asset exceeds either the dimension or the byte budget.
pub fn needs_downscale(asset: &ImageAsset, payload_len: usize, limits: &SizeLimits) -> bool {
    asset.width > limits.max_dimension
        || asset.height > limits.max_dimension
        || payload_len >= limits.max_bytes
}

/// Target dimensions for a downscale: the larger side clamped to `max`, the
/// other encoded as 0 and inferred later.
pub fn downscale_target(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width >= height {
        (max.min(width), 0)
    } else {
        (0, max.min(height))
    }
}

/// Fill in the "auto" (0) side of a target, preserving aspect ratio.
fn infer_dimensions(orig: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (ow, oh) = orig;
    match target {
        (0, 0) => (ow, oh),
        (w, 0) => (w, ((u64::from(oh) * u64::from(w)) / u64::from(ow.max(1))).max(1) as u32),
        (0, h) => (((u64::from(ow) * u64::from(h)) / u64::from(oh.max(1))).max(1) as u32, h),
        exact => exact,
    }
}

/// Shrink an oversized asset in place. Best-effort: on any failure the asset
/// is left exactly as it was.
pub fn try_downscale(asset: &mut ImageAsset, limits: &SizeLimits) {
    let Ok(uri) = DataUri::parse(&asset.data_uri) else {
        // Remote URIs (post-upload) have nothing local to downscale
        return;
    };

    if !needs_downscale(asset, uri.byte_len(), limits) {
        return;
    }

    // Resizing re-encodes as static PNG, which would flatten an animation
    if uri.is_gif() && matches!(crate::gif::is_animated_gif(uri.data()), Ok(true)) {
        debug!("resize"; "animated gif left at full size");
        return;
    }

    let target = downscale_target(asset.width, asset.height, limits.max_dimension);
    match resize_payload(uri.data(), target) {
        Ok((bytes, width, height)) => {
            asset.data_uri = DataUri::from_bytes(mime::PNG, bytes).to_string();
            asset.width = width;
            asset.height = height;
        }
        Err(e) => {
            debug!("resize"; "downscale skipped: {e}");
        }
    }
}

/// Decode, resize to the (possibly partial) target, re-encode as PNG.
fn resize_payload(data: &[u8], target: (u32, u32)) -> Result<(Vec<u8>, u32, u32), IngestError> {
    let img = image::load_from_memory(data)
        .map_err(|e| IngestError::Decode(format!("could not decode image for resize: {e}")))?;

    let (tw, th) = infer_dimensions((img.width(), img.height()), target);
    let resized = img.resize(tw, th, FilterType::Lanczos3);

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| IngestError::Decode(format!("could not encode resized image: {e}")))?;

    let (width, height) = (resized.width(), resized.height());
    Ok((out.into_inner(), width, height))
}
