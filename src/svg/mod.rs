//! SVG analysis and rewriting for the ingestion pipeline.
//!
//! # Modules
//!
//! - [`colors`]: fill/stroke color extraction into a normalized [`ColorSet`]
//! - [`classify`]: icon-vs-picture decision rules
//! - [`rewrite`]: text-relative sizing and single-color stripping
//! - [`sanitize`]: the `SvgProcessor` seam and built-in usvg re-serializer
//!
//! Data flows sanitize → classify; `rewrite` is only reached from the icon
//! branch of classification.

pub mod classify;
pub mod colors;
pub mod rewrite;
pub mod sanitize;

use thiserror::Error;

pub use classify::classify;
pub use colors::{ColorSet, extract_colors};
pub use sanitize::{SvgProcessor, UsvgProcessor, sanitize};

/// Errors from local SVG markup handling (not the processor seam).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SvgError {
    #[error("invalid svg markup: {0}")]
    Parse(String),

    #[error("svg serialization failed: {0}")]
    Write(String),
}

impl From<SvgError> for crate::core::IngestError {
    fn from(err: SvgError) -> Self {
        Self::Decode(err.to_string())
    }
}
