//! Pipeline error taxonomy.
//!
//! Four failure classes, handled differently at the CLI boundary:
//!
//! - `Decode` / `DataUri` / `Gif`: malformed input, halts with a message
//! - `Remote`: the processor or store reported failure, halts with a message
//! - `Policy`: anticipated user error (wrong content for the requested kind),
//!   shown without a stack of causes
//! - `Io`: file read problems
//!
//! Best-effort failures (downscale) never reach this type; they are logged
//! at the call site and swallowed. No stage retries.

use std::path::PathBuf;

use thiserror::Error;

use crate::datauri::DataUriError;
use crate::gif::GifError;

/// User-facing classification policy violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassifyError {
    #[error("can only use svg images as icons")]
    NotSvg,

    #[error("can only use svg images with one color as icons")]
    NotSingleColor,
}

/// Errors surfaced by pipeline stages.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not decode image: {0}")]
    Decode(String),

    #[error("image processing failed: {0}")]
    Remote(String),

    #[error("{0}")]
    Policy(#[from] ClassifyError),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    DataUri(#[from] DataUriError),

    #[error(transparent)]
    Gif(#[from] GifError),
}

impl IngestError {
    /// Whether this is an anticipated user error (shown plainly, no context
    /// chain) rather than an unexpected failure.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::Policy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_messages() {
        assert_eq!(
            ClassifyError::NotSvg.to_string(),
            "can only use svg images as icons"
        );
        assert_eq!(
            ClassifyError::NotSingleColor.to_string(),
            "can only use svg images with one color as icons"
        );
    }

    #[test]
    fn test_policy_is_user_error() {
        let err = IngestError::from(ClassifyError::NotSvg);
        assert!(err.is_user_error());
        assert!(!IngestError::Decode("bad bytes".to_string()).is_user_error());
    }
}
