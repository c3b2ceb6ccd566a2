//! Core data model and error taxonomy shared across pipeline stages.

mod asset;
mod error;

pub use asset::{AssetKind, Classification, ImageAsset, IngestedAsset, UploadResult};
pub use error::{ClassifyError, IngestError};
