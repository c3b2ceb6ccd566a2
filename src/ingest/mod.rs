//! The ingestion orchestrator.
//!
//! Composes the pipeline stages in a fixed order:
//!
//! ```text
//! File | data URI | clipboard
//!         │
//!         ▼
//!    ┌───────────┐
//!    │ normalize │ ──► everything becomes a data URI
//!    └─────┬─────┘
//!          ▼
//!    ┌──────────┐
//!    │ sanitize │ ──► SVG processor seam; None stops the pipeline
//!    └─────┬────┘
//!          ▼
//!    ┌──────────┐
//!    │   size   │ ──► natural pixel dimensions
//!    └─────┬────┘
//!          ▼
//!    ┌──────────┐
//!    │ classify │ ──► icon or picture
//!    └──────────┘
//! ```
//!
//! The upload stage is a separate entry point: pictures go to the store,
//! icons are downscaled locally and never uploaded. Stages run sequentially
//! on the caller's task; nothing fans out, nothing is cancelled mid-flight,
//! and each invocation owns its asset.

pub mod clipboard;
pub mod store;

use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::core::{AssetKind, ImageAsset, IngestError, IngestedAsset};
use crate::datauri::{DataUri, mime};
use crate::log;
use crate::size::{SizeLimits, derive_size, try_downscale};
use crate::svg::sanitize::SvgProcessor;
use crate::svg::{classify, sanitize};

pub use clipboard::ClipboardPayload;
pub use store::{LocalStore, UploadStore};

/// Where an ingest request comes from.
#[derive(Debug, Clone)]
pub enum IngestSource {
    /// A file on disk.
    Path(PathBuf),
    /// A `data:` URI, or a bare base64 payload (media type sniffed).
    Uri(String),
    /// A paste event.
    Clipboard(ClipboardPayload),
}

/// The pipeline, parameterized over its two external collaborators.
pub struct Ingestor<P, S> {
    processor: P,
    store: S,
    limits: SizeLimits,
}

impl<P: SvgProcessor, S: UploadStore> Ingestor<P, S> {
    pub fn new(processor: P, store: S, limits: SizeLimits) -> Self {
        Self {
            processor,
            store,
            limits,
        }
    }

    /// Run the full pipeline on a source.
    ///
    /// `Ok(None)` means "no asset": the input produced nothing usable and
    /// the user has been told why. Policy violations (wrong content for the
    /// requested kind) surface as errors for the caller to display.
    pub async fn ingest(
        &self,
        source: IngestSource,
        requested: Option<AssetKind>,
    ) -> Result<Option<IngestedAsset>, IngestError> {
        let Some(uri) = self.normalize(source).await? else {
            return Ok(None);
        };

        let Some(sanitized) = sanitize(uri, &self.processor).await? else {
            log!("error"; "image could not be processed");
            return Ok(None);
        };

        let (width, height) = derive_size(&sanitized.uri)?;
        let classification = classify(&sanitized.uri.to_string(), requested)?;

        Ok(Some(IngestedAsset {
            kind: classification.kind,
            data_uri: classification.data_uri,
            width,
            height,
            aspect_ratio: sanitized.aspect_ratio,
            icon_color: classification.icon_color,
            warning: None,
        }))
    }

    /// Persist a classified asset.
    ///
    /// Pictures are decoded to a binary blob and handed to the store; a
    /// returned warning is surfaced but non-fatal. Icons stay local; they
    /// are downscaled in place and returned as-is.
    pub async fn upload(&self, asset: IngestedAsset) -> Result<IngestedAsset, IngestError> {
        match asset.kind {
            AssetKind::Picture => {
                let uri = DataUri::parse(&asset.data_uri)?;
                let result = self.store.store(uri.data(), uri.media_type()).await?;
                if let Some(warning) = &result.warning {
                    log!("store"; "{warning}");
                }
                Ok(asset.merge_upload(result))
            }
            AssetKind::Icon => {
                let mut image = ImageAsset::new(
                    asset.data_uri,
                    asset.width,
                    asset.height,
                    asset.aspect_ratio,
                );
                try_downscale(&mut image, &self.limits);
                Ok(IngestedAsset {
                    data_uri: image.data_uri,
                    width: image.width,
                    height: image.height,
                    aspect_ratio: image.aspect_ratio,
                    ..asset
                })
            }
        }
    }

    /// Turn any source into a data URI.
    async fn normalize(&self, source: IngestSource) -> Result<Option<DataUri>, IngestError> {
        match source {
            IngestSource::Path(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|e| IngestError::Io(path.clone(), e))?;
                let media_type = mime::from_extension(
                    path.extension().and_then(|e| e.to_str()),
                );
                Ok(Some(DataUri::from_bytes(media_type, bytes)))
            }
            IngestSource::Uri(text) => {
                if text.trim_start().starts_with("data:") {
                    return Ok(Some(DataUri::parse(text.trim())?));
                }
                // Bare base64: decode and sniff the media type
                let bytes = STANDARD
                    .decode(text.trim())
                    .map_err(|e| IngestError::Decode(format!("invalid base64 payload: {e}")))?;
                let media_type = mime::from_magic_bytes(&bytes).unwrap_or(mime::OCTET_STREAM);
                Ok(Some(DataUri::from_bytes(media_type, bytes)))
            }
            IngestSource::Clipboard(payload) => {
                // An attached image blob wins over text
                if let Some((media_type, bytes)) = payload.image {
                    return Ok(Some(DataUri::from_bytes(media_type, bytes)));
                }
                match payload.text.as_deref().and_then(clipboard::svg_from_text) {
                    Some(xml) => Ok(Some(DataUri::from_bytes(mime::SVG, xml.into_bytes()))),
                    None => Ok(None),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassifyError, UploadResult};
    use crate::svg::UsvgProcessor;
    use crate::svg::sanitize::{ProcessedSvg, SvgProcessOutcome};
    use tempfile::TempDir;

    const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path fill="#FF0000" d="M0 0h24v24H0z"/></svg>"##;

    /// Processor double that always reports failure.
    struct FailingProcessor;

    impl SvgProcessor for FailingProcessor {
        async fn process(&self, _xml: &str) -> Result<SvgProcessOutcome, IngestError> {
            Ok(SvgProcessOutcome::Failure)
        }
    }

    /// Processor double that echoes input with a fixed aspect ratio.
    struct EchoProcessor;

    impl SvgProcessor for EchoProcessor {
        async fn process(&self, xml: &str) -> Result<SvgProcessOutcome, IngestError> {
            Ok(SvgProcessOutcome::Success(ProcessedSvg {
                xml: xml.to_string(),
                aspect_ratio: Some(1.0),
            }))
        }
    }

    fn ingestor_in<P: SvgProcessor>(
        temp: &TempDir,
        processor: P,
    ) -> Ingestor<P, LocalStore> {
        Ingestor::new(
            processor,
            LocalStore::new(temp.path(), usize::MAX),
            SizeLimits::default(),
        )
    }

    #[tokio::test]
    async fn test_ingest_svg_file_end_to_end() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("icon.svg");
        std::fs::write(&path, ICON_SVG).unwrap();

        let ingestor = ingestor_in(&temp, UsvgProcessor::default());
        let asset = ingestor
            .ingest(IngestSource::Path(path), None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(asset.kind, AssetKind::Icon);
        assert_eq!(asset.icon_color.as_deref(), Some("#FF0000"));
        assert_eq!((asset.width, asset.height), (24, 24));
        assert_eq!(asset.aspect_ratio, Some(1.0));
    }

    /// Processor double standing in for an unreachable processing service.
    struct OutageProcessor;

    impl SvgProcessor for OutageProcessor {
        async fn process(&self, _xml: &str) -> Result<SvgProcessOutcome, IngestError> {
            Err(IngestError::Remote("processing service unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_processor_error_propagates_as_remote() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("icon.svg");
        std::fs::write(&path, ICON_SVG).unwrap();

        let ingestor = ingestor_in(&temp, OutageProcessor);
        let err = ingestor.ingest(IngestSource::Path(path), None).await.unwrap_err();
        assert!(matches!(err, IngestError::Remote(_)));
        assert!(!err.is_user_error());
    }

    #[tokio::test]
    async fn test_processor_failure_yields_no_asset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("icon.svg");
        std::fs::write(&path, ICON_SVG).unwrap();

        let ingestor = ingestor_in(&temp, FailingProcessor);
        let outcome = ingestor.ingest(IngestSource::Path(path), None).await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_icon_request_on_multicolor_svg_is_policy_error() {
        let temp = TempDir::new().unwrap();
        let xml = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><rect fill="#111" width="4" height="8"/><rect fill="#222" x="4" width="4" height="8"/></svg>"##;
        let path = temp.path().join("multi.svg");
        std::fs::write(&path, xml).unwrap();

        let ingestor = ingestor_in(&temp, EchoProcessor);
        let err = ingestor
            .ingest(IngestSource::Path(path), Some(AssetKind::Icon))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Policy(ClassifyError::NotSingleColor)
        ));
    }

    #[tokio::test]
    async fn test_clipboard_prefers_blob_over_text() {
        let temp = TempDir::new().unwrap();
        let ingestor = ingestor_in(&temp, EchoProcessor);

        let payload = ClipboardPayload {
            image: Some((mime::SVG.to_string(), ICON_SVG.as_bytes().to_vec())),
            text: Some("<svg><rect fill=\"#00FF00\"/></svg>".to_string()),
        };
        let asset = ingestor
            .ingest(IngestSource::Clipboard(payload), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.icon_color.as_deref(), Some("#FF0000"));
    }

    #[tokio::test]
    async fn test_clipboard_text_gets_namespace_injected() {
        let temp = TempDir::new().unwrap();
        let ingestor = ingestor_in(&temp, UsvgProcessor::default());

        let payload = ClipboardPayload::from_text(
            r#"<svg width="10" height="10"><rect width="10" height="10" fill="currentColor"/></svg>"#,
        );
        let asset = ingestor
            .ingest(IngestSource::Clipboard(payload), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.kind, AssetKind::Icon);
        assert_eq!(asset.icon_color, None);
    }

    #[tokio::test]
    async fn test_clipboard_plain_text_is_no_asset() {
        let temp = TempDir::new().unwrap();
        let ingestor = ingestor_in(&temp, EchoProcessor);

        let outcome = ingestor
            .ingest(
                IngestSource::Clipboard(ClipboardPayload::from_text("just words")),
                None,
            )
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_bare_base64_is_sniffed() {
        let temp = TempDir::new().unwrap();
        let ingestor = ingestor_in(&temp, EchoProcessor);

        let encoded = STANDARD.encode(ICON_SVG);
        let asset = ingestor
            .ingest(IngestSource::Uri(encoded), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(asset.kind, AssetKind::Icon);
    }

    #[tokio::test]
    async fn test_upload_picture_goes_to_store() {
        let temp = TempDir::new().unwrap();
        let store_dir = temp.path().join("assets");
        let ingestor = Ingestor::new(
            EchoProcessor,
            LocalStore::new(&store_dir, usize::MAX),
            SizeLimits::default(),
        );

        let asset = IngestedAsset {
            kind: AssetKind::Picture,
            data_uri: DataUri::from_bytes(mime::SVG, ICON_SVG.as_bytes().to_vec()).to_string(),
            width: 24,
            height: 24,
            aspect_ratio: None,
            icon_color: None,
            warning: None,
        };

        let stored = ingestor.upload(asset).await.unwrap();
        assert!(!stored.data_uri.starts_with("data:"));
        assert!(PathBuf::from(&stored.data_uri).exists());
        assert_eq!(stored.width, 24);
    }

    #[tokio::test]
    async fn test_upload_icon_stays_local() {
        let temp = TempDir::new().unwrap();
        let store_dir = temp.path().join("assets");
        let ingestor = Ingestor::new(
            EchoProcessor,
            LocalStore::new(&store_dir, usize::MAX),
            SizeLimits::default(),
        );

        let data_uri = DataUri::from_bytes(mime::SVG, ICON_SVG.as_bytes().to_vec()).to_string();
        let asset = IngestedAsset {
            kind: AssetKind::Icon,
            data_uri: data_uri.clone(),
            width: 24,
            height: 24,
            aspect_ratio: Some(1.0),
            icon_color: Some("#FF0000".to_string()),
            warning: None,
        };

        let kept = ingestor.upload(asset).await.unwrap();
        assert_eq!(kept.data_uri, data_uri, "icons are never uploaded");
        assert!(!store_dir.exists());
    }

    /// Store double that reports canonical metadata and a warning.
    struct WarningStore;

    impl UploadStore for WarningStore {
        async fn store(&self, _blob: &[u8], _mt: &str) -> Result<UploadResult, IngestError> {
            Ok(UploadResult {
                data_uri: "https://cdn.example/a.png".to_string(),
                width: Some(640),
                height: Some(480),
                aspect_ratio: None,
                warning: Some("quota nearly exhausted".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_upload_merges_store_result_and_warning() {
        let ingestor = Ingestor::new(EchoProcessor, WarningStore, SizeLimits::default());

        let asset = IngestedAsset {
            kind: AssetKind::Picture,
            data_uri: DataUri::from_bytes(mime::PNG, vec![0x89, 0x50, 0x4E, 0x47]).to_string(),
            width: 1,
            height: 1,
            aspect_ratio: Some(1.0),
            icon_color: None,
            warning: None,
        };

        let stored = ingestor.upload(asset).await.unwrap();
        assert_eq!(stored.data_uri, "https://cdn.example/a.png");
        assert_eq!((stored.width, stored.height), (640, 480));
        assert_eq!(stored.aspect_ratio, Some(1.0));
        assert_eq!(stored.warning.as_deref(), Some("quota nearly exhausted"));
    }
}
