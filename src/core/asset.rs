//! Asset types flowing through the ingestion pipeline.

use serde::{Deserialize, Serialize};

/// How an ingested asset will be used by the editor.
///
/// Icons are recolorable single-color SVGs rendered at text size; pictures
/// are static images placed as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Icon,
    #[default]
    Picture,
}

impl AssetKind {
    pub fn is_icon(self) -> bool {
        matches!(self, Self::Icon)
    }
}

/// An encoded image plus its post-processing pixel dimensions.
///
/// Width and height always describe the current payload: downscaling mutates
/// all three fields together. Each pipeline invocation owns its asset; nothing
/// is shared across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Data URI, or the store's canonical URI after upload.
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    /// Declared aspect ratio, when the sanitizer reported one.
    pub aspect_ratio: Option<f32>,
}

impl ImageAsset {
    pub fn new(data_uri: String, width: u32, height: u32, aspect_ratio: Option<f32>) -> Self {
        Self {
            data_uri,
            width,
            height,
            aspect_ratio,
        }
    }
}

/// Result of one sanitize/classify pass. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub data_uri: String,
    pub kind: AssetKind,
    /// The icon's single literal color, when it has one (`None` for
    /// `currentColor`-based icons).
    pub icon_color: Option<String>,
}

/// What the upload store hands back for a stored blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadResult {
    pub data_uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub aspect_ratio: Option<f32>,
    /// Non-fatal condition to surface to the user.
    pub warning: Option<String>,
}

/// Final descriptor handed back to the caller (and printed as JSON).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestedAsset {
    pub kind: AssetKind,
    pub data_uri: String,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl IngestedAsset {
    /// Merge an upload result over this asset, keeping local values where the
    /// store reported nothing.
    pub fn merge_upload(mut self, result: UploadResult) -> Self {
        self.data_uri = result.data_uri;
        if let Some(width) = result.width {
            self.width = width;
        }
        if let Some(height) = result.height {
            self.height = height;
        }
        if result.aspect_ratio.is_some() {
            self.aspect_ratio = result.aspect_ratio;
        }
        self.warning = result.warning;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_upload_prefers_store_values() {
        let asset = IngestedAsset {
            kind: AssetKind::Picture,
            data_uri: "data:image/png;base64,AAAA".to_string(),
            width: 100,
            height: 50,
            aspect_ratio: Some(2.0),
            icon_color: None,
            warning: None,
        };

        let merged = asset.merge_upload(UploadResult {
            data_uri: "assets/asset-abc.png".to_string(),
            width: Some(80),
            height: None,
            aspect_ratio: None,
            warning: Some("large asset".to_string()),
        });

        assert_eq!(merged.data_uri, "assets/asset-abc.png");
        assert_eq!(merged.width, 80);
        assert_eq!(merged.height, 50);
        assert_eq!(merged.aspect_ratio, Some(2.0));
        assert_eq!(merged.warning.as_deref(), Some("large asset"));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AssetKind::Icon).unwrap(), "\"icon\"");
        assert_eq!(
            serde_json::to_string(&AssetKind::Picture).unwrap(),
            "\"picture\""
        );
    }
}
