//! Upload store seam and the built-in filesystem store.
//!
//! Pictures leave the pipeline as binary blobs handed to an [`UploadStore`];
//! the store answers with the canonical URI (and, when it knows them, the
//! stored dimensions). Icons never reach a store.
//!
//! [`LocalStore`] writes blobs under a directory with content-hash filenames
//! (`asset-<12 hex>.<ext>`), skipping the write when the file already exists:
//! identical content always maps to the identical name.

use std::path::{Path, PathBuf};

use crate::core::{IngestError, UploadResult};
use crate::datauri::{DataUri, mime};
use crate::size::derive_size;

/// External upload collaborator: blob in, canonical URI out. Called at most
/// once per invocation; a returned `warning` is non-fatal.
#[allow(async_fn_in_trait)]
pub trait UploadStore {
    async fn store(&self, blob: &[u8], media_type: &str) -> Result<UploadResult, IngestError>;
}

/// Content-addressed filesystem store.
pub struct LocalStore {
    dir: PathBuf,
    /// Byte budget used only to attach an oversized-asset warning.
    max_bytes: usize,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Filename for a blob: 12 hex chars of its blake3 hash plus extension.
    fn filename(blob: &[u8], media_type: &str) -> String {
        let hash = blake3::hash(blob);
        format!(
            "asset-{}.{}",
            &hash.to_hex()[..12],
            mime::extension_for(media_type)
        )
    }

    fn path_for(&self, blob: &[u8], media_type: &str) -> PathBuf {
        self.dir.join(Self::filename(blob, media_type))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UploadStore for LocalStore {
    async fn store(&self, blob: &[u8], media_type: &str) -> Result<UploadResult, IngestError> {
        let path = self.path_for(blob, media_type);

        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| IngestError::Io(path.clone(), e))?
        {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| IngestError::Io(self.dir.clone(), e))?;
            tokio::fs::write(&path, blob)
                .await
                .map_err(|e| IngestError::Io(path.clone(), e))?;
        }

        // Dimensions are best-effort metadata here, not a gate
        let probe = DataUri::from_bytes(media_type, blob.to_vec());
        let (width, height, aspect_ratio) = match derive_size(&probe) {
            Ok((w, h)) => (Some(w), Some(h), Some(w as f32 / h.max(1) as f32)),
            Err(_) => (None, None, None),
        };

        let warning = (blob.len() >= self.max_bytes).then(|| {
            format!(
                "stored asset is {} bytes, above the {} byte budget",
                blob.len(),
                self.max_bytes
            )
        });

        Ok(UploadResult {
            data_uri: path.to_string_lossy().into_owned(),
            width,
            height,
            aspect_ratio,
            warning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="5"/>"#;

    #[tokio::test]
    async fn test_store_writes_content_hash_file() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path(), usize::MAX);

        let result = store.store(SVG, mime::SVG).await.unwrap();
        let path = PathBuf::from(&result.data_uri);
        assert!(path.exists());
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("asset-") && name.ends_with(".svg"));
        assert_eq!(std::fs::read(&path).unwrap(), SVG);
    }

    #[tokio::test]
    async fn test_same_content_maps_to_same_name() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path(), usize::MAX);

        let first = store.store(SVG, mime::SVG).await.unwrap();
        let second = store.store(SVG, mime::SVG).await.unwrap();
        assert_eq!(first.data_uri, second.data_uri);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_store_reports_dimensions() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path(), usize::MAX);

        let result = store.store(SVG, mime::SVG).await.unwrap();
        assert_eq!(result.width, Some(10));
        assert_eq!(result.height, Some(5));
        assert_eq!(result.aspect_ratio, Some(2.0));
        assert!(result.warning.is_none());
    }

    #[tokio::test]
    async fn test_oversized_blob_gets_warning() {
        let temp = TempDir::new().unwrap();
        let store = LocalStore::new(temp.path(), 4);

        let result = store.store(SVG, mime::SVG).await.unwrap();
        assert!(result.warning.unwrap().contains("byte budget"));
    }
}
