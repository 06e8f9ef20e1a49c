use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{validate_key, FileStorage, StorageError};

/// Buckets as directories under `root`, served by the router under
/// `/storage/{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(bucket)?;
        validate_key(key)?;

        let path = self.root.join(bucket).join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        tracing::debug!(bucket, key, content_type, size = bytes.len(), "Stored file");
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/storage/{}/{}", self.base_url, bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_writes_under_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://localhost:3000/");

        storage
            .upload("payment-proofs", "1-abc.png", b"png", "image/png")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("payment-proofs/1-abc.png")).unwrap();
        assert_eq!(written, b"png");
        assert_eq!(
            storage.public_url("payment-proofs", "1-abc.png"),
            "http://localhost:3000/storage/payment-proofs/1-abc.png"
        );
    }

    #[tokio::test]
    async fn test_nested_key_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://x");

        storage
            .upload("services", "service-images/1-abc.jpg", b"jpg", "image/jpeg")
            .await
            .unwrap();

        assert!(dir.path().join("services/service-images/1-abc.jpg").exists());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://x");

        let err = storage
            .upload("gallery", "../escape.png", b"x", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
