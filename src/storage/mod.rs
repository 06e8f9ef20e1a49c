//! Bucketed file storage.
//!
//! A bucket is a flat namespace of object keys. Uploads are write-once from
//! the point of view of the application; public URLs are derived from the
//! bucket and key without another round trip.

mod local;
mod memory;

use async_trait::async_trait;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};

pub use local::LocalFileStorage;
pub use memory::MemoryStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    fn public_url(&self, bucket: &str, key: &str) -> String;
}

/// A file received from a client, held in memory until it is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Text after the last `.`, or the whole name when there is none.
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(&self.file_name)
    }
}

/// `{unix_millis}-{6 random chars}.{ext}`
pub fn unique_key(extension: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();

    unique_key_with(Utc::now().timestamp_millis(), &suffix, extension)
}

fn unique_key_with(millis: i64, suffix: &str, extension: &str) -> String {
    format!("{}-{}.{}", millis, suffix, extension)
}

pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");

    if bad {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}
