//! Payment proof validation and upload.

use crate::storage::{unique_key, FileStorage, StorageError, UploadedFile};

pub const PROOF_BUCKET: &str = "payment-proofs";
pub const MAX_PROOF_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_PROOF_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

#[derive(Debug, thiserror::Error)]
pub enum ProofError {
    #[error("Invalid file type: please upload a JPG or PNG image")]
    UnsupportedType(String),
    #[error("File too large: please upload an image smaller than 5MB")]
    TooLarge(usize),
    #[error("Failed to upload payment proof: {0}")]
    Storage(#[from] StorageError),
}

/// Type and size checks; runs before any storage call.
pub fn validate_proof(file: &UploadedFile) -> Result<(), ProofError> {
    if !ALLOWED_PROOF_TYPES.contains(&file.content_type.as_str()) {
        return Err(ProofError::UnsupportedType(file.content_type.clone()));
    }
    if file.size() > MAX_PROOF_BYTES {
        return Err(ProofError::TooLarge(file.size()));
    }
    Ok(())
}

/// Validates, stores under a fresh key and returns the public URL.
pub async fn upload_proof(
    storage: &dyn FileStorage,
    file: &UploadedFile,
) -> Result<String, ProofError> {
    validate_proof(file)?;

    let key = unique_key(file.extension());
    storage
        .upload(PROOF_BUCKET, &key, &file.bytes, &file.content_type)
        .await?;

    tracing::info!(key = %key, size = file.size(), "Payment proof uploaded");
    Ok(storage.public_url(PROOF_BUCKET, &key))
}
