//! Encrypted safe blob storage on the local filesystem.
//!
//! One file per safe, named by the caller-supplied identifier. The content
//! is opaque ciphertext; the server holds no key material and can only
//! address blobs, never read them.

use std::path::PathBuf;

use tokio::fs;
use tracing::{debug, info};

use coffre_shared::constants::IDENTIFIER_SIZE;
use coffre_shared::url::base64_url_decode;

use crate::error::ServerError;

#[derive(Debug, Clone)]
pub struct SafeVault {
    base_path: PathBuf,
    max_size: usize,
}

impl SafeVault {
    pub async fn new(base_path: PathBuf, max_size: usize) -> Result<Self, ServerError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ServerError::Storage(format!(
                "Failed to create safe directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Safe vault initialized");

        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Store a blob under `identifier`, replacing any previous content.
    /// The replace is a single filesystem write, never an incremental one.
    pub async fn store(&self, identifier: &str, data: &[u8]) -> Result<(), ServerError> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Empty blob".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ServerError::BlobTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let path = self.safe_path(identifier)?;
        fs::write(&path, data).await.map_err(|e| {
            ServerError::Storage(format!("Failed to write safe {}: {}", identifier, e))
        })?;

        debug!(identifier, size = data.len(), "Stored safe blob");
        Ok(())
    }

    pub async fn get(&self, identifier: &str) -> Result<Vec<u8>, ServerError> {
        let path = self.safe_path(identifier)?;

        if !path.exists() {
            return Err(ServerError::SafeNotFound(identifier.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            ServerError::Storage(format!("Failed to read safe {}: {}", identifier, e))
        })?;

        debug!(identifier, size = data.len(), "Retrieved safe blob");
        Ok(data)
    }

    pub async fn delete(&self, identifier: &str) -> Result<(), ServerError> {
        let path = self.safe_path(identifier)?;

        if !path.exists() {
            return Err(ServerError::SafeNotFound(identifier.to_string()));
        }

        fs::remove_file(&path).await.map_err(|e| {
            ServerError::Storage(format!("Failed to delete safe {}: {}", identifier, e))
        })?;

        debug!(identifier, "Deleted safe blob");
        Ok(())
    }

    /// Resolve the storage path for an identifier.
    ///
    /// The identifier must be unpadded base64url decoding to exactly 16
    /// bytes, which also rules out path separators and traversal sequences.
    fn safe_path(&self, identifier: &str) -> Result<PathBuf, ServerError> {
        let decoded = base64_url_decode(identifier)
            .map_err(|_| ServerError::BadRequest("Identifier is not base64url".to_string()))?;

        if decoded.len() != IDENTIFIER_SIZE {
            return Err(ServerError::BadRequest(format!(
                "Identifier must decode to {} bytes, got {}",
                IDENTIFIER_SIZE,
                decoded.len()
            )));
        }

        Ok(self.base_path.join(format!("{identifier}.blob")))
    }
}
