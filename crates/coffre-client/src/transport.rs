//! Remote blob transport: upload/download of opaque ciphertext by identifier.
//!
//! The blob is fully opaque to every implementation; the identifier is the
//! only addressing key. `NotFound` stays distinguishable from other failures
//! so callers can tell a missing safe from a broken network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    /// No safe is stored under the requested identifier.
    #[error("Safe not found in remote storage")]
    NotFound,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status: {0}")]
    Status(StatusCode),
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Store `blob` under `identifier`, replacing any previous content.
    async fn upload(&self, identifier: &str, blob: &[u8]) -> Result<(), TransportError>;

    /// Fetch the blob stored under `identifier`.
    async fn download(&self, identifier: &str) -> Result<Vec<u8>, TransportError>;
}

/// HTTP transport against a coffre-server instance.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload(&self, identifier: &str, blob: &[u8]) -> Result<(), TransportError> {
        let url = format!("{}/safes/{}", self.base_url, identifier);
        let res = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(blob.to_vec())
            .send()
            .await?;

        if res.status().is_success() {
            return Ok(());
        }
        Err(TransportError::Status(res.status()))
    }

    async fn download(&self, identifier: &str) -> Result<Vec<u8>, TransportError> {
        let url = format!("{}/safes/{}", self.base_url, identifier);
        let res = self.client.get(url).send().await?;

        if res.status() == StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound);
        }
        if !res.status().is_success() {
            return Err(TransportError::Status(res.status()));
        }

        Ok(res.bytes().await?.to_vec())
    }
}

/// In-memory transport for tests and offline flows.
#[derive(Default)]
pub struct MemoryTransport {
    safes: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.safes.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn upload(&self, identifier: &str, blob: &[u8]) -> Result<(), TransportError> {
        let mut safes = self.safes.lock().unwrap_or_else(|e| e.into_inner());
        safes.insert(identifier.to_string(), blob.to_vec());
        Ok(())
    }

    async fn download(&self, identifier: &str) -> Result<Vec<u8>, TransportError> {
        let safes = self.safes.lock().unwrap_or_else(|e| e.into_inner());
        safes
            .get(identifier)
            .cloned()
            .ok_or(TransportError::NotFound)
    }
}
