//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// Filesystem path where encrypted safe blobs are stored.
    /// Env: `SAFE_STORAGE_PATH`
    /// Default: `./safes`
    pub storage_path: PathBuf,

    /// Maximum accepted blob size in bytes.
    /// Env: `MAX_SAFE_BLOB_SIZE`
    /// Default: 12 MiB (a full 10 MiB safe plus SQLite and AEAD overhead).
    pub max_blob_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], coffre_shared::constants::DEFAULT_HTTP_PORT).into(),
            storage_path: PathBuf::from("./safes"),
            max_blob_size: 12 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Ok(path) = std::env::var("SAFE_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }

        if let Ok(val) = std::env::var("MAX_SAFE_BLOB_SIZE") {
            if let Ok(n) = val.parse::<usize>() {
                config.max_blob_size = n;
            } else {
                tracing::warn!(value = %val, "Invalid MAX_SAFE_BLOB_SIZE, using default");
            }
        }

        config
    }
}
