//! # coffre-server
//!
//! Remote storage half of Coffre: a small axum service that keeps encrypted
//! safe images as opaque blobs on disk, addressed only by their public
//! identifier.
//!
//! The server never sees plaintext or key material; every safe decrypts
//! exclusively with the seed embedded in its owner's link, and that seed
//! never leaves the client.

mod api;
mod config;
mod error;
mod vault;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::vault::SafeVault;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,coffre_server=debug")),
        )
        .init();

    info!("Starting Coffre storage server v{}", env!("CARGO_PKG_VERSION"));

    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    let vault =
        Arc::new(SafeVault::new(config.storage_path.clone(), config.max_blob_size).await?);

    let http_addr = config.http_addr;
    let app_state = AppState {
        vault,
        config: Arc::new(config),
    };

    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
