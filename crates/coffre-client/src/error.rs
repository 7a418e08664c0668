use thiserror::Error;

use coffre_shared::CryptoError;
use coffre_store::StoreError;

use crate::transport::TransportError;

/// Errors surfaced to callers of [`crate::SafeManager`].
///
/// Every underlying failure propagates here unchanged; nothing is downgraded
/// to a default value.
#[derive(Error, Debug)]
pub enum SafeError {
    /// The URL is not a structurally valid safe link.
    #[error("Invalid safe URL")]
    InvalidUrl,

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A blocking crypto task was cancelled or panicked.
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SafeError>;
