use thiserror::Error;

/// Errors produced by the safe store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error during normal operation. Failures while loading an
    /// imported image are reported as [`StoreError::Schema`] instead.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The byte image is not a valid safe database.
    #[error("Invalid safe schema: {0}")]
    Schema(String),

    /// Caller-correctable input rejection; nothing was mutated.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Document or metadata row absent.
    #[error("Record not found")]
    NotFound,

    /// I/O error while staging an export or import image.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
