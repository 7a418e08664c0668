//! Domain model structs stored inside a safe database image.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a presentation layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A document held inside a safe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    /// Unique document identifier, assigned by the store.
    pub id: Uuid,
    /// Original file name; never empty after trimming.
    pub file_name: String,
    /// MIME type as reported at ingestion.
    pub mime_type: String,
    /// Raw document bytes.
    pub content: Vec<u8>,
    /// Content length in bytes; always equals `content.len()`.
    pub size: i64,
    /// When the document was added to the safe.
    pub created_at: DateTime<Utc>,
}

/// Input for [`crate::SafeStore::add_document`]; id, size and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Safe metadata
// ---------------------------------------------------------------------------

/// The singleton metadata row of a safe.
///
/// `total_size` and `document_count` are maintained in the same transaction
/// as every document mutation; they are only ever recomputed for
/// verification, never as the source of truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafeMetadata {
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Sum of all document sizes in bytes.
    pub total_size: i64,
    /// Number of documents in the safe.
    pub document_count: i64,
}
