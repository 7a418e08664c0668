//! Fixed schema of a safe database image.
//!
//! There is no migration chain here: an image either carries this exact
//! shape or it is rejected at import. Evolving the format means revisiting
//! the validation in [`crate::database`].

use rusqlite::Connection;

const SCHEMA_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Documents
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS documents (
    id         TEXT PRIMARY KEY NOT NULL,   -- UUID v4
    file_name  TEXT NOT NULL,
    mime_type  TEXT NOT NULL,
    content    BLOB NOT NULL,               -- raw document bytes
    size       INTEGER NOT NULL,            -- always content length
    created_at TEXT NOT NULL                -- ISO-8601 / RFC-3339
);

CREATE INDEX IF NOT EXISTS idx_documents_file_name ON documents(file_name);
CREATE INDEX IF NOT EXISTS idx_documents_mime_type ON documents(mime_type);

-- ----------------------------------------------------------------
-- Safe metadata (singleton row)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS safe_metadata (
    name           TEXT NOT NULL,
    description    TEXT NOT NULL,
    created_at     TEXT NOT NULL,
    total_size     INTEGER NOT NULL,
    document_count INTEGER NOT NULL
);
"#;

/// Create both tables on a fresh connection.
pub(crate) fn apply(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
