//! Safe store handle and image export/import.
//!
//! A [`SafeStore`] owns one in-memory [`rusqlite::Connection`] holding the
//! full safe content. There is no process-wide engine state: every store is
//! an isolated connection, so parallel tests and parallel safes never share
//! anything.

use std::time::Duration;

use chrono::Utc;
use rusqlite::backup::Backup;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::schema;

/// One open safe: a metadata singleton plus a documents table, in memory.
pub struct SafeStore {
    conn: Connection,
}

impl SafeStore {
    /// Create a new, empty safe with zeroed counters.
    pub fn create_empty(name: &str, description: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::apply(&conn)?;

        conn.execute(
            "INSERT INTO safe_metadata (name, description, created_at, total_size, document_count)
             VALUES (?1, ?2, ?3, 0, 0)",
            rusqlite::params![name, description, Utc::now().to_rfc3339()],
        )?;

        tracing::debug!(name, "empty safe created");
        Ok(Self { conn })
    }

    /// Load a safe from an exported byte image.
    ///
    /// Any SQLite-level failure while reading the image, a missing table or
    /// a missing metadata row is reported as [`StoreError::Schema`]:
    /// successfully-decrypted garbage must never surface as a half-usable
    /// store.
    pub fn import(data: &[u8]) -> Result<Self> {
        let staging = NamedTempFile::new()?;
        std::fs::write(staging.path(), data)?;

        let src = Connection::open(staging.path()).map_err(schema_err)?;
        let mut conn = Connection::open_in_memory()?;
        {
            let backup = Backup::new(&src, &mut conn).map_err(schema_err)?;
            backup
                .run_to_completion(64, Duration::ZERO, None)
                .map_err(schema_err)?;
        }

        Self::validate(&conn)?;

        tracing::debug!(bytes = data.len(), "safe image imported");
        Ok(Self { conn })
    }

    /// Export the full safe as a single byte image.
    ///
    /// Exact inverse of [`SafeStore::import`] for any store this crate
    /// produced, including binary document content.
    pub fn export(&self) -> Result<Vec<u8>> {
        let staging = NamedTempFile::new()?;
        {
            let mut dst = Connection::open(staging.path())?;
            let backup = Backup::new(&self.conn, &mut dst)?;
            backup.run_to_completion(64, Duration::ZERO, None)?;
        }

        let bytes = std::fs::read(staging.path())?;
        tracing::debug!(bytes = bytes.len(), "safe image exported");
        Ok(bytes)
    }

    /// Reject images that do not carry the safe shape: both tables present
    /// and exactly one metadata row.
    fn validate(conn: &Connection) -> Result<()> {
        for table in ["documents", "safe_metadata"] {
            let present: bool = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    rusqlite::params![table],
                    |row| row.get::<_, i64>(0).map(|n| n > 0),
                )
                .map_err(schema_err)?;
            if !present {
                return Err(StoreError::Schema(format!("missing table: {table}")));
            }
        }

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM safe_metadata", [], |row| row.get(0))
            .map_err(schema_err)?;
        if rows != 1 {
            return Err(StoreError::Schema(format!(
                "expected one metadata row, found {rows}"
            )));
        }

        Ok(())
    }

    /// Shared reference to the underlying connection, for the typed CRUD
    /// helpers in the sibling modules.
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Mutable reference, needed to open transactions.
    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

fn schema_err(e: rusqlite::Error) -> StoreError {
    StoreError::Schema(e.to_string())
}
