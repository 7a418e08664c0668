//! Access to the metadata singleton and counter verification.

use chrono::{DateTime, Utc};

use crate::database::SafeStore;
use crate::error::{Result, StoreError};
use crate::models::SafeMetadata;

impl SafeStore {
    /// Read the metadata singleton.
    ///
    /// [`StoreError::NotFound`] here means a corrupted store; it is
    /// unreachable for any image that passed import validation.
    pub fn metadata(&self) -> Result<SafeMetadata> {
        self.conn()
            .query_row(
                "SELECT name, description, created_at, total_size, document_count
                 FROM safe_metadata",
                [],
                row_to_metadata,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Recompute the counters from the documents table and compare them with
    /// the metadata row. The counters are maintained transactionally; this
    /// is the verification path only, never the source of truth.
    pub fn verify_counters(&self) -> Result<bool> {
        let meta = self.metadata()?;
        let (count, total): (i64, i64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(size), 0) FROM documents",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(meta.document_count == count && meta.total_size == total)
    }
}

/// Map a `rusqlite::Row` to a [`SafeMetadata`].
fn row_to_metadata(row: &rusqlite::Row<'_>) -> rusqlite::Result<SafeMetadata> {
    let name: String = row.get(0)?;
    let description: String = row.get(1)?;
    let created_str: String = row.get(2)?;
    let total_size: i64 = row.get(3)?;
    let document_count: i64 = row.get(4)?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(SafeMetadata {
        name,
        description,
        created_at,
        total_size,
        document_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_roundtrips_name_and_description() {
        let store = SafeStore::create_empty("Papiers", "Dossier famille").unwrap();
        let meta = store.metadata().unwrap();

        assert_eq!(meta.name, "Papiers");
        assert_eq!(meta.description, "Dossier famille");
    }

    #[test]
    fn fresh_store_verifies() {
        let store = SafeStore::create_empty("s", "").unwrap();
        assert!(store.verify_counters().unwrap());
    }
}
