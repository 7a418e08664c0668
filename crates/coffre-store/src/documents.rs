//! CRUD operations for [`Document`] rows and the capacity predicates.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use coffre_shared::constants::{MAX_DOCUMENTS, MAX_DOCUMENT_SIZE, MAX_SAFE_SIZE};

use crate::database::SafeStore;
use crate::error::{Result, StoreError};
use crate::models::{Document, DocumentInput};

impl SafeStore {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new document and bump the metadata counters in the same
    /// transaction; a failure at any point leaves both untouched.
    ///
    /// The per-document size ceiling and the non-empty-name rule are the
    /// only write-time rejections; the aggregate ceilings stay advisory
    /// (see [`SafeStore::is_within_size_limit`]).
    pub fn add_document(&mut self, input: DocumentInput) -> Result<Document> {
        if input.content.len() > MAX_DOCUMENT_SIZE {
            return Err(StoreError::Validation(format!(
                "document size {} exceeds the {} byte limit",
                input.content.len(),
                MAX_DOCUMENT_SIZE
            )));
        }
        if input.file_name.trim().is_empty() {
            return Err(StoreError::Validation("file name is empty".to_string()));
        }

        let doc = Document {
            id: Uuid::new_v4(),
            file_name: input.file_name,
            mime_type: input.mime_type,
            size: input.content.len() as i64,
            content: input.content,
            created_at: Utc::now(),
        };

        let tx = self.conn_mut().transaction()?;
        tx.execute(
            "INSERT INTO documents (id, file_name, mime_type, content, size, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                doc.id.to_string(),
                doc.file_name,
                doc.mime_type,
                doc.content,
                doc.size,
                doc.created_at.to_rfc3339(),
            ],
        )?;
        tx.execute(
            "UPDATE safe_metadata
             SET total_size = total_size + ?1, document_count = document_count + 1",
            params![doc.size],
        )?;
        tx.commit()?;

        tracing::debug!(id = %doc.id, size = doc.size, "document added");
        Ok(doc)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single document; `None` when absent.
    pub fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
        let found = self.conn().query_row(
            "SELECT id, file_name, mime_type, content, size, created_at
             FROM documents
             WHERE id = ?1",
            params![id.to_string()],
            row_to_document,
        );

        match found {
            Ok(doc) => Ok(Some(doc)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// List all documents in insertion order, fully materialized.
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, file_name, mime_type, content, size, created_at
             FROM documents
             ORDER BY rowid ASC",
        )?;

        let rows = stmt.query_map([], row_to_document)?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Remove a document and decrement the metadata counters in the same
    /// transaction. Fails with [`StoreError::NotFound`] for an unknown id.
    pub fn delete_document(&mut self, id: Uuid) -> Result<()> {
        let tx = self.conn_mut().transaction()?;

        let size: i64 = tx
            .query_row(
                "SELECT size FROM documents WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })?;

        tx.execute(
            "DELETE FROM documents WHERE id = ?1",
            params![id.to_string()],
        )?;
        tx.execute(
            "UPDATE safe_metadata
             SET total_size = total_size - ?1, document_count = document_count - 1",
            params![size],
        )?;
        tx.commit()?;

        tracing::debug!(id = %id, size, "document deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Capacity predicates
    // ------------------------------------------------------------------

    /// Advisory predicate: total document bytes within the 10 MiB ceiling.
    /// Queried by the orchestrator before an upload, not enforced on writes.
    pub fn is_within_size_limit(&self) -> Result<bool> {
        Ok(self.metadata()?.total_size <= MAX_SAFE_SIZE)
    }

    /// Advisory predicate: document count within the 50 document ceiling.
    pub fn is_within_count_limit(&self) -> Result<bool> {
        let count: i64 =
            self.conn()
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count <= MAX_DOCUMENTS)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`Document`]. A shape mismatch surfaces as a
/// conversion error, never as a silently misread column.
fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let id_str: String = row.get(0)?;
    let file_name: String = row.get(1)?;
    let mime_type: String = row.get(2)?;
    let content: Vec<u8> = row.get(3)?;
    let size: i64 = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(Document {
        id,
        file_name,
        mime_type,
        content,
        size,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_doc(name: &str, content: &[u8]) -> DocumentInput {
        DocumentInput {
            file_name: name.to_string(),
            mime_type: "text/plain".to_string(),
            content: content.to_vec(),
        }
    }

    #[test]
    fn add_and_delete_keep_counters_in_step() {
        let mut store = SafeStore::create_empty("Test Safe", "desc").unwrap();

        let doc = store.add_document(text_doc("test.txt", b"test document")).unwrap();
        assert_eq!(doc.size, 13);

        let meta = store.metadata().unwrap();
        assert_eq!(meta.document_count, 1);
        assert_eq!(meta.total_size, 13);

        store.delete_document(doc.id).unwrap();
        let meta = store.metadata().unwrap();
        assert_eq!(meta.document_count, 0);
        assert_eq!(meta.total_size, 0);

        assert!(matches!(
            store.delete_document(doc.id),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn get_document_returns_none_for_unknown_id() {
        let store = SafeStore::create_empty("s", "").unwrap();
        assert!(store.get_document(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn get_document_roundtrips_content() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        let content: Vec<u8> = (0u8..=255).collect();
        let added = store.add_document(text_doc("bytes.bin", &content)).unwrap();

        let fetched = store.get_document(added.id).unwrap().unwrap();
        assert_eq!(fetched.content, content);
        assert_eq!(fetched.size, 256);
        assert_eq!(fetched.file_name, "bytes.bin");
    }

    #[test]
    fn list_documents_preserves_insertion_order() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        for name in ["premier.txt", "deuxieme.txt", "troisieme.txt"] {
            store.add_document(text_doc(name, b"x")).unwrap();
        }

        let names: Vec<String> = store
            .list_documents()
            .unwrap()
            .into_iter()
            .map(|d| d.file_name)
            .collect();
        assert_eq!(names, ["premier.txt", "deuxieme.txt", "troisieme.txt"]);
    }

    #[test]
    fn oversized_document_is_rejected() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        let result = store.add_document(text_doc("huge.bin", &vec![0u8; 2 * 1024 * 1024]));

        assert!(matches!(result, Err(StoreError::Validation(_))));
        // Nothing was mutated.
        assert_eq!(store.metadata().unwrap().document_count, 0);
    }

    #[test]
    fn empty_file_name_is_rejected() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        assert!(matches!(
            store.add_document(text_doc("", b"content")),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_document(text_doc("   ", b"content")),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn capacity_predicates_flip_past_the_ceilings() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        assert!(store.is_within_size_limit().unwrap());
        assert!(store.is_within_count_limit().unwrap());

        for i in 0..51 {
            store.add_document(text_doc(&format!("doc-{i}.txt"), b"x")).unwrap();
        }
        assert!(!store.is_within_count_limit().unwrap());
        // 51 one-byte documents are still far under the size ceiling.
        assert!(store.is_within_size_limit().unwrap());
    }

    #[test]
    fn counters_survive_verification() {
        let mut store = SafeStore::create_empty("s", "").unwrap();
        store.add_document(text_doc("a.txt", b"aaaa")).unwrap();
        store.add_document(text_doc("b.txt", b"bb")).unwrap();

        assert!(store.verify_counters().unwrap());
        let meta = store.metadata().unwrap();
        assert_eq!(meta.total_size, 6);
        assert_eq!(meta.document_count, 2);
    }
}
