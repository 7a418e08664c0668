//! End-to-end safe orchestration: create, open, save.
//!
//! Every operation is one network round-trip plus one CPU-bound crypto pass.
//! PBKDF2 at 100k iterations takes tens of milliseconds, so the derive and
//! AEAD steps run on the blocking pool instead of the async runtime.

use tokio::task;
use tracing::info;

use coffre_shared::crypto::{decrypt, derive_key, encrypt};
use coffre_shared::SecureUrl;
use coffre_store::{SafeStore, StoreError};

use crate::error::{Result, SafeError};
use crate::transport::Transport;

/// Session value orchestrating the crypto, store and transport layers.
///
/// Holds only the transport handle and the public origin used to mint safe
/// links; all safe state lives in the [`SafeStore`] flowing through the
/// calls.
pub struct SafeManager<T: Transport> {
    transport: T,
    origin: String,
}

impl<T: Transport> SafeManager<T> {
    pub fn new(transport: T, origin: impl Into<String>) -> Self {
        Self {
            transport,
            origin: origin.into(),
        }
    }

    /// Create an empty safe, upload its encrypted image and return the link.
    ///
    /// Upload is the only externally visible side effect and runs last; a
    /// failure at any earlier step leaves nothing behind anywhere.
    pub async fn create_new_safe(&self, name: &str, description: &str) -> Result<String> {
        let url = SecureUrl::generate(&self.origin);
        let seed = url.seed_bytes().map_err(|_| SafeError::InvalidUrl)?;
        let identifier = url.identifier_bytes().map_err(|_| SafeError::InvalidUrl)?;

        let store = SafeStore::create_empty(name, description)?;
        let image = store.export()?;

        let blob = task::spawn_blocking(move || {
            let key = derive_key(&seed, &identifier);
            encrypt(&key, &image)
        })
        .await??;

        self.transport.upload(&url.identifier, &blob).await?;

        info!(identifier = %url.identifier, bytes = blob.len(), "safe created");
        Ok(url.full_url)
    }

    /// Open a safe from its link and return the canonical store image.
    ///
    /// The image is re-exported after import so callers always receive a
    /// schema-validated byte form, never raw decrypted bytes that merely
    /// happened to decrypt.
    pub async fn open_safe(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = SecureUrl::parse(url).ok_or(SafeError::InvalidUrl)?;
        let seed = parsed.seed_bytes().map_err(|_| SafeError::InvalidUrl)?;
        let identifier = parsed.identifier_bytes().map_err(|_| SafeError::InvalidUrl)?;

        let blob = self.transport.download(&parsed.identifier).await?;

        let image = task::spawn_blocking(move || {
            let key = derive_key(&seed, &identifier);
            decrypt(&key, &blob)
        })
        .await??;

        let store = SafeStore::import(&image)?;

        info!(identifier = %parsed.identifier, "safe opened");
        Ok(store.export()?)
    }

    /// Re-encrypt and re-upload an opened safe under its existing link.
    ///
    /// The aggregate capacity ceilings are advisory at document-write time
    /// but hard here: an over-limit safe is refused before anything is sent.
    pub async fn save_safe(&self, url: &str, store: &SafeStore) -> Result<()> {
        let parsed = SecureUrl::parse(url).ok_or(SafeError::InvalidUrl)?;
        let seed = parsed.seed_bytes().map_err(|_| SafeError::InvalidUrl)?;
        let identifier = parsed.identifier_bytes().map_err(|_| SafeError::InvalidUrl)?;

        if !store.is_within_size_limit()? {
            return Err(
                StoreError::Validation("safe exceeds the total size limit".to_string()).into(),
            );
        }
        if !store.is_within_count_limit()? {
            return Err(
                StoreError::Validation("safe exceeds the document count limit".to_string()).into(),
            );
        }

        let image = store.export()?;
        let blob = task::spawn_blocking(move || {
            let key = derive_key(&seed, &identifier);
            encrypt(&key, &image)
        })
        .await??;

        self.transport.upload(&parsed.identifier, &blob).await?;

        info!(identifier = %parsed.identifier, bytes = blob.len(), "safe saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MemoryTransport, TransportError};
    use coffre_shared::url::base64_url_encode;
    use coffre_shared::CryptoError;
    use coffre_store::DocumentInput;

    const ORIGIN: &str = "https://coffre.test";

    fn manager() -> SafeManager<MemoryTransport> {
        SafeManager::new(MemoryTransport::new(), ORIGIN)
    }

    fn text_doc(name: &str, content: &[u8]) -> DocumentInput {
        DocumentInput {
            file_name: name.to_string(),
            mime_type: "text/plain".to_string(),
            content: content.to_vec(),
        }
    }

    #[tokio::test]
    async fn create_then_open_roundtrips() {
        let manager = manager();
        let url = manager.create_new_safe("Test Safe", "desc").await.unwrap();
        assert!(url.starts_with("https://coffre.test/safe/"));

        let image = manager.open_safe(&url).await.unwrap();
        let store = SafeStore::import(&image).unwrap();
        let meta = store.metadata().unwrap();

        assert_eq!(meta.name, "Test Safe");
        assert_eq!(meta.description, "desc");
        assert_eq!(meta.document_count, 0);
        assert_eq!(meta.total_size, 0);
    }

    #[tokio::test]
    async fn save_then_reopen_sees_new_documents() {
        let manager = manager();
        let url = manager.create_new_safe("Papiers", "").await.unwrap();

        let image = manager.open_safe(&url).await.unwrap();
        let mut store = SafeStore::import(&image).unwrap();
        store.add_document(text_doc("note.txt", b"rendez-vous jeudi")).unwrap();
        manager.save_safe(&url, &store).await.unwrap();

        let reopened = SafeStore::import(&manager.open_safe(&url).await.unwrap()).unwrap();
        let documents = reopened.list_documents().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].file_name, "note.txt");
        assert_eq!(documents[0].content, b"rendez-vous jeudi");
    }

    #[tokio::test]
    async fn open_with_wrong_seed_fails_authentication() {
        let manager = manager();
        let url = manager.create_new_safe("s", "").await.unwrap();

        // Same identifier, different seed: downloads fine, never decrypts.
        let parsed = SecureUrl::parse(&url).unwrap();
        let wrong_seed = base64_url_encode(&[0x42u8; 32]);
        let tampered = format!("{ORIGIN}/safe/{}/{}", parsed.identifier, wrong_seed);

        let result = manager.open_safe(&tampered).await;
        assert!(matches!(
            result,
            Err(SafeError::Crypto(CryptoError::AuthenticationFailed))
        ));
    }

    #[tokio::test]
    async fn open_with_invalid_url_fails_fast() {
        let manager = manager();
        assert!(matches!(
            manager.open_safe("not-a-url").await,
            Err(SafeError::InvalidUrl)
        ));
        assert!(matches!(
            manager.open_safe("https://h/safe/short").await,
            Err(SafeError::InvalidUrl)
        ));
    }

    #[tokio::test]
    async fn open_unknown_identifier_is_not_found() {
        let manager = manager();
        let url = SecureUrl::generate(ORIGIN);

        assert!(matches!(
            manager.open_safe(&url.full_url).await,
            Err(SafeError::Transport(TransportError::NotFound))
        ));
    }

    #[tokio::test]
    async fn save_refuses_over_count_safe() {
        let manager = manager();
        let url = manager.create_new_safe("plein", "").await.unwrap();

        let mut store = SafeStore::import(&manager.open_safe(&url).await.unwrap()).unwrap();
        for i in 0..51 {
            store.add_document(text_doc(&format!("doc-{i}.txt"), b"x")).unwrap();
        }

        assert!(matches!(
            manager.save_safe(&url, &store).await,
            Err(SafeError::Store(StoreError::Validation(_)))
        ));

        // The remote copy still holds the last uploaded (empty) state.
        let remote = SafeStore::import(&manager.open_safe(&url).await.unwrap()).unwrap();
        assert_eq!(remote.metadata().unwrap().document_count, 0);
    }
}
