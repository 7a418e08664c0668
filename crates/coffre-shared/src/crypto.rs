use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use sha2::{Digest, Sha256};

use crate::constants::{NONCE_SIZE, PBKDF2_ITERATIONS, SYMMETRIC_KEY_SIZE};
use crate::error::CryptoError;

pub type SymmetricKey = [u8; SYMMETRIC_KEY_SIZE];

/// Derive the safe encryption key from the decoded seed and identifier.
///
/// salt = SHA-256(identifier). The identifier is public (it is part of the
/// URL and the storage address); using it as salt only prevents cross-safe
/// precomputation. The entire secret space comes from the 256-bit seed.
pub fn derive_key(seed: &[u8], identifier: &[u8]) -> SymmetricKey {
    let salt = Sha256::digest(identifier);

    let mut key = [0u8; SYMMETRIC_KEY_SIZE];
    pbkdf2_hmac::<Sha256>(seed, salt.as_slice(), PBKDF2_ITERATIONS, &mut key);
    key
}

// Returns nonce || ciphertext (12 bytes nonce prepended)
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    // Fresh random nonce on every call; a counter shared across processes
    // could repeat under the same key.
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    output.extend_from_slice(nonce.as_slice());
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

pub fn decrypt(key: &SymmetricKey, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.len() < NONCE_SIZE {
        return Err(CryptoError::AuthenticationFailed);
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SymmetricKey {
        derive_key(&[0x11u8; 32], &[0x22u8; 16])
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = b"Documents chiffres, lien unique.";

        let encrypted = encrypt(&key, plaintext).unwrap();
        let decrypted = decrypt(&key, &encrypted).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_encrypt_twice_differs() {
        let key = test_key();
        let plaintext = b"same plaintext";

        let first = encrypt(&key, plaintext).unwrap();
        let second = encrypt(&key, plaintext).unwrap();

        assert_ne!(first, second);
        assert_eq!(decrypt(&key, &first).unwrap(), plaintext);
        assert_eq!(decrypt(&key, &second).unwrap(), plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = derive_key(&[0x01u8; 32], &[0x22u8; 16]);
        let key2 = derive_key(&[0x02u8; 32], &[0x22u8; 16]);

        let encrypted = encrypt(&key1, b"secret").unwrap();
        assert!(matches!(
            decrypt(&key2, &encrypted),
            Err(CryptoError::AuthenticationFailed)
        ));
    }

    #[test]
    fn test_wrong_identifier_fails() {
        let key1 = derive_key(&[0x01u8; 32], &[0x22u8; 16]);
        let key2 = derive_key(&[0x01u8; 32], &[0x33u8; 16]);

        let encrypted = encrypt(&key1, b"secret").unwrap();
        assert!(decrypt(&key2, &encrypted).is_err());
    }

    #[test]
    fn test_independent_derivations_interchangeable() {
        // Two keys derived separately from the same inputs must cross-decrypt.
        let key1 = derive_key(&[0xAAu8; 32], &[0xBBu8; 16]);
        let key2 = derive_key(&[0xAAu8; 32], &[0xBBu8; 16]);

        let from_first = encrypt(&key1, b"cross").unwrap();
        let from_second = encrypt(&key2, b"cross").unwrap();

        assert_eq!(decrypt(&key2, &from_first).unwrap(), b"cross");
        assert_eq!(decrypt(&key1, &from_second).unwrap(), b"cross");
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = test_key();
        let mut encrypted = encrypt(&key, b"important").unwrap();
        let len = encrypted.len();
        encrypted[len - 1] ^= 0xFF;

        assert!(decrypt(&key, &encrypted).is_err());
    }

    #[test]
    fn test_truncated_blob_fails() {
        let key = test_key();
        assert!(decrypt(&key, &[]).is_err());
        assert!(decrypt(&key, &[0u8; 5]).is_err());
    }

    #[test]
    fn test_empty_plaintext_roundtrip() {
        let key = test_key();
        let encrypted = encrypt(&key, b"").unwrap();
        assert!(decrypt(&key, &encrypted).unwrap().is_empty());
    }
}
