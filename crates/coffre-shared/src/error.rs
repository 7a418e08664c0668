use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Authentication failed: wrong key or tampered ciphertext")]
    AuthenticationFailed,
}
