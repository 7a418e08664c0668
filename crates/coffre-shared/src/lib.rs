//! # coffre-shared
//!
//! Wire-stable primitives shared by every Coffre crate: the secure URL
//! codec, key derivation and AEAD encryption of safe images.
//!
//! Everything in this crate is part of the external protocol. The URL shape
//! (`<origin>/safe/<identifier>/<seed>`) and the blob shape
//! (`nonce[12] || AES-256-GCM ciphertext+tag`) must stay bit-exact across
//! implementations.

pub mod constants;
pub mod crypto;
pub mod url;

mod error;

pub use error::CryptoError;
pub use url::SecureUrl;
