use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::{
    IDENTIFIER_SIZE, MIN_IDENTIFIER_CHARS, MIN_SEED_CHARS, SEED_SIZE, URL_SAFE_SEGMENT,
};

/// The link addressing one safe.
///
/// Possession of the URL equals possession of the safe: the identifier is
/// the public storage address, the seed is the decryption secret. Neither is
/// ever stored server-side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecureUrl {
    /// Unpadded base64url of 16 random bytes.
    pub identifier: String,
    /// Unpadded base64url of 32 random bytes.
    pub seed: String,
    /// `<origin>/safe/<identifier>/<seed>`
    pub full_url: String,
}

impl SecureUrl {
    /// Mint a fresh safe link under `origin`.
    ///
    /// Identifier and seed are drawn independently from the OS CSPRNG and
    /// are never reused across safes.
    pub fn generate(origin: &str) -> Self {
        let mut identifier_bytes = [0u8; IDENTIFIER_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut identifier_bytes);

        let mut seed_bytes = [0u8; SEED_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut seed_bytes);

        let identifier = base64_url_encode(&identifier_bytes);
        let seed = base64_url_encode(&seed_bytes);
        let full_url = format!(
            "{}/{}/{}/{}",
            origin.trim_end_matches('/'),
            URL_SAFE_SEGMENT,
            identifier,
            seed
        );

        Self {
            identifier,
            seed,
            full_url,
        }
    }

    /// Validating parser for safe links. Returns `None` for anything that is
    /// not `scheme://authority/safe/<identifier>/<seed>` with both segments
    /// decoding to at least 16 and 32 bytes respectively. Never panics.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.trim();

        let (scheme, rest) = url.split_once("://")?;
        if scheme.is_empty()
            || !scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        {
            return None;
        }

        let (authority, path) = rest.split_once('/')?;
        if authority.is_empty() {
            return None;
        }

        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() != 3 || segments[0] != URL_SAFE_SEGMENT {
            return None;
        }

        let identifier = segments[1];
        let seed = segments[2];

        // Fast pre-check on encoded lengths before decoding.
        if identifier.len() < MIN_IDENTIFIER_CHARS || seed.len() < MIN_SEED_CHARS {
            return None;
        }

        if base64_url_decode(identifier).ok()?.len() < IDENTIFIER_SIZE {
            return None;
        }
        if base64_url_decode(seed).ok()?.len() < SEED_SIZE {
            return None;
        }

        Some(Self {
            identifier: identifier.to_string(),
            seed: seed.to_string(),
            full_url: url.to_string(),
        })
    }

    /// Decoded raw identifier bytes (storage address, KDF salt input).
    pub fn identifier_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64_url_decode(&self.identifier)
    }

    /// Decoded raw seed bytes (KDF input key material).
    pub fn seed_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64_url_decode(&self.seed)
    }
}

pub fn base64_url_encode(data: &[u8]) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    URL_SAFE_NO_PAD.encode(data)
}

pub fn base64_url_decode(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    URL_SAFE_NO_PAD.decode(s.trim())
}
