/// Application name
pub const APP_NAME: &str = "Coffre";

/// URL path segment preceding the identifier and seed
pub const URL_SAFE_SEGMENT: &str = "safe";

/// Raw identifier size in bytes (public, addresses the safe in remote storage)
pub const IDENTIFIER_SIZE: usize = 16;

/// Raw seed size in bytes (secret, sole input of the key derivation)
pub const SEED_SIZE: usize = 32;

/// Minimum encoded identifier length accepted by the URL parser.
/// Unpadded base64url of 16 bytes is 22 chars; 20 is the fast pre-check.
pub const MIN_IDENTIFIER_CHARS: usize = 20;

/// Minimum encoded seed length accepted by the URL parser.
/// Unpadded base64url of 32 bytes is 43 chars; 40 is the fast pre-check.
pub const MIN_SEED_CHARS: usize = 40;

/// AES-256-GCM nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// Symmetric key size in bytes
pub const SYMMETRIC_KEY_SIZE: usize = 32;

/// PBKDF2-HMAC-SHA-256 iteration count
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Maximum size of a single document (1 MiB)
pub const MAX_DOCUMENT_SIZE: usize = 1024 * 1024;

/// Maximum total document bytes in one safe (10 MiB)
pub const MAX_SAFE_SIZE: i64 = 10 * 1024 * 1024;

/// Maximum number of documents in one safe
pub const MAX_DOCUMENTS: i64 = 50;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;
