use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Bytes of OS randomness in a token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically secure random token (hex-encoded).
pub fn generate_secure_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hash a token for storage. The index never sees the raw token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short prefix of a token digest, safe to put in logs.
pub fn fingerprint(token_hash: &str) -> &str {
    token_hash.get(..8).unwrap_or(token_hash)
}
