use argon2::{
    Argon2, Params, PasswordHash, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::auth::token::generate_secure_token;
use crate::error::AuthError;

/// Hash a plaintext password using Argon2.
///
/// This is the provisioning side of the contract: accounts are stored with
/// hashes produced here, and [`verify_password`] expects the same format.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored hash.
///
/// The password is re-hashed with the stored salt and parameters, and the
/// two Argon2 outputs are compared in constant time.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| AuthError::Internal("Malformed password hash".to_string()))?;
    let params = Params::try_from(&parsed)
        .map_err(|_| AuthError::Internal("Unsupported password hash parameters".to_string()))?;
    let expected = parsed
        .hash
        .ok_or_else(|| AuthError::Internal("Password hash has no output".to_string()))?;
    let salt = parsed
        .salt
        .ok_or_else(|| AuthError::Internal("Password hash has no salt".to_string()))?;

    let computed = Argon2::default()
        .hash_password_customized(
            password.as_bytes(),
            Some(parsed.algorithm),
            parsed.version,
            params,
            salt,
        )
        .map_err(|_| AuthError::Internal("Failed to recompute password hash".to_string()))?;
    let computed = computed
        .hash
        .ok_or_else(|| AuthError::Internal("Password hash has no output".to_string()))?;

    Ok(bool::from(computed.as_bytes().ct_eq(expected.as_bytes())))
}

/// A hash of a random throwaway password, verified against when an
/// identifier is unknown so that path costs one full Argon2 run too.
#[derive(Clone)]
pub struct DecoyHash(Arc<str>);

impl DecoyHash {
    pub fn generate() -> Result<Self, AuthError> {
        hash_password(&generate_secure_token()).map(|hash| DecoyHash(hash.into()))
    }

    /// Burn one verification. Always reports a mismatch.
    pub fn verify(&self, password: &str) -> bool {
        let _ = verify_password(password, &self.0);
        false
    }
}
