use std::sync::Arc;
use tracing::debug;

use crate::auth::token::{fingerprint, hash_token};
use crate::clock::Clock;
use crate::error::AuthError;
use crate::models::Account;
use crate::store::{SecretStore, TokenIndex};

/// Resolves presented tokens to their accounts.
#[derive(Clone)]
pub struct TokenValidator {
    secrets: Arc<dyn SecretStore>,
    tokens: Arc<dyn TokenIndex>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        tokens: Arc<dyn TokenIndex>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        TokenValidator {
            secrets,
            tokens,
            clock,
        }
    }

    /// Expiry is checked before revocation. Never extends `expires_at`.
    pub async fn validate(&self, token_id: &str) -> Result<Account, AuthError> {
        let token_hash = hash_token(token_id);
        let record = self
            .tokens
            .find(&token_hash)
            .await?
            .ok_or(AuthError::TokenUnknown)?;

        if record.is_expired_at(self.clock.now()) {
            debug!(token = fingerprint(&token_hash), "token expired");
            return Err(AuthError::TokenExpired);
        }

        if record.revoked {
            debug!(token = fingerprint(&token_hash), "token revoked");
            return Err(AuthError::TokenRevoked);
        }

        // A token whose owner has since been deleted resolves to nothing.
        self.secrets
            .find_by_id(record.account_id)
            .await?
            .ok_or(AuthError::TokenUnknown)
    }
}
