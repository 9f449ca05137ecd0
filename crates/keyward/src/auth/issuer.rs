use chrono::Duration;
use std::sync::Arc;
use tracing::info;

use crate::auth::token::{fingerprint, generate_secure_token, hash_token};
use crate::clock::Clock;
use crate::error::AuthError;
use crate::models::{Account, IssuedToken, TokenRecord};
use crate::store::{SecretStore, TokenIndex};

/// Mints opaque bearer tokens and records them in the token index.
#[derive(Clone)]
pub struct TokenIssuer {
    secrets: Arc<dyn SecretStore>,
    tokens: Arc<dyn TokenIndex>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(
        secrets: Arc<dyn SecretStore>,
        tokens: Arc<dyn TokenIndex>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
    ) -> Self {
        TokenIssuer {
            secrets,
            tokens,
            clock,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `account`. The record is persisted before the
    /// token is returned, so it validates immediately.
    pub async fn issue(&self, account: &Account, name: &str) -> Result<IssuedToken, AuthError> {
        // The owner must still exist; no orphan tokens.
        if self.secrets.find_by_id(account.id).await?.is_none() {
            return Err(AuthError::InvalidCredentials);
        }

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;
        let token_id = generate_secure_token();
        let token_hash = hash_token(&token_id);

        let record = TokenRecord {
            token_hash,
            account_id: account.id,
            name: name.to_string(),
            issued_at,
            expires_at,
            revoked: false,
        };
        let token_fingerprint = fingerprint(&record.token_hash).to_string();
        self.tokens.insert(record).await?;

        info!(
            account_id = account.id,
            token = %token_fingerprint,
            %expires_at,
            "token issued"
        );

        Ok(IssuedToken {
            token_id,
            account_id: account.id,
            name: name.to_string(),
            issued_at,
            expires_at,
        })
    }
}
