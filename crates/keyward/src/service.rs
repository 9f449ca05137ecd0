use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::auth::{CredentialVerifier, RevocationLedger, TokenIssuer, TokenValidator};
use crate::clock::{Clock, SystemClock};
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::AccountView;
use crate::store::{SecretStore, TokenIndex};

// ── Request / response types ──

/// Credentials presented for a new token.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub identifier: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Label for the issued token; the configured default when absent
    #[serde(default)]
    pub token_name: Option<String>,
}

impl AuthenticateRequest {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        AuthenticateRequest {
            identifier: identifier.into(),
            password: password.into(),
            token_name: None,
        }
    }

    pub fn with_token_name(mut self, name: impl Into<String>) -> Self {
        self.token_name = Some(name.into());
        self
    }
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("token_name", &self.token_name)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AuthenticateResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateResponse")
            .field("token_id", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub account_id: i32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct RevokeRequest {
    pub token_id: String,
}

// ── Service ──

/// Entry point for the transport layer: one call per operation.
///
/// All state is explicit. Callers pass the token they hold and get the
/// account back; nothing is remembered between calls.
#[derive(Clone)]
pub struct AuthService {
    verifier: CredentialVerifier,
    issuer: TokenIssuer,
    validator: TokenValidator,
    ledger: RevocationLedger,
    token_name: String,
    retry_backoff: Duration,
}

impl AuthService {
    /// Build a service over a store that holds both accounts and tokens.
    pub fn new<S>(store: S, config: &AuthConfig) -> Result<Self, AuthError>
    where
        S: SecretStore + TokenIndex + 'static,
    {
        Self::with_clock(store, Arc::new(SystemClock), config)
    }

    pub fn with_clock<S>(
        store: S,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Result<Self, AuthError>
    where
        S: SecretStore + TokenIndex + 'static,
    {
        let store = Arc::new(store);
        let secrets: Arc<dyn SecretStore> = store.clone();
        let tokens: Arc<dyn TokenIndex> = store;
        Self::from_parts(secrets, tokens, clock, config)
    }

    /// Build a service from separately-backed secret and token stores.
    pub fn from_parts(
        secrets: Arc<dyn SecretStore>,
        tokens: Arc<dyn TokenIndex>,
        clock: Arc<dyn Clock>,
        config: &AuthConfig,
    ) -> Result<Self, AuthError> {
        Ok(AuthService {
            verifier: CredentialVerifier::new(secrets.clone())?,
            issuer: TokenIssuer::new(
                secrets.clone(),
                tokens.clone(),
                clock.clone(),
                config.token_ttl(),
            ),
            validator: TokenValidator::new(secrets, tokens.clone(), clock.clone()),
            ledger: RevocationLedger::new(tokens, clock),
            token_name: config.token_name.clone(),
            retry_backoff: config.retry_backoff(),
        })
    }

    pub fn verifier(&self) -> &CredentialVerifier {
        &self.verifier
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    pub fn ledger(&self) -> &RevocationLedger {
        &self.ledger
    }

    /// Verify credentials and issue a token.
    pub async fn authenticate(
        &self,
        request: AuthenticateRequest,
    ) -> Result<AuthenticateResponse, AuthError> {
        let identifier = request.identifier.as_str();
        let password = request.password.as_str();
        let account = self
            .with_retry("verify", move || self.verifier.verify(identifier, password))
            .await?;

        let name = request
            .token_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.token_name.as_str());
        // Not retried: a failed insert may still have committed, and a
        // second attempt would mint a token nobody receives.
        let token = self.issuer.issue(&account, name).await?;

        Ok(AuthenticateResponse {
            token_id: token.token_id,
            expires_at: token.expires_at,
        })
    }

    /// Resolve a token to the id of the account it was issued to.
    pub async fn validate(&self, request: ValidateRequest) -> Result<ValidateResponse, AuthError> {
        let token_id = request.token_id.as_str();
        let account = self
            .with_retry("validate", move || self.validator.validate(token_id))
            .await?;
        Ok(ValidateResponse {
            account_id: account.id,
        })
    }

    pub async fn revoke(&self, request: RevokeRequest) -> Result<(), AuthError> {
        let token_id = request.token_id.as_str();
        self.with_retry("revoke", move || self.ledger.revoke(token_id))
            .await
    }

    /// The public view of the account owning a valid token.
    pub async fn current_account(&self, token_id: &str) -> Result<AccountView, AuthError> {
        let account = self
            .with_retry("validate", move || self.validator.validate(token_id))
            .await?;
        Ok(account.into())
    }

    /// Revoke every token of the account owning `token_id`, including it.
    pub async fn revoke_all(&self, token_id: &str) -> Result<u64, AuthError> {
        let account = self
            .with_retry("validate", move || self.validator.validate(token_id))
            .await?;
        let account_id = account.id;
        self.with_retry("revoke_all", move || self.ledger.revoke_all(account_id))
            .await
    }

    /// Start the periodic sweep of expired tokens.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        self.ledger.spawn_sweeper(every)
    }

    /// Run `attempt`, retrying once after the backoff if storage failed.
    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        mut attempt: F,
    ) -> Result<T, AuthError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AuthError>>,
    {
        match attempt().await {
            Err(AuthError::StorageUnavailable(reason)) => {
                warn!(operation, %reason, "storage unavailable, retrying once");
                tokio::time::sleep(self.retry_backoff).await;
                attempt().await
            }
            other => other,
        }
    }
}
