//! Storage contracts the authentication components are written against.
//!
//! Two backends ship with the crate: [`MemoryStore`] for tests and
//! single-process deployments, and [`DatabaseStore`] over sea-orm.

use chrono::{DateTime, Utc};

use crate::error::AuthError;
use crate::models::{Account, TokenRecord};

pub mod database;
pub mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

/// Read access to provisioned accounts and their password hashes.
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Case-insensitive, exact-match lookup by identifier.
    async fn lookup(&self, identifier: &str) -> Result<Option<Account>, AuthError>;

    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, AuthError>;
}

/// The issued-token index, keyed by token digest.
#[async_trait::async_trait]
pub trait TokenIndex: Send + Sync {
    /// Atomically insert a full record. The record is resolvable once this returns.
    async fn insert(&self, record: TokenRecord) -> Result<(), AuthError>;

    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, AuthError>;

    /// Set the revoked flag. Returns `false` if no such token exists.
    async fn set_revoked(&self, token_hash: &str) -> Result<bool, AuthError>;

    /// Revoke every unrevoked token of an account. Returns how many flipped.
    async fn revoke_account(&self, account_id: i32) -> Result<u64, AuthError>;

    /// Delete every record with `expires_at < now`. Returns how many went.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}
