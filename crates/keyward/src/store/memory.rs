use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{SecretStore, TokenIndex};
use crate::error::AuthError;
use crate::models::{Account, NewAccount, TokenRecord, normalize_identifier};

/// In-memory accounts and token index.
///
/// Clones share the same maps. Each operation takes one lock for the
/// duration of a single map access, so a revocation is visible to every
/// lookup that starts after it returns.
#[derive(Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<Accounts>>,
    tokens: Arc<RwLock<HashMap<String, TokenRecord>>>,
}

#[derive(Default)]
struct Accounts {
    next_id: i32,
    by_id: HashMap<i32, Account>,
    by_identifier: HashMap<String, i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an account with a pre-hashed password.
    pub async fn insert_account(&self, new: NewAccount) -> Result<Account, AuthError> {
        let identifier = normalize_identifier(&new.identifier);
        let mut accounts = self.accounts.write().await;

        if accounts.by_identifier.contains_key(&identifier) {
            return Err(AuthError::Internal(
                "Account identifier already provisioned".to_string(),
            ));
        }

        accounts.next_id += 1;
        let account = Account {
            id: accounts.next_id,
            identifier: identifier.clone(),
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };
        accounts.by_identifier.insert(identifier, account.id);
        accounts.by_id.insert(account.id, account.clone());
        Ok(account)
    }

    /// Remove an account. Tokens it owns stay in the index but no longer
    /// resolve to an account.
    pub async fn remove_account(&self, account_id: i32) -> bool {
        let mut accounts = self.accounts.write().await;
        match accounts.by_id.remove(&account_id) {
            Some(account) => {
                accounts.by_identifier.remove(&account.identifier);
                true
            }
            None => false,
        }
    }

    /// Drop every account and token.
    pub async fn truncate(&self) {
        *self.accounts.write().await = Accounts::default();
        self.tokens.write().await.clear();
    }

    pub async fn token_count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait::async_trait]
impl SecretStore for MemoryStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<Account>, AuthError> {
        let identifier = normalize_identifier(identifier);
        let accounts = self.accounts.read().await;
        Ok(accounts
            .by_identifier
            .get(&identifier)
            .and_then(|id| accounts.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, AuthError> {
        Ok(self.accounts.read().await.by_id.get(&account_id).cloned())
    }
}

#[async_trait::async_trait]
impl TokenIndex for MemoryStore {
    async fn insert(&self, record: TokenRecord) -> Result<(), AuthError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&record.token_hash) {
            return Err(AuthError::Internal("Token digest collision".to_string()));
        }
        tokens.insert(record.token_hash.clone(), record);
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, AuthError> {
        Ok(self.tokens.read().await.get(token_hash).cloned())
    }

    async fn set_revoked(&self, token_hash: &str) -> Result<bool, AuthError> {
        match self.tokens.write().await.get_mut(token_hash) {
            Some(record) => {
                record.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_account(&self, account_id: i32) -> Result<u64, AuthError> {
        let mut revoked = 0;
        for record in self.tokens.write().await.values_mut() {
            if record.account_id == account_id && !record.revoked {
                record.revoked = true;
                revoked += 1;
            }
        }
        Ok(revoked)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, record| record.expires_at >= now);
        Ok((before - tokens.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(hash: &str, account_id: i32, expires_at: DateTime<Utc>) -> TokenRecord {
        TokenRecord {
            token_hash: hash.to_string(),
            account_id,
            name: "api".to_string(),
            issued_at: expires_at - Duration::hours(24),
            expires_at,
            revoked: false,
        }
    }

    #[tokio::test]
    async fn lookup_ignores_identifier_case() {
        let store = MemoryStore::new();
        store
            .insert_account(NewAccount::new("Test@User.com", "hash"))
            .await
            .unwrap();

        let found = store.lookup("TEST@user.COM").await.unwrap();
        assert_eq!(found.map(|a| a.identifier), Some("test@user.com".into()));
        assert!(store.lookup("test@user").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_identifier_is_rejected() {
        let store = MemoryStore::new();
        store
            .insert_account(NewAccount::new("a@b.com", "hash"))
            .await
            .unwrap();
        assert!(
            store
                .insert_account(NewAccount::new("A@B.com", "hash"))
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_records() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.insert(record("old", 1, now - Duration::seconds(1))).await.unwrap();
        store.insert(record("edge", 1, now)).await.unwrap();
        store.insert(record("live", 1, now + Duration::hours(1))).await.unwrap();

        assert_eq!(store.delete_expired(now).await.unwrap(), 1);
        assert!(store.find("old").await.unwrap().is_none());
        assert!(store.find("edge").await.unwrap().is_some());
        assert!(store.find("live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn revoke_account_only_touches_that_account() {
        let store = MemoryStore::new();
        let later = Utc::now() + Duration::hours(1);
        store.insert(record("a1", 1, later)).await.unwrap();
        store.insert(record("a2", 1, later)).await.unwrap();
        store.insert(record("b1", 2, later)).await.unwrap();

        assert_eq!(store.revoke_account(1).await.unwrap(), 2);
        assert_eq!(store.revoke_account(1).await.unwrap(), 0);
        assert!(!store.find("b1").await.unwrap().unwrap().revoked);
    }
}
