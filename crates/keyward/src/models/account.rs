use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account entity. Rows are provisioned externally; keyward only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Trimmed, lower-cased login identifier (usually an email address)
    #[sea_orm(unique)]
    pub identifier: String,

    /// PHC-format Argon2 hash
    pub password_hash: String,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Canonical form used for storing and looking up identifiers.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// An account as seen by the credential verifier.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i32,
    pub identifier: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            id: model.id,
            identifier: model.identifier,
            password_hash: model.password_hash,
            created_at: model.created_at.and_utc(),
        }
    }
}

/// Public account data (safe to hand back to callers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: i32,
    pub identifier: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        AccountView {
            id: account.id,
            identifier: account.identifier,
            created_at: account.created_at,
        }
    }
}

/// Provisioning input: an identifier and an already-hashed password.
#[derive(Clone)]
pub struct NewAccount {
    pub identifier: String,
    pub password_hash: String,
}

impl NewAccount {
    pub fn new(identifier: impl Into<String>, password_hash: impl Into<String>) -> Self {
        NewAccount {
            identifier: identifier.into(),
            password_hash: password_hash.into(),
        }
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("identifier", &self.identifier)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
