use chrono::{DateTime, NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use std::fmt;

/// Issued access token entity. Only the SHA-256 digest of the token is stored.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "access_tokens")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// The account that owns this token
    pub account_id: i32,

    /// Hex SHA-256 of the raw token
    #[sea_orm(unique)]
    pub token_hash: String,

    /// Caller-chosen label
    pub name: String,

    pub issued_at: NaiveDateTime,

    pub expires_at: NaiveDateTime,

    /// Set once on revocation, never cleared
    #[sea_orm(default_value = false)]
    pub revoked: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A token as held by the token index, keyed by digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRecord {
    pub token_hash: String,
    pub account_id: i32,
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl TokenRecord {
    /// Expiry is inclusive: a token is dead at exactly `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl From<Model> for TokenRecord {
    fn from(model: Model) -> Self {
        TokenRecord {
            token_hash: model.token_hash,
            account_id: model.account_id,
            name: model.name,
            issued_at: model.issued_at.and_utc(),
            expires_at: model.expires_at.and_utc(),
            revoked: model.revoked,
        }
    }
}

/// A freshly minted token. `token_id` is the bearer secret handed to the
/// client and exists nowhere else.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token_id: String,
    pub account_id: i32,
    pub name: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token_id", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("name", &self.name)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
