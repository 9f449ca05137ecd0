use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::{SecretStore, TokenIndex};
use crate::error::AuthError;
use crate::models::{Account, NewAccount, TokenRecord, access_token, account, normalize_identifier};

/// sea-orm backed accounts and token index.
///
/// Every operation is one SQL statement, so inserts and flag flips are
/// atomic and sweep deletes a single expiry range.
#[derive(Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        DatabaseStore { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Provision an account with a pre-hashed password.
    pub async fn insert_account(&self, new: NewAccount) -> Result<Account, AuthError> {
        let identifier = normalize_identifier(&new.identifier);
        if self.lookup(&identifier).await?.is_some() {
            return Err(AuthError::Internal(
                "Account identifier already provisioned".to_string(),
            ));
        }

        let model = account::ActiveModel {
            identifier: Set(identifier),
            password_hash: Set(new.password_hash),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Ok(model.insert(&self.db).await?.into())
    }

    pub async fn remove_account(&self, account_id: i32) -> Result<bool, AuthError> {
        let result = account::Entity::delete_by_id(account_id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Drop every account and token.
    pub async fn truncate(&self) -> Result<(), AuthError> {
        access_token::Entity::delete_many().exec(&self.db).await?;
        account::Entity::delete_many().exec(&self.db).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SecretStore for DatabaseStore {
    async fn lookup(&self, identifier: &str) -> Result<Option<Account>, AuthError> {
        let found = account::Entity::find()
            .filter(account::Column::Identifier.eq(normalize_identifier(identifier)))
            .one(&self.db)
            .await?;
        Ok(found.map(Account::from))
    }

    async fn find_by_id(&self, account_id: i32) -> Result<Option<Account>, AuthError> {
        let found = account::Entity::find_by_id(account_id).one(&self.db).await?;
        Ok(found.map(Account::from))
    }
}

#[async_trait::async_trait]
impl TokenIndex for DatabaseStore {
    async fn insert(&self, record: TokenRecord) -> Result<(), AuthError> {
        let model = access_token::ActiveModel {
            account_id: Set(record.account_id),
            token_hash: Set(record.token_hash),
            name: Set(record.name),
            issued_at: Set(record.issued_at.naive_utc()),
            expires_at: Set(record.expires_at.naive_utc()),
            revoked: Set(record.revoked),
            ..Default::default()
        };
        model.insert(&self.db).await?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<TokenRecord>, AuthError> {
        let found = access_token::Entity::find()
            .filter(access_token::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await?;
        Ok(found.map(TokenRecord::from))
    }

    async fn set_revoked(&self, token_hash: &str) -> Result<bool, AuthError> {
        let result = access_token::Entity::update_many()
            .col_expr(access_token::Column::Revoked, Expr::value(true))
            .filter(access_token::Column::TokenHash.eq(token_hash))
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            return Ok(true);
        }
        // Some drivers report zero rows when the flag was already set.
        Ok(self.find(token_hash).await?.is_some())
    }

    async fn revoke_account(&self, account_id: i32) -> Result<u64, AuthError> {
        let result = access_token::Entity::update_many()
            .col_expr(access_token::Column::Revoked, Expr::value(true))
            .filter(access_token::Column::AccountId.eq(account_id))
            .filter(access_token::Column::Revoked.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = access_token::Entity::delete_many()
            .filter(access_token::Column::ExpiresAt.lt(now.naive_utc()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
