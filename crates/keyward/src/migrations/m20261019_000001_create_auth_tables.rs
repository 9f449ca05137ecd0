use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── accounts ──
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Identifier)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ── access_tokens ──
        manager
            .create_table(
                Table::create()
                    .table(AccessTokens::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessTokens::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessTokens::AccountId).integer().not_null())
                    .col(
                        ColumnDef::new(AccessTokens::TokenHash)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AccessTokens::Name).string().not_null())
                    .col(ColumnDef::new(AccessTokens::IssuedAt).timestamp().not_null())
                    .col(ColumnDef::new(AccessTokens::ExpiresAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(AccessTokens::Revoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Sweep deletes by expiry range.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_access_tokens_expires_at")
                    .table(AccessTokens::Table)
                    .col(AccessTokens::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_access_tokens_account_id")
                    .table(AccessTokens::Table)
                    .col(AccessTokens::AccountId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    Identifier,
    PasswordHash,
    CreatedAt,
}

#[derive(Iden)]
enum AccessTokens {
    Table,
    Id,
    AccountId,
    TokenHash,
    Name,
    IssuedAt,
    ExpiresAt,
    Revoked,
}
