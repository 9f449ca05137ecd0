use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;

use crate::config::AuthConfig;
use crate::migrations::Migrator;

/// Initialize the database connection from config.
pub async fn connect(config: &AuthConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opts = ConnectOptions::new(&config.database_url);
    opts.connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(config.is_dev());

    // Every SQLite in-memory connection is its own database, so the pool
    // must hold exactly one.
    if is_in_memory(&config.database_url) {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(100)
            .min_connections(5)
            .idle_timeout(Duration::from_secs(60))
            .max_lifetime(Duration::from_secs(1800));
    }

    SeaDatabase::connect(opts).await
}

/// Connect and bring the schema up to date.
pub async fn connect_and_migrate(
    config: &AuthConfig,
) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let db = connect(config).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

fn is_in_memory(url: &str) -> bool {
    url.starts_with("sqlite::memory:") || url.contains("mode=memory")
}
