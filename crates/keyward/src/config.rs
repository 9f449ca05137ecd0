use std::time::Duration;

use serde::Deserialize;

/// Upper bound on `token_ttl_hours` (ten years).
pub const MAX_TOKEN_TTL_HOURS: u64 = 24 * 365 * 10;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Database connection URL (e.g. sqlite::memory:, postgres://...)
    pub database_url: String,

    /// Lifetime of an issued token in hours (default: 24)
    pub token_ttl_hours: u64,

    /// Label given to tokens when the caller does not name one (default: api)
    pub token_name: String,

    /// How often the background sweeper purges expired tokens (default: 300)
    pub sweep_interval_secs: u64,

    /// Pause before the single retry of a storage-failing call (default: 50)
    pub storage_retry_backoff_ms: u64,

    /// Environment: development, production, test
    pub environment: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            database_url: "sqlite::memory:".to_string(),
            token_ttl_hours: 24,
            token_name: "api".to_string(),
            sweep_interval_secs: 300,
            storage_retry_backoff_ms: 50,
            environment: "development".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        let defaults = AuthConfig::default();
        AuthConfig {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            token_ttl_hours: Some(parse_var("TOKEN_TTL_HOURS", defaults.token_ttl_hours))
                .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
                .unwrap_or(defaults.token_ttl_hours),
            token_name: std::env::var("TOKEN_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.token_name),
            sweep_interval_secs: parse_var("SWEEP_INTERVAL_SECS", defaults.sweep_interval_secs),
            storage_retry_backoff_ms: parse_var(
                "STORAGE_RETRY_BACKOFF_MS",
                defaults.storage_retry_backoff_ms,
            ),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Token lifetime, capped at [`MAX_TOKEN_TTL_HOURS`].
    pub fn token_ttl(&self) -> chrono::Duration {
        let hours = self.token_ttl_hours.min(MAX_TOKEN_TTL_HOURS);
        chrono::Duration::hours(i64::try_from(hours).unwrap_or(24))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.storage_retry_backoff_ms)
    }
}

fn parse_var(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}
