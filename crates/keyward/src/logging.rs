//! Logging and tracing initialization for keyward.
//!
//! Every component logs through `tracing`. Nothing is printed until the
//! embedding application installs a subscriber, which these helpers do.
//!
//! The level is controlled by the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Show token lookups and sweeps
//! RUST_LOG=keyward=debug cargo run
//!
//! # Quiet the SQL driver
//! RUST_LOG=keyward=info,sqlx=warn cargo run
//! ```
//!
//! Log events carry account ids and token fingerprints (a short prefix of
//! the stored digest). Passwords, hashes and raw tokens are never logged.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at `info` unless `RUST_LOG` says otherwise.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging() {
    init_logging_with_level("info");
}

/// Initialize logging with a fallback level used when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging (for log aggregation in production).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
