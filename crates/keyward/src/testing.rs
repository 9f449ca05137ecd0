//! Test support: a controllable clock and a seeded service.
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn test_login() {
//!     let auth = TestAuth::new().await;
//!     let res = auth
//!         .service
//!         .authenticate(AuthenticateRequest::new(TEST_IDENTIFIER, TEST_PASSWORD))
//!         .await;
//!     assert!(res.is_ok());
//! }
//! ```

use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::{Arc, RwLock};

use crate::auth::hash_password;
use crate::clock::Clock;
use crate::config::AuthConfig;
use crate::db;
use crate::models::{Account, NewAccount};
use crate::service::AuthService;
use crate::store::{DatabaseStore, MemoryStore};

/// Identifier of the fixture account every [`TestAuth`] is seeded with.
pub const TEST_IDENTIFIER: &str = "test@user.com";

/// Password of the fixture account.
pub const TEST_PASSWORD: &str = "12345";

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: Arc::new(RwLock::new(start)),
        }
    }

    /// Starts at the current whole second, so stored timestamps round-trip exactly.
    pub fn starting_now() -> Self {
        Self::new(Utc::now().trunc_subsecs(0))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(|e| e.into_inner())
    }
}

/// Config used by [`TestAuth`]: in-memory SQLite, 24h tokens, no retry pause.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        database_url: "sqlite::memory:".to_string(),
        token_ttl_hours: 24,
        token_name: "test".to_string(),
        sweep_interval_secs: 60,
        storage_retry_backoff_ms: 0,
        environment: "test".to_string(),
    }
}

/// A service wired to a fresh store, a [`ManualClock`], and one seeded account.
pub struct TestAuth<S> {
    pub service: AuthService,
    pub store: S,
    pub clock: ManualClock,
    pub account: Account,
    pub config: AuthConfig,
}

impl TestAuth<MemoryStore> {
    /// Memory-backed service seeded with the fixture account.
    pub async fn new() -> Self {
        let config = test_config();
        let store = MemoryStore::new();
        let account = store
            .insert_account(fixture_account())
            .await
            .expect("Failed to seed test account");
        let clock = ManualClock::starting_now();
        let service = AuthService::with_clock(store.clone(), Arc::new(clock.clone()), &config)
            .expect("Failed to build test service");

        TestAuth {
            service,
            store,
            clock,
            account,
            config,
        }
    }
}

impl TestAuth<DatabaseStore> {
    /// SQLite-backed service (in memory, migrated) seeded with the fixture account.
    pub async fn with_database() -> Self {
        let config = test_config();
        let db = db::connect_and_migrate(&config)
            .await
            .expect("Failed to open test database");
        let store = DatabaseStore::new(db);
        let account = store
            .insert_account(fixture_account())
            .await
            .expect("Failed to seed test account");
        let clock = ManualClock::starting_now();
        let service = AuthService::with_clock(store.clone(), Arc::new(clock.clone()), &config)
            .expect("Failed to build test service");

        TestAuth {
            service,
            store,
            clock,
            account,
            config,
        }
    }
}

/// The fixture account, with its password hashed the way provisioning would.
pub fn fixture_account() -> NewAccount {
    fixture_account_for(TEST_IDENTIFIER)
}

/// Another account sharing the fixture password.
pub fn fixture_account_for(identifier: &str) -> NewAccount {
    NewAccount::new(
        identifier,
        hash_password(TEST_PASSWORD).expect("Failed to hash fixture password"),
    )
}
