use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::auth::token::{fingerprint, hash_token};
use crate::clock::Clock;
use crate::error::AuthError;
use crate::store::TokenIndex;

/// Revokes tokens and purges expired records from the token index.
///
/// Revocation only ever sets a flag, so a revoked token stays revoked until
/// it expires and is swept. Sweeping is a maintenance task; validation never
/// waits on it.
#[derive(Clone)]
pub struct RevocationLedger {
    tokens: Arc<dyn TokenIndex>,
    clock: Arc<dyn Clock>,
}

impl RevocationLedger {
    pub fn new(tokens: Arc<dyn TokenIndex>, clock: Arc<dyn Clock>) -> Self {
        RevocationLedger { tokens, clock }
    }

    /// Revoke a token. Revoking twice is not an error.
    pub async fn revoke(&self, token_id: &str) -> Result<(), AuthError> {
        let token_hash = hash_token(token_id);
        if !self.tokens.set_revoked(&token_hash).await? {
            return Err(AuthError::TokenUnknown);
        }
        info!(token = fingerprint(&token_hash), "token revoked");
        Ok(())
    }

    /// Revoke every token owned by an account (logout everywhere).
    pub async fn revoke_all(&self, account_id: i32) -> Result<u64, AuthError> {
        let revoked = self.tokens.revoke_account(account_id).await?;
        info!(account_id, revoked, "revoked all tokens for account");
        Ok(revoked)
    }

    /// Forget every token that expired before `now`.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        self.tokens.delete_expired(now).await
    }

    /// Run [`sweep`](Self::sweep) every `every` until the handle is aborted.
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let ledger = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match ledger.sweep(ledger.clock.now()).await {
                    Ok(0) => {}
                    Ok(removed) => info!(removed, "swept expired tokens"),
                    Err(e) => warn!(error = %e, "token sweep failed"),
                }
            }
        })
    }
}
