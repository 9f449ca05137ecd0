use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::password::{DecoyHash, verify_password};
use crate::error::AuthError;
use crate::models::Account;
use crate::store::SecretStore;

enum Outcome {
    Match(Account),
    Mismatch(i32),
    CorruptHash(i32),
    UnknownIdentifier,
}

/// Checks identifier/password pairs against the secret store.
///
/// Every failure is reported as [`AuthError::InvalidCredentials`]. An
/// unknown identifier or an unreadable stored hash still pays for one
/// Argon2 run against a decoy hash.
#[derive(Clone)]
pub struct CredentialVerifier {
    secrets: Arc<dyn SecretStore>,
    decoy: DecoyHash,
}

impl CredentialVerifier {
    pub fn new(secrets: Arc<dyn SecretStore>) -> Result<Self, AuthError> {
        Ok(CredentialVerifier {
            secrets,
            decoy: DecoyHash::generate()?,
        })
    }

    pub async fn verify(&self, identifier: &str, password: &str) -> Result<Account, AuthError> {
        let account = self.secrets.lookup(identifier).await?;
        let password = password.to_owned();
        let decoy = self.decoy.clone();

        // Argon2 is deliberately slow; keep it off the async workers.
        let outcome = tokio::task::spawn_blocking(move || match account {
            Some(account) => match verify_password(&password, &account.password_hash) {
                Ok(true) => Outcome::Match(account),
                Ok(false) => Outcome::Mismatch(account.id),
                Err(_) => {
                    decoy.verify(&password);
                    Outcome::CorruptHash(account.id)
                }
            },
            None => {
                decoy.verify(&password);
                Outcome::UnknownIdentifier
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?;

        match outcome {
            Outcome::Match(account) => {
                debug!(account_id = account.id, "credentials verified");
                Ok(account)
            }
            Outcome::Mismatch(account_id) => {
                warn!(account_id, "password mismatch");
                Err(AuthError::InvalidCredentials)
            }
            Outcome::CorruptHash(account_id) => {
                warn!(account_id, "stored password hash could not be parsed");
                Err(AuthError::InvalidCredentials)
            }
            Outcome::UnknownIdentifier => {
                warn!("verification attempted for unknown identifier");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
