//! Opaque-token authentication core.
//!
//! Credentials are checked by [`CredentialVerifier`], tokens are minted by
//! [`TokenIssuer`], resolved by [`TokenValidator`] and revoked or swept by
//! [`RevocationLedger`]. [`AuthService`] wires them together behind one
//! call per operation for whatever transport sits in front.

pub mod auth;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod service;
pub mod store;
pub mod testing;

pub use auth::{CredentialVerifier, RevocationLedger, TokenIssuer, TokenValidator};
pub use clock::{Clock, SystemClock};
pub use config::AuthConfig;
pub use error::AuthError;
pub use models::{Account, AccountView, IssuedToken, NewAccount};
pub use service::{
    AuthService, AuthenticateRequest, AuthenticateResponse, RevokeRequest, ValidateRequest,
    ValidateResponse,
};
pub use store::{DatabaseStore, MemoryStore, SecretStore, TokenIndex};
