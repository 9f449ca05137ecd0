pub mod issuer;
pub mod password;
pub mod revocation;
pub mod token;
pub mod validator;
pub mod verifier;

pub use issuer::TokenIssuer;
pub use password::{hash_password, verify_password};
pub use revocation::RevocationLedger;
pub use token::{generate_secure_token, hash_token};
pub use validator::TokenValidator;
pub use verifier::CredentialVerifier;
