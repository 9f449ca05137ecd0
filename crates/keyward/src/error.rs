use sea_orm::SqlErr;
use thiserror::Error;

/// Standard error type for keyward.
///
/// Messages never carry a plaintext password or a stored hash, and an
/// unknown identifier is reported exactly like a wrong password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is not recognised")]
    TokenUnknown,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token has been revoked")]
    TokenRevoked,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the error code string for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenUnknown => "TOKEN_UNKNOWN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenRevoked => "TOKEN_REVOKED",
            AuthError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the calling boundary may retry the operation.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::StorageUnavailable(_))
    }
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        // Constraint violations fail the same way on every attempt.
        match err.sql_err() {
            Some(
                SqlErr::UniqueConstraintViolation(detail)
                | SqlErr::ForeignKeyConstraintViolation(detail),
            ) => AuthError::Internal(format!("Constraint violation: {}", detail)),
            _ => AuthError::StorageUnavailable(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_become_storage_unavailable() {
        let err: AuthError = sea_orm::DbErr::Custom("connection reset".into()).into();
        assert_eq!(err.error_code(), "STORAGE_UNAVAILABLE");
        assert!(err.is_retryable());
    }

    #[test]
    fn credential_failures_are_not_retryable() {
        assert!(!AuthError::InvalidCredentials.is_retryable());
        assert!(!AuthError::TokenRevoked.is_retryable());
    }
}
