//! Account error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised by the account store
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration or profile input is missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another account already uses this email
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Email/password pair did not match an active account
    #[error("Incorrect email or password")]
    InvalidCredentials,

    /// Operation needs a logged-in user
    #[error("Not logged in")]
    NotAuthenticated,

    /// No user with this id
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// Storage layer error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for account operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AuthError::EmailTaken("a@b.c".to_string()).to_string(),
            "Email already registered: a@b.c"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Incorrect email or password"
        );
    }
}
