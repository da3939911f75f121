//! Authentication error types.

use thiserror::Error;

use marketstall_core::EmailError;

use crate::db::RepositoryError;

/// Errors from the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The email/password pair did not match a seller.
    ///
    /// Deliberately covers both "unknown email" and "wrong password" so the
    /// response does not leak which accounts exist.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The email is already registered.
    #[error("email already registered")]
    EmailExists,

    /// The email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed.
    #[error("failed to hash password")]
    PasswordHash,

    /// Database operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
