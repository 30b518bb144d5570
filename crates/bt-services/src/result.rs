//! Service error taxonomy

use bt_auth::{JwtError, PasswordError};
use bt_db::RepositoryError;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to send verification email")]
    Email(#[source] crate::mailer::MailerError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
