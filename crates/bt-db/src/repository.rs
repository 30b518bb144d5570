//! Shared repository error types
//!
//! Absent rows are represented as `Option`, not errors; repositories only
//! fail on database trouble or an empty partial update.

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A partial update carried no recognized field
    #[error("No fields to update")]
    NothingToUpdate,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
