//! Error types and result handling for waitlist operations.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for domain and storage operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Email address failed normalization or the acceptance pattern.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Constraint violation, e.g. a duplicate storage key.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::ConstraintViolation(format!("unique constraint violation: {}", db_err))
            },
            _ => Self::Database(err.to_string()),
        }
    }
}
