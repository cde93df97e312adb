//! Error types for the college backend.

use thiserror::Error;

/// Common error type for the college backend.
#[derive(Error, Debug)]
pub enum CollegeError {
    /// Database error.
    ///
    /// Wraps errors from the sqlx backend that are not constraint violations.
    #[error("database error: {0}")]
    Database(String),

    /// A uniqueness constraint was violated (duplicate username, email, token).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A foreign key points at a row that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for CollegeError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return CollegeError::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return CollegeError::InvalidReference(db_err.message().to_string());
            }
        }
        CollegeError::Database(e.to_string())
    }
}

/// Result type alias for college backend operations.
pub type Result<T> = std::result::Result<T, CollegeError>;
