use sea_orm::DbErr;
use thiserror::Error;

/// Errors that can occur against the destination store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sea-orm.
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// Invalid input data.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    /// Create an invalid-input error.
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
