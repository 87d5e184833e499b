//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Lower layers keep their own error enums; this is the shape they are
/// folded into at the service boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A unique constraint would be violated (duplicate number, email, sku).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A delete was blocked by a `RESTRICT` foreign key.
    #[error("Delete restricted: {0}")]
    Restricted(String),

    /// A written row points at a parent that does not exist.
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) | Self::Restricted(_) => 409,
            Self::InvalidReference(_) => 422,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Restricted(_) => "DELETE_RESTRICTED",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
