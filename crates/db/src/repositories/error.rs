//! Repository error type and database error classification.

use ledgerly_core::DomainError;
use ledgerly_core::identity::PasswordError;
use ledgerly_shared::AppError;
use sea_orm::{DbErr, SqlErr};

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors returned by every repository.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No row with the given key.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Table or entity name.
        entity: &'static str,
        /// Requested key.
        id: i32,
    },

    /// A unique constraint rejected the write.
    #[error("Duplicate value: {0}")]
    Duplicate(String),

    /// A `RESTRICT` foreign key blocked a delete.
    #[error("Delete restricted: {0}")]
    Restricted(String),

    /// A write referenced a row that does not exist.
    #[error("Missing reference: {0}")]
    MissingReference(String),

    /// Input or stored data violates a domain rule.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl RepoError {
    /// Classifies an error raised by an insert or update.
    #[must_use]
    pub fn on_write(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Duplicate(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::MissingReference(msg),
            _ => Self::Database(err),
        }
    }

    /// Classifies an error raised by a delete.
    #[must_use]
    pub fn on_delete(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::Restricted(msg),
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Duplicate(msg),
            _ => Self::Database(err),
        }
    }

    /// Shorthand for [`RepoError::NotFound`].
    #[must_use]
    pub const fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

impl From<DbErr> for RepoError {
    fn from(err: DbErr) -> Self {
        Self::on_write(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepoError::Duplicate(msg) => Self::Conflict(msg),
            RepoError::Restricted(msg) => Self::Restricted(msg),
            RepoError::MissingReference(msg) => Self::InvalidReference(msg),
            RepoError::Domain(e) => Self::Validation(e.to_string()),
            RepoError::Password(e) => Self::Internal(e.to_string()),
            RepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}
