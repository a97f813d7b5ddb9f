//! Error types for the PostgreSQL token store.

use sqlx_core::error::Error as SqlxError;
use tokenstore_core::error::BoxError;
use tokenstore_core::{Operation, TokenStoreError};

/// PostgreSQL error code for unique violation (23505).
pub const PG_UNIQUE_VIOLATION: &str = "23505";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is a unique constraint violation.
pub fn is_unique_violation(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNIQUE_VIOLATION)
}

/// Errors raised while setting up the PostgreSQL backend.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] SqlxError),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias for PostgreSQL setup operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

/// Wraps a statement or query-build failure as a persistence error for
/// `operation`.
pub(crate) fn persistence<E: Into<BoxError>>(
    operation: Operation,
) -> impl FnOnce(E) -> TokenStoreError {
    move |err| TokenStoreError::persistence(operation, err)
}

/// Maps an INSERT failure, surfacing duplicate keys as conflicts.
pub(crate) fn map_insert_error(token: &str, err: SqlxError) -> TokenStoreError {
    if is_unique_violation(&err) {
        return TokenStoreError::conflict(token);
    }
    TokenStoreError::persistence(Operation::Save, err)
}
