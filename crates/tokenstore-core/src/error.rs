//! Error types for token store operations.

use std::fmt;

/// Boxed backend error kept as the source of a persistence failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Structural problems with a token, detected before any I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid token: value is empty")]
    EmptyToken,

    #[error("Invalid token: value is {len} characters, maximum is {max}")]
    TokenTooLong { len: usize, max: usize },

    #[error("Invalid token: type is empty")]
    EmptyType,

    #[error("Invalid token: type is {len} characters, maximum is {max}")]
    TypeTooLong { len: usize, max: usize },

    #[error("Invalid token: extra is {len} characters, maximum is {max}")]
    ExtraTooLong { len: usize, max: usize },

    #[error("Invalid token: {field} contains a NUL character")]
    ContainsNul { field: &'static str },

    #[error("Invalid token: create_at must be positive, got {0}")]
    InvalidCreateAt(i64),
}

/// The logical operation a persistence failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Save,
    Delete,
    GetByToken,
    BuildTypeQuery,
    GetAllByType,
    RemoveAllByType,
    Cleanup,
}

impl Operation {
    /// Short human-readable name used in messages and log fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Save => "save token",
            Self::Delete => "delete token",
            Self::GetByToken => "get token",
            Self::BuildTypeQuery => "build tokens-by-type query",
            Self::GetAllByType => "get tokens by type",
            Self::RemoveAllByType => "remove tokens by type",
            Self::Cleanup => "clean up tokens",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`crate::TokenStore`] operations.
///
/// Validation and not-found are results callers branch on. Persistence
/// errors are opaque: the message names only the failed operation, and the
/// backend error is reachable through [`std::error::Error::source`] for logs.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Token already exists: {token}")]
    Conflict { token: String },

    #[error("Token not found: {key}")]
    NotFound { key: String },

    #[error("Failed to {operation}")]
    Persistence {
        operation: Operation,
        #[source]
        source: BoxError,
    },
}

impl TokenStoreError {
    // -------------------------------------------------------------------------
    // Constructor Methods
    // -------------------------------------------------------------------------

    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(token: impl Into<String>) -> Self {
        Self::Conflict {
            token: token.into(),
        }
    }

    /// Create a `NotFound` error.
    #[must_use]
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a `Persistence` error wrapping a backend failure.
    #[must_use]
    pub fn persistence(operation: Operation, source: impl Into<BoxError>) -> Self {
        Self::Persistence {
            operation,
            source: source.into(),
        }
    }

    // -------------------------------------------------------------------------
    // Predicate Methods
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }

    /// Returns `true` if the caller can fix this by changing its input.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Conflict { .. } | Self::NotFound { .. }
        )
    }

    /// Returns `true` if this is an infrastructure failure.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.is_persistence()
    }

    /// The failed operation, for persistence errors.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Persistence { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Result type for token store operations.
pub type TokenStoreResult<T> = Result<T, TokenStoreError>;
