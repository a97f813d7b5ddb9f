//! Storage trait for tokens.
//!
//! # Read/write routing
//!
//! Backends with separate primary and replica connections send every
//! mutation (`save`, `delete`, `remove_all_tokens_by_type`, `cleanup`) to the
//! primary and every read (`get_by_token`, `get_all_tokens_by_type`) to the
//! replica. A read right after a write may not see it.
//!
//! # Atomicity
//!
//! Each operation is a single statement. Nothing is atomic across calls:
//! `get_all_tokens_by_type` racing a `save` of the same type may or may not
//! include the new token.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TokenStoreResult;
use crate::token::Token;

/// Type alias for a shareable token store.
pub type DynTokenStore = Arc<dyn TokenStore>;

/// Durable storage for [`Token`] records.
///
/// Implementations hold no per-call state and are safe to share across
/// tasks.
///
/// # Implementations
///
/// - `tokenstore-postgres` - PostgreSQL storage backend
/// - `tokenstore-memory` - in-memory storage backend
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Inserts a new token.
    ///
    /// # Errors
    ///
    /// - `Validation` if the token breaks a structural rule; nothing is written
    /// - `Conflict` if a token with the same value already exists
    /// - `Persistence` for any other backend failure
    async fn save(&self, token: &Token) -> TokenStoreResult<()>;

    /// Deletes the token with the given value.
    ///
    /// Deleting a token that does not exist succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backend fails.
    async fn delete(&self, token: &str) -> TokenStoreResult<()>;

    /// Looks up a token by its value.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no token has this value
    /// - `Persistence` if the backend fails
    async fn get_by_token(&self, token: &str) -> TokenStoreResult<Token>;

    /// Returns every token of the given type, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the query cannot be built or executed.
    async fn get_all_tokens_by_type(&self, token_type: &str) -> TokenStoreResult<Vec<Token>>;

    /// Deletes every token of the given type.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the backend fails.
    async fn remove_all_tokens_by_type(&self, token_type: &str) -> TokenStoreResult<()>;

    /// Deletes tokens older than the retention window.
    ///
    /// Runs unattended, so failures are logged and never returned.
    async fn cleanup(&self);
}
