//! In-memory token storage backend.
//!
//! Implements the [`TokenStore`] contract over a concurrent map. Nothing is
//! persisted; the store suits tests and single-process setups where tokens
//! may be lost on restart.
//!
//! # Example
//!
//! ```ignore
//! use tokenstore_core::{Token, TokenStore, get_millis, token_type};
//! use tokenstore_memory::InMemoryTokenStore;
//!
//! let store = InMemoryTokenStore::new();
//! let token = Token::new("abc123", token_type::PASSWORD_RECOVERY, "", get_millis());
//! store.save(&token).await?;
//! assert_eq!(store.get_by_token("abc123").await?, token);
//! ```

mod storage;

pub use storage::InMemoryTokenStore;
pub use tokenstore_core::{TokenStore, TokenStoreError};

/// Creates a new in-memory token store behind a shareable handle.
pub fn create_token_store() -> tokenstore_core::DynTokenStore {
    std::sync::Arc::new(InMemoryTokenStore::new())
}
