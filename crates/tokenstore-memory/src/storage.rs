use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokenstore_core::{
    Clock, MAX_TOKEN_EXPIRY_TIME, SystemClock, Token, TokenStore, TokenStoreError,
    TokenStoreResult,
};
use tracing::debug;

/// In-memory token storage keyed by token value.
///
/// Conflict detection goes through the map's entry API, so two concurrent
/// saves of the same value cannot both succeed.
#[derive(Debug)]
pub struct InMemoryTokenStore {
    tokens: DashMap<String, Token>,
    clock: Arc<dyn Clock>,
    retention_ms: i64,
}

impl Default for InMemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTokenStore {
    /// Creates an empty store using the wall clock and the default retention.
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            clock: Arc::new(SystemClock),
            retention_ms: MAX_TOKEN_EXPIRY_TIME,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_retention_ms(mut self, retention_ms: i64) -> Self {
        self.retention_ms = retention_ms;
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn save(&self, token: &Token) -> TokenStoreResult<()> {
        token.is_valid()?;

        match self.tokens.entry(token.token.clone()) {
            Entry::Occupied(_) => Err(TokenStoreError::conflict(&token.token)),
            Entry::Vacant(slot) => {
                slot.insert(token.clone());
                Ok(())
            }
        }
    }

    async fn delete(&self, token: &str) -> TokenStoreResult<()> {
        self.tokens.remove(token);
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> TokenStoreResult<Token> {
        self.tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TokenStoreError::not_found(token))
    }

    async fn get_all_tokens_by_type(&self, token_type: &str) -> TokenStoreResult<Vec<Token>> {
        Ok(self
            .tokens
            .iter()
            .filter(|entry| entry.token_type == token_type)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn remove_all_tokens_by_type(&self, token_type: &str) -> TokenStoreResult<()> {
        self.tokens.retain(|_, t| t.token_type != token_type);
        Ok(())
    }

    async fn cleanup(&self) {
        debug!("Cleaning up token store");
        let now = self.clock.now_millis();
        let before = self.tokens.len();
        self.tokens
            .retain(|_, t| !t.is_expired_at(now, self.retention_ms));
        debug!(deleted = before.saturating_sub(self.tokens.len()), "Token cleanup finished");
    }
}
