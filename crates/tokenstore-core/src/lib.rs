//! Core types for the token store.
//!
//! Tokens are short-lived, typed records (password recovery, invitations,
//! OAuth state) kept by the application server until they are consumed or
//! expire. This crate owns the record shape and its validation rules, the
//! static table description, the error taxonomy, and the [`TokenStore`]
//! contract that storage backends implement.
//!
//! Backends live in separate crates:
//!
//! - `tokenstore-postgres` - PostgreSQL with primary/replica routing
//! - `tokenstore-memory` - in-process map, mostly for tests

pub mod cleanup;
pub mod clock;
pub mod error;
pub mod schema;
pub mod store;
pub mod token;

pub use cleanup::CleanupScheduler;
pub use clock::{Clock, FixedClock, SystemClock, get_millis};
pub use error::{Operation, TokenStoreError, TokenStoreResult, ValidationError};
pub use schema::{ColumnDef, ColumnType, TOKENS_TABLE, TableDef};
pub use store::{DynTokenStore, TokenStore};
pub use token::{MAX_TOKEN_EXPIRY_TIME, Token, expiry_cutoff, token_type};
