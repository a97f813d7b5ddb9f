//! The token record and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schema::{EXTRA_MAX_LEN, TOKEN_MAX_LEN, TYPE_MAX_LEN};

/// How long a token is kept before cleanup removes it: 48 hours, in
/// milliseconds.
pub const MAX_TOKEN_EXPIRY_TIME: i64 = 1000 * 60 * 60 * 48;

/// Token types used by the application server.
///
/// The store does not restrict `token_type` to this list; callers own the
/// meaning of each type.
pub mod token_type {
    pub const PASSWORD_RECOVERY: &str = "password_recovery";
    pub const VERIFY_EMAIL: &str = "verify_email";
    pub const TEAM_INVITATION: &str = "team_invitation";
    pub const GUEST_INVITATION: &str = "guest_invitation";
    pub const OAUTH: &str = "oauth";
    pub const SAML: &str = "saml";
    pub const CWS_ACCESS: &str = "cws_access";
}

/// A stored token.
///
/// `token` is both the primary key and the value handed to clients.
/// `extra` is an opaque payload that only callers interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    #[serde(default)]
    pub extra: String,
    pub create_at: i64,
}

impl Token {
    pub fn new(
        token: impl Into<String>,
        token_type: impl Into<String>,
        extra: impl Into<String>,
        create_at: i64,
    ) -> Self {
        Self {
            token: token.into(),
            token_type: token_type.into(),
            extra: extra.into(),
            create_at,
        }
    }

    /// Checks the structural rules a token must meet before it is stored.
    ///
    /// Lengths are counted in characters to match `VARCHAR(n)`. NUL is
    /// rejected in every text field since PostgreSQL cannot store it.
    pub fn is_valid(&self) -> Result<(), ValidationError> {
        let token_len = self.token.chars().count();
        if token_len == 0 {
            return Err(ValidationError::EmptyToken);
        }
        if token_len > TOKEN_MAX_LEN {
            return Err(ValidationError::TokenTooLong {
                len: token_len,
                max: TOKEN_MAX_LEN,
            });
        }

        if self.token.contains('\0') {
            return Err(ValidationError::ContainsNul { field: "token" });
        }

        let type_len = self.token_type.chars().count();
        if type_len == 0 {
            return Err(ValidationError::EmptyType);
        }
        if type_len > TYPE_MAX_LEN {
            return Err(ValidationError::TypeTooLong {
                len: type_len,
                max: TYPE_MAX_LEN,
            });
        }

        if self.token_type.contains('\0') {
            return Err(ValidationError::ContainsNul { field: "type" });
        }

        let extra_len = self.extra.chars().count();
        if extra_len > EXTRA_MAX_LEN {
            return Err(ValidationError::ExtraTooLong {
                len: extra_len,
                max: EXTRA_MAX_LEN,
            });
        }

        if self.extra.contains('\0') {
            return Err(ValidationError::ContainsNul { field: "extra" });
        }

        if self.create_at <= 0 {
            return Err(ValidationError::InvalidCreateAt(self.create_at));
        }

        Ok(())
    }

    /// Whether cleanup at `now_millis` with the given retention would remove
    /// this token.
    #[must_use]
    pub fn is_expired_at(&self, now_millis: i64, retention_millis: i64) -> bool {
        self.create_at < expiry_cutoff(now_millis, retention_millis)
    }
}

/// Creation time before which a token counts as expired.
///
/// Saturates instead of overflowing for extreme retention values.
#[must_use]
pub fn expiry_cutoff(now_millis: i64, retention_millis: i64) -> i64 {
    now_millis.saturating_sub(retention_millis)
}
