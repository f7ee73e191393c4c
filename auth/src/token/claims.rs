use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Identity carried by a token.
///
/// Has no storage of its own: it is rebuilt from a verified token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    pub user_id: Uuid,
    pub email: String,
}

impl IdentityClaim {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}

/// Signed token payload.
///
/// Standard RFC 7519 `sub`, `iat` and `exp` claims plus the account email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (account identifier)
    pub sub: String,

    /// Account email
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl TokenClaims {
    /// Build the payload for `identity`, expiring `ttl` after `issued_at`.
    ///
    /// # Errors
    /// * `SigningFailure` - The expiry is outside the representable date range
    pub fn for_identity(
        identity: &IdentityClaim,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expiration = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::SigningFailure("token expiry is out of range".to_string())
        })?;

        Ok(Self {
            sub: identity.user_id.to_string(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Recover the identity the token was issued for.
    ///
    /// # Errors
    /// * `Malformed` - `sub` is not a UUID
    pub fn into_identity(self) -> Result<IdentityClaim, TokenError> {
        let user_id = Uuid::parse_str(&self.sub)
            .map_err(|e| TokenError::Malformed(format!("invalid subject: {}", e)))?;

        Ok(IdentityClaim {
            user_id,
            email: self.email,
        })
    }
}
