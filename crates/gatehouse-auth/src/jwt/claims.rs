//! JWT claims structure used in access tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_core::types::Principal;

/// JWT claims payload embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the username).
    pub sub: String,
    /// Session (refresh family) this token belongs to.
    pub sid: Uuid,
    /// Roles at the time of issuance.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// JWT ID for revocation tracking.
    pub jti: Uuid,
    /// Token kind.
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

/// Kind of signed token.
///
/// Only access tokens are JWTs; refresh tokens are opaque strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token for API requests.
    Access,
}

impl Claims {
    /// Returns the principal carried by the token.
    pub fn principal(&self) -> Principal {
        Principal::new(self.sub.clone(), self.roles.clone())
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Checks whether this token has expired at `now`.
    ///
    /// A token is still valid at the instant named by `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() < now
    }
}

/// A signed access token together with its decoded metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Compact JWS serialization.
    pub token: String,
    /// Unique token ID.
    pub jti: Uuid,
    /// Session the token was issued for.
    pub session_id: Uuid,
    /// Issuance time.
    pub issued_at: DateTime<Utc>,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}
