//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_auth::TokenPair;
use gatehouse_core::types::Principal;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Token response for login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    /// Access token expiration.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration.
    pub refresh_expires_at: DateTime<Utc>,
    /// Session the tokens belong to.
    pub session_id: Uuid,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        let expires_in = (pair.access.expires_at - pair.access.issued_at).num_seconds();
        Self {
            access_token: pair.access.token,
            refresh_token: pair.refresh.token,
            token_type: "bearer".to_string(),
            expires_in,
            access_expires_at: pair.access.expires_at,
            refresh_expires_at: pair.refresh.expires_at,
            session_id: pair.access.session_id,
        }
    }
}

/// User summary for responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Username.
    pub username: String,
    /// Roles.
    pub roles: Vec<String>,
}

impl From<Principal> for UserResponse {
    fn from(principal: Principal) -> Self {
        Self {
            username: principal.username,
            roles: principal.roles,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Payload of the public and protected demo routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    /// Message text.
    pub message: String,
    /// Resource body.
    pub data: String,
    /// Who asked, when authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authenticated_user: Option<String>,
}

/// Token store and user counts for administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatsResponse {
    /// Registered users.
    pub users: usize,
    /// Refresh entries held, superseded ones included.
    pub refresh_tokens: usize,
    /// Access token IDs still on the revocation list.
    pub revoked_tokens: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}
