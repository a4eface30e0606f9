//! Access token signing with the process-wide secret.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::types::Principal;

use super::claims::{AccessToken, Claims, TokenType};

/// Creates signed HS256 access tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token lifetime.
    access_ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl", &self.access_ttl)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: config.access_ttl(),
        }
    }

    /// Access token lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Signs a fresh access token for `principal` in `session_id`.
    ///
    /// Pure apart from the random `jti`: same inputs, same claims.
    pub fn generate_access_token(
        &self,
        principal: &Principal,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        // JWT timestamps have whole-second precision
        let iat = DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now);
        let exp = iat
            .checked_add_signed(self.access_ttl)
            .ok_or_else(|| AppError::internal("Access token expiry is out of range"))?;
        let jti = Uuid::new_v4();

        let claims = Claims {
            sub: principal.username.clone(),
            sid: session_id,
            roles: principal.roles.clone(),
            iat: iat.timestamp(),
            exp: exp.timestamp(),
            jti,
            token_type: TokenType::Access,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode access token: {e}")))?;

        Ok(AccessToken {
            token,
            jti,
            session_id,
            issued_at: iat,
            expires_at: exp,
        })
    }
}
