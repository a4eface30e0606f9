//! Validates access and refresh tokens against the clock and the store.

use std::sync::Arc;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::traits::Clock;

use super::store::{RefreshEntry, TokenStore};
use crate::error::Rejection;
use crate::jwt::{Claims, JwtDecoder};

/// Checks presented tokens.
///
/// Expiry is enforced here at read time; the cleanup sweep only reclaims memory.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    /// Signature verification.
    decoder: JwtDecoder,
    /// Revocation set and refresh registry.
    store: Arc<TokenStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    /// Creates a validator from auth configuration.
    pub fn new(config: &AuthConfig, store: Arc<TokenStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            decoder: JwtDecoder::new(config),
            store,
            clock,
        }
    }

    /// Verifies signature, then expiry, then revocation.
    ///
    /// An expired token reports `Expired` even if it was also revoked.
    pub fn validate_access(&self, token: &str) -> Result<Claims, Rejection> {
        let claims = self.decoder.decode_access_token(token)?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(Rejection::Expired);
        }

        if self.store.is_revoked(&claims.jti) {
            return Err(Rejection::Revoked);
        }

        Ok(claims)
    }

    /// Verifies signature only, ignoring expiry and revocation.
    pub fn verify_signature(&self, token: &str) -> Result<Claims, Rejection> {
        self.decoder.decode_access_token(token)
    }

    /// Looks up a refresh token.
    ///
    /// Absent → `NotFound`; expired → `Expired` (entry purged); rotated out → `Superseded`.
    pub fn validate_refresh(&self, token: &str) -> Result<RefreshEntry, Rejection> {
        self.store.check_refresh(token, self.clock.now())
    }
}
