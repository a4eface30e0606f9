//! Access token signature verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use gatehouse_core::config::AuthConfig;

use super::claims::Claims;
use crate::error::Rejection;

/// Verifies access token signatures and decodes their claims.
///
/// Expiry is deliberately not checked here: the token validator compares
/// `exp` against the injected clock so the reason can be reported precisely.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies the signature of `token` and returns its claims.
    ///
    /// Any failure (bad signature, wrong algorithm, malformed structure,
    /// unexpected token kind) is reported as [`Rejection::BadSignature`].
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, Rejection> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = ?e.kind(), "Access token failed verification");
                Rejection::BadSignature
            })
    }
}
