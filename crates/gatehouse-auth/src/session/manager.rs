//! Session lifecycle manager: login, refresh, authenticate, logout, purge.

use std::sync::Arc;

use tracing::{debug, info, warn};

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::traits::{Clock, CredentialSource, StoredCredential};
use gatehouse_core::types::Principal;

use crate::credential::{CredentialValidator, PasswordHasher};
use crate::error::{AuthError, Rejection};
use crate::jwt::Claims;
use crate::token::{PurgeStats, RefreshToken, TokenIssuer, TokenPair, TokenStore, TokenValidator};

/// Drives a principal through `Anonymous → Authenticated → Refreshed* → LoggedOut`.
///
/// Every method is synchronous; the only shared state is the token store,
/// whose compound updates run under a single lock.
#[derive(Clone)]
pub struct SessionManager {
    /// Credential checks for login and HTTP Basic.
    credentials: CredentialValidator,
    /// Token minting.
    issuer: TokenIssuer,
    /// Token verification.
    validator: TokenValidator,
    /// Refresh entries and revoked access token IDs.
    store: Arc<TokenStore>,
    /// Time source for every expiry decision.
    clock: Arc<dyn Clock>,
    /// Whether refresh issues a new refresh token.
    rotate_refresh: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("rotate_refresh", &self.rotate_refresh)
            .field("refresh_entries", &self.store.refresh_count())
            .field("revoked", &self.store.revoked_count())
            .finish()
    }
}

impl SessionManager {
    /// Creates a manager.
    ///
    /// Fails with a configuration error when the signing secret is missing,
    /// the placeholder, or shorter than 32 bytes.
    pub fn new(
        config: &AuthConfig,
        source: Arc<dyn CredentialSource>,
        hasher: Arc<PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let store = Arc::new(TokenStore::new());
        let credentials = CredentialValidator::new(source, hasher)?;
        let issuer = TokenIssuer::new(config, Arc::clone(&store));
        let validator = TokenValidator::new(config, Arc::clone(&store), Arc::clone(&clock));

        Ok(Self {
            credentials,
            issuer,
            validator,
            store,
            clock,
            rotate_refresh: config.rotate_refresh,
        })
    }

    /// The shared token store.
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// The injected clock.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Validates credentials and opens a new session.
    ///
    /// On failure the store is left untouched.
    pub fn login(
        &self,
        identifier: &str,
        secret: &str,
        remember: bool,
    ) -> Result<TokenPair, AuthError> {
        let principal = match self.credentials.validate(identifier, secret) {
            Some(principal) => principal,
            None => {
                let reason = Rejection::InvalidCredentials;
                warn!(username = %identifier, reason = %reason, "Login rejected");
                return Err(reason.into());
            }
        };

        let pair = self.issuer.issue_pair(&principal, remember, self.clock.now())?;

        info!(
            username = %principal.username,
            session_id = %pair.access.session_id,
            jti = %pair.access.jti,
            remember = remember,
            "Login successful"
        );

        Ok(pair)
    }

    /// Validates credentials without issuing tokens (HTTP Basic).
    pub fn verify_credentials(&self, identifier: &str, secret: &str) -> Result<Principal, AuthError> {
        self.credentials
            .validate(identifier, secret)
            .ok_or(AuthError::Rejected(Rejection::InvalidCredentials))
    }

    /// Compares a submitted pair with a stored credential in constant time.
    pub fn matches(&self, identifier: &str, secret: &str, stored: &StoredCredential) -> bool {
        self.credentials.matches(identifier, secret, stored)
    }

    /// Exchanges a refresh token for a new token pair in the same session.
    ///
    /// With rotation on, the presented token is superseded and a new one
    /// issued atomically; with rotation off, the same refresh token is
    /// returned alongside the new access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let now = self.clock.now();

        let current = self.validator.validate_refresh(refresh_token).map_err(|reason| {
            warn!(reason = %reason, "Refresh rejected");
            reason
        })?;

        let access = self
            .issuer
            .issue_access_token(&current.principal, current.family, now)?;

        let refresh = if self.rotate_refresh {
            let replacement = TokenIssuer::generate_refresh_token();
            let entry = self
                .store
                .rotate_refresh(refresh_token, &replacement, now, |previous| {
                    self.issuer
                        .successor_entry(previous, now)
                        .map_err(AuthError::from)
                })
                .map_err(|err| {
                    if let Some(reason) = err.rejection() {
                        warn!(
                            session_id = %current.family,
                            reason = %reason,
                            "Refresh lost a rotation race"
                        );
                    }
                    err
                })?;

            RefreshToken {
                token: replacement,
                session_id: entry.family,
                generation: entry.generation,
                expires_at: entry.expires_at,
            }
        } else {
            RefreshToken {
                token: refresh_token.to_string(),
                session_id: current.family,
                generation: current.generation,
                expires_at: current.expires_at,
            }
        };

        info!(
            username = %current.principal.username,
            session_id = %current.family,
            generation = refresh.generation,
            jti = %access.jti,
            "Token refreshed"
        );

        Ok(TokenPair { access, refresh })
    }

    /// Resolves the principal behind an access token.
    pub fn authenticate(&self, access_token: &str) -> Result<Principal, AuthError> {
        self.authenticate_claims(access_token)
            .map(|claims| claims.principal())
    }

    /// Like [`authenticate`](Self::authenticate) but returns the full claims.
    pub fn authenticate_claims(&self, access_token: &str) -> Result<Claims, AuthError> {
        self.validator.validate_access(access_token).map_err(|reason| {
            debug!(reason = %reason, "Access token rejected");
            AuthError::Rejected(reason)
        })
    }

    /// Ends a session.
    ///
    /// The access token must carry a valid signature. Its ID is revoked until
    /// its original expiry and every refresh token of its session is deleted.
    /// A supplied refresh token owned by the same subject is deleted too.
    /// Repeating a logout is acknowledged again.
    pub fn logout(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let claims = self.validator.verify_signature(access_token).map_err(|reason| {
            warn!(reason = %reason, "Logout rejected");
            reason
        })?;
        let now = self.clock.now();

        if !claims.is_expired_at(now) {
            self.store.revoke_access(claims.jti, claims.expires_at());
        }

        let mut removed = self.store.delete_family(claims.sid);

        if let Some(token) = refresh_token {
            match self.store.get_refresh(token) {
                Some(entry) if entry.principal.username == claims.sub => {
                    if self.store.delete_refresh(token) {
                        removed += 1;
                    }
                    removed += self.store.delete_family(entry.family);
                }
                Some(_) => {
                    warn!(
                        username = %claims.sub,
                        session_id = %claims.sid,
                        "Logout ignored a refresh token owned by another subject"
                    );
                }
                None => {}
            }
        }

        info!(
            username = %claims.sub,
            session_id = %claims.sid,
            jti = %claims.jti,
            refresh_removed = removed,
            "Logout completed"
        );

        Ok(())
    }

    /// Removes expired refresh entries and revocations.
    pub fn purge_expired(&self) -> PurgeStats {
        self.store.purge_expired(self.clock.now())
    }
}
