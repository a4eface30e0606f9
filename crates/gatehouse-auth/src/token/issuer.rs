//! Issues access tokens, opaque refresh tokens, and token pairs.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gatehouse_core::config::AuthConfig;
use gatehouse_core::error::AppError;
use gatehouse_core::types::Principal;

use super::store::{RefreshEntry, RefreshState, TokenStore};
use crate::jwt::{AccessToken, JwtEncoder};

/// Random bytes per refresh token (256 bits).
const REFRESH_TOKEN_BYTES: usize = 32;

/// An opaque refresh token as handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    /// The token string.
    pub token: String,
    /// Session the token belongs to.
    pub session_id: Uuid,
    /// Rotation count within the session.
    pub generation: u32,
    /// Expiry time.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access: AccessToken,
    /// Long-lived refresh token.
    pub refresh: RefreshToken,
}

/// Mints token pairs and registers refresh tokens in the store.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    /// Signs access tokens.
    encoder: JwtEncoder,
    /// Refresh token registry.
    store: Arc<TokenStore>,
    /// Refresh lifetime for a regular login.
    refresh_ttl: Duration,
    /// Refresh lifetime when the caller asked to be remembered.
    refresh_ttl_remember: Duration,
}

impl TokenIssuer {
    /// Creates an issuer from auth configuration.
    pub fn new(config: &AuthConfig, store: Arc<TokenStore>) -> Self {
        Self {
            encoder: JwtEncoder::new(config),
            store,
            refresh_ttl: config.refresh_ttl(false),
            refresh_ttl_remember: config.refresh_ttl(true),
        }
    }

    /// Refresh lifetime for the given remember flag.
    pub fn refresh_ttl(&self, remember: bool) -> Duration {
        if remember {
            self.refresh_ttl_remember
        } else {
            self.refresh_ttl
        }
    }

    /// Expiry of a refresh token issued at `now`.
    pub fn refresh_expiry(&self, remember: bool, now: DateTime<Utc>) -> Result<DateTime<Utc>, AppError> {
        now.checked_add_signed(self.refresh_ttl(remember))
            .ok_or_else(|| AppError::internal("Refresh token expiry is out of range"))
    }

    /// Signs an access token. No store mutation.
    pub fn issue_access_token(
        &self,
        principal: &Principal,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, AppError> {
        self.encoder.generate_access_token(principal, session_id, now)
    }

    /// Generates a fresh opaque token string from the OS CSPRNG.
    pub fn generate_refresh_token() -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Builds the store entry for a new refresh token.
    pub fn refresh_entry(
        &self,
        principal: &Principal,
        family: Uuid,
        generation: u32,
        remember: bool,
        now: DateTime<Utc>,
    ) -> Result<RefreshEntry, AppError> {
        Ok(RefreshEntry {
            principal: principal.clone(),
            family,
            generation,
            remember,
            issued_at: now,
            expires_at: self.refresh_expiry(remember, now)?,
            state: RefreshState::Active,
        })
    }

    /// Builds the entry that replaces `previous` on rotation.
    ///
    /// Same session, next generation, same remember flag, fresh lifetime.
    pub fn successor_entry(
        &self,
        previous: &RefreshEntry,
        now: DateTime<Utc>,
    ) -> Result<RefreshEntry, AppError> {
        self.refresh_entry(
            &previous.principal,
            previous.family,
            previous.generation + 1,
            previous.remember,
            now,
        )
    }

    /// Generates a refresh token and registers it in the store.
    pub fn issue_refresh_token(
        &self,
        principal: &Principal,
        family: Uuid,
        remember: bool,
        now: DateTime<Utc>,
    ) -> Result<RefreshToken, AppError> {
        let token = Self::generate_refresh_token();
        let entry = self.refresh_entry(principal, family, 0, remember, now)?;
        let expires_at = entry.expires_at;
        self.store.put_refresh(&token, entry);

        Ok(RefreshToken {
            token,
            session_id: family,
            generation: 0,
            expires_at,
        })
    }

    /// Issues an access + refresh pair for a new session.
    pub fn issue_pair(
        &self,
        principal: &Principal,
        remember: bool,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AppError> {
        let session_id = Uuid::new_v4();
        let access = self.issue_access_token(principal, session_id, now)?;
        let refresh = self.issue_refresh_token(principal, session_id, remember, now)?;
        Ok(TokenPair { access, refresh })
    }
}
