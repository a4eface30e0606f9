//! `AuthUser` and `BasicUser` extractors: pull credentials from the
//! `Authorization` header, validate them, and inject the principal.

use std::ops::Deref;

use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::{Basic, Bearer};

use gatehouse_auth::{Claims, Rejection};
use gatehouse_core::error::AppError;
use gatehouse_core::types::Principal;

use crate::error::{ApiError, Challenge};
use crate::state::AppState;

/// Caller authenticated with a Bearer access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Resolved principal.
    pub principal: Principal,
    /// Verified claims.
    pub claims: Claims,
    /// The raw access token, needed again at logout.
    pub token: String,
}

impl Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.principal
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::authentication("Missing or invalid Authorization header"))?;

        let token = bearer.token().to_string();
        let claims = state.session_manager.authenticate_claims(&token)?;

        Ok(AuthUser {
            principal: claims.principal(),
            claims,
            token,
        })
    }
}

/// Caller authenticated with HTTP Basic credentials.
#[derive(Debug, Clone)]
pub struct BasicUser(pub Principal);

impl Deref for BasicUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for BasicUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(basic)) = parts
            .extract::<TypedHeader<Authorization<Basic>>>()
            .await
            .map_err(|_| {
                ApiError::from(Rejection::InvalidCredentials).with_challenge(Challenge::Basic)
            })?;

        let principal = state
            .session_manager
            .verify_credentials(basic.username(), basic.password())
            .map_err(|err| ApiError::from(err).with_challenge(Challenge::Basic))?;

        Ok(BasicUser(principal))
    }
}
