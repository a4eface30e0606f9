//! Auth handlers: register, login, refresh, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use gatehouse_core::error::AppError;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{ApiResponse, MessageResponse, TokenResponse, UserResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Role given to self-registered users.
const DEFAULT_ROLE: &str = "user";

fn validate_body<T: Validate>(body: &T) -> Result<(), ApiError> {
    body.validate()
        .map_err(|e| AppError::validation(e.to_string()).into())
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    validate_body(&req)?;

    let credential = state.credential_store.register(
        &req.username,
        &req.password,
        vec![DEFAULT_ROLE.to_string()],
    )?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(UserResponse {
            username: credential.username,
            roles: credential.roles,
        })),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    validate_body(&req)?;

    let pair = state
        .session_manager
        .login(&req.username, &req.password, req.remember_me)?;

    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, ApiError> {
    validate_body(&req)?;

    let pair = state.session_manager.refresh(&req.refresh_token)?;

    Ok(Json(ApiResponse::ok(pair.into())))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Option<Json<LogoutRequest>>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    state
        .session_manager
        .logout(&auth.token, req.refresh_token.as_deref())?;

    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Successfully logged out",
    ))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::ok(auth.principal.into()))
}
