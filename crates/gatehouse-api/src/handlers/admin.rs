//! Admin-only handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{AdminStatsResponse, ApiResponse, ResourceResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/admin
pub async fn admin(auth: AuthUser) -> Result<Json<ApiResponse<ResourceResponse>>, ApiError> {
    require_admin(&auth)?;

    Ok(Json(ApiResponse::ok(ResourceResponse {
        message: "This is an admin route".to_string(),
        data: "admin information".to_string(),
        authenticated_user: Some(auth.username.clone()),
    })))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AdminStatsResponse>>, ApiError> {
    require_admin(&auth)?;

    let store = state.session_manager.store();
    Ok(Json(ApiResponse::ok(AdminStatsResponse {
        users: state.credential_store.len(),
        refresh_tokens: store.refresh_count(),
        revoked_tokens: store.revoked_count(),
    })))
}
