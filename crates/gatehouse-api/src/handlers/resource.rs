//! Public and protected resource handlers.

use axum::Json;

use crate::dto::response::{ApiResponse, ResourceResponse};
use crate::extractors::{AuthUser, BasicUser};

/// GET /api/public
pub async fn public() -> Json<ApiResponse<ResourceResponse>> {
    Json(ApiResponse::ok(ResourceResponse {
        message: "This is a public route".to_string(),
        data: "public information".to_string(),
        authenticated_user: None,
    }))
}

fn protected_payload(username: &str) -> Json<ApiResponse<ResourceResponse>> {
    Json(ApiResponse::ok(ResourceResponse {
        message: "This is a protected route".to_string(),
        data: "secret information".to_string(),
        authenticated_user: Some(username.to_string()),
    }))
}

/// GET /api/protected
pub async fn protected(auth: AuthUser) -> Json<ApiResponse<ResourceResponse>> {
    protected_payload(&auth.username)
}

/// GET /api/basic/protected
pub async fn basic_protected(user: BasicUser) -> Json<ApiResponse<ResourceResponse>> {
    protected_payload(&user.username)
}
