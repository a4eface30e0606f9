//! Route definitions for the Gatehouse HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(resource_routes())
        .merge(admin_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth endpoints: register, login, refresh, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Public and protected resources
fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/public", get(handlers::resource::public))
        .route("/protected", get(handlers::resource::protected))
        .route("/basic/protected", get(handlers::resource::basic_protected))
}

/// Admin-only routes
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(handlers::admin::admin))
        .route("/admin/stats", get(handlers::admin::stats))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
