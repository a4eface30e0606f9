//! Integration tests for the public, protected, admin, and health routes.

mod helpers;

use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;

use helpers::{Auth, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data_str("status"), "ok");
    assert_eq!(response.data_str("version"), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_public_route_needs_no_credentials() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/public", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data_str("message"), "This is a public route");
    assert!(response.body["data"].get("authenticated_user").is_none());
}

#[tokio::test]
async fn test_protected_route_with_bearer() {
    let app = TestApp::new();
    app.create_test_user("admin", "password", &["admin"]);
    let tokens = app.login("admin", "password", false).await;
    let access = tokens["access_token"].as_str().unwrap_or_default();

    let response = app
        .request("GET", "/api/protected", None, Some(Auth::Bearer(access)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data_str("authenticated_user"), "admin");
    assert_eq!(response.data_str("data"), "secret information");
}

#[tokio::test]
async fn test_protected_route_rejects_basic_credentials() {
    let app = TestApp::new();
    app.create_test_user("admin", "password", &["admin"]);

    let response = app
        .request(
            "GET",
            "/api/protected",
            None,
            Some(Auth::Basic("admin", "password")),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_basic_protected_route() {
    let app = TestApp::new();
    app.create_test_user("admin", "password", &["admin"]);

    let ok = app
        .request(
            "GET",
            "/api/basic/protected",
            None,
            Some(Auth::Basic("admin", "password")),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.data_str("authenticated_user"), "admin");

    let wrong = app
        .request(
            "GET",
            "/api/basic/protected",
            None,
            Some(Auth::Basic("admin", "nope")),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        wrong.headers[WWW_AUTHENTICATE],
        "Basic realm=\"gatehouse\""
    );

    let missing = app.request("GET", "/api/basic/protected", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        missing.headers[WWW_AUTHENTICATE],
        "Basic realm=\"gatehouse\""
    );
}

#[tokio::test]
async fn test_unknown_route() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/nope", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_route_allows_admin_role() {
    let app = TestApp::new();
    app.create_test_user("admin", "password", &["admin"]);
    let tokens = app.login("admin", "password", false).await;
    let access = tokens["access_token"].as_str().unwrap_or_default();

    let response = app
        .request("GET", "/api/admin", None, Some(Auth::Bearer(access)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data_str("message"), "This is an admin route");
    assert_eq!(response.data_str("authenticated_user"), "admin");
}

#[tokio::test]
async fn test_admin_route_denies_other_roles() {
    let app = TestApp::new();
    app.create_test_user("alice", "wonderland", &["user"]);
    let tokens = app.login("alice", "wonderland", false).await;
    let access = tokens["access_token"].as_str().unwrap_or_default();

    for path in ["/api/admin", "/api/admin/stats"] {
        let response = app
            .request("GET", path, None, Some(Auth::Bearer(access)))
            .await;

        assert_eq!(response.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(response.body["success"], false);
        assert_eq!(response.body["error"], "FORBIDDEN");
        assert!(!response.headers.contains_key(WWW_AUTHENTICATE));
    }
}

#[tokio::test]
async fn test_admin_route_without_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/admin", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[WWW_AUTHENTICATE], "Bearer");
}

#[tokio::test]
async fn test_admin_stats_counts_sessions() {
    let app = TestApp::new();
    app.create_test_user("admin", "password", &["admin"]);
    app.create_test_user("alice", "wonderland", &[]);
    app.login("alice", "wonderland", false).await;
    let tokens = app.login("admin", "password", false).await;
    let access = tokens["access_token"].as_str().unwrap_or_default();

    let response = app
        .request("GET", "/api/admin/stats", None, Some(Auth::Bearer(access)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["users"], 2);
    assert_eq!(response.body["data"]["refresh_tokens"], 2);
    assert_eq!(response.body["data"]["revoked_tokens"], 0);
}
