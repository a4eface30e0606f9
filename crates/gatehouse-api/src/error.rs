//! Maps `AppError` to HTTP responses.

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use gatehouse_auth::{AuthError, Rejection};
use gatehouse_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Authentication scheme advertised on a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    /// `WWW-Authenticate: Bearer`
    Bearer,
    /// `WWW-Authenticate: Basic realm="gatehouse"`
    Basic,
}

impl Challenge {
    fn header_value(self) -> HeaderValue {
        match self {
            Self::Bearer => HeaderValue::from_static("Bearer"),
            Self::Basic => HeaderValue::from_static("Basic realm=\"gatehouse\""),
        }
    }
}

/// Error type returned by every handler and extractor.
#[derive(Debug)]
pub struct ApiError {
    inner: AppError,
    challenge: Challenge,
}

impl ApiError {
    /// Wraps an error, advertising the Bearer scheme on 401.
    pub fn new(inner: AppError) -> Self {
        Self {
            inner,
            challenge: Challenge::Bearer,
        }
    }

    /// Changes the scheme advertised on 401.
    pub fn with_challenge(mut self, challenge: Challenge) -> Self {
        self.challenge = challenge;
        self
    }

    /// The wrapped error.
    pub fn inner(&self) -> &AppError {
        &self.inner
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.into())
    }
}

impl From<Rejection> for ApiError {
    fn from(reason: Rejection) -> Self {
        Self::new(reason.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match self.inner.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Internal | ErrorKind::Configuration => {
                tracing::error!(error = %self.inner, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "Internal server error".to_string()
        } else {
            self.inner.message.clone()
        };

        let body = ApiErrorResponse {
            success: false,
            error: error_code.to_string(),
            message,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, self.challenge.header_value());
        }
        response
    }
}
