//! # gatehouse-api
//!
//! HTTP API layer for Gatehouse built on Axum.
//!
//! Exposes the token lifecycle (register, login, refresh, logout) and the
//! Bearer- and Basic-protected resources, with CORS, request logging,
//! extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
