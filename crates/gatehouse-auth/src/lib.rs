//! # gatehouse-auth
//!
//! The token lifecycle core of Gatehouse: credential validation, token
//! issuance, refresh and rotation, revocation, and expiry cleanup.
//!
//! ## Modules
//!
//! - `credential`: Argon2id hashing, constant-time validation and the in-memory store
//! - `jwt`: access token claims, signing, and signature verification
//! - `token`: refresh token issuance, the shared token store, and token validation
//! - `session`: the session lifecycle manager and the background cleanup sweep
//! - `error`: rejection reasons and the auth error type

pub mod credential;
pub mod error;
pub mod jwt;
pub mod session;
pub mod token;

pub use credential::{CredentialValidator, InMemoryCredentialStore, PasswordHasher};
pub use error::{AuthError, Rejection};
pub use jwt::{AccessToken, Claims, JwtDecoder, JwtEncoder};
pub use session::{SessionCleanup, SessionManager};
pub use token::{PurgeStats, RefreshToken, TokenIssuer, TokenPair, TokenStore, TokenValidator};
