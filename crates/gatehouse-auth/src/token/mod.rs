//! Refresh token issuance, the shared token store, and token validation.

pub mod issuer;
pub mod store;
pub mod validator;

pub use issuer::{RefreshToken, TokenIssuer, TokenPair};
pub use store::{PurgeStats, RefreshEntry, RefreshState, TokenStore};
pub use validator::TokenValidator;
