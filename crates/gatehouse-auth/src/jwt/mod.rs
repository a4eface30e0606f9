//! JWT access token encoding, decoding, and claims.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessToken, Claims, TokenType};
pub use decoder::JwtDecoder;
pub use encoder::JwtEncoder;
