//! Rejection reasons and the error type returned by the lifecycle manager.

use thiserror::Error;

use gatehouse_core::error::AppError;

/// Why a credential or token was refused.
///
/// Every variant is a routine, terminal outcome for the presented credential:
/// the caller must log in again (or refresh, for access token failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    /// Identifier/secret did not match a stored credential.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// The token signature did not verify, or the token is malformed.
    #[error("bad token signature")]
    BadSignature,
    /// The token is past its expiry.
    #[error("token expired")]
    Expired,
    /// The access token was revoked at logout.
    #[error("token revoked")]
    Revoked,
    /// The refresh token is unknown to the store.
    #[error("refresh token not found")]
    NotFound,
    /// The refresh token was rotated out by a later refresh.
    #[error("refresh token superseded")]
    Superseded,
}

impl Rejection {
    /// Message safe to return to an external caller.
    ///
    /// Token failures all read the same so a caller cannot tell which check failed.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid username or password",
            _ => "Invalid or expired token",
        }
    }
}

/// Errors returned by the session lifecycle manager.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credential or token was rejected.
    #[error(transparent)]
    Rejected(#[from] Rejection),
    /// Token signing or another internal step failed.
    #[error(transparent)]
    Internal(#[from] AppError),
}

impl AuthError {
    /// Returns the rejection reason, if this is a rejection.
    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Rejected(reason) => Some(*reason),
            Self::Internal(_) => None,
        }
    }
}

impl From<Rejection> for AppError {
    fn from(reason: Rejection) -> Self {
        AppError::authentication(reason.public_message())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(reason) => reason.into(),
            AuthError::Internal(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_token_rejections_share_public_message() {
        let messages: Vec<_> = [
            Rejection::BadSignature,
            Rejection::Expired,
            Rejection::Revoked,
            Rejection::NotFound,
            Rejection::Superseded,
        ]
        .iter()
        .map(Rejection::public_message)
        .collect();

        assert!(messages.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_rejection_maps_to_authentication_kind() {
        let err: AppError = AuthError::from(Rejection::Revoked).into();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(!err.message.contains("revoked"));
    }

    #[test]
    fn test_internal_error_passes_through() {
        let err: AppError = AuthError::from(AppError::internal("signing failed")).into();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert_eq!(err.message, "signing failed");
    }

    #[test]
    fn test_rejection_accessor() {
        assert_eq!(
            AuthError::from(Rejection::Expired).rejection(),
            Some(Rejection::Expired)
        );
        assert_eq!(AuthError::from(AppError::internal("x")).rejection(), None);
    }
}
