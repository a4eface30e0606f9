//! Constant-time credential validation.

use std::sync::Arc;

use constant_time_eq::constant_time_eq;
use tracing::{debug, warn};

use gatehouse_core::error::AppError;
use gatehouse_core::traits::{CredentialSource, StoredCredential};
use gatehouse_core::types::Principal;

use super::hasher::PasswordHasher;

/// Secret verified against when the identifier is unknown.
const DUMMY_SECRET: &str = "gatehouse-unknown-user";

/// Checks submitted credentials against the credential source.
///
/// Fails closed: a missing credential, a malformed stored hash, or a
/// verification error all count as "no match".
#[derive(Clone)]
pub struct CredentialValidator {
    /// Where stored credentials come from.
    source: Arc<dyn CredentialSource>,
    /// Argon2id verifier.
    hasher: Arc<PasswordHasher>,
    /// Hash with the configured cost, burned on unknown identifiers.
    dummy_hash: String,
}

impl std::fmt::Debug for CredentialValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialValidator")
            .field("source", &self.source)
            .finish()
    }
}

impl CredentialValidator {
    /// Creates a validator over `source`.
    pub fn new(
        source: Arc<dyn CredentialSource>,
        hasher: Arc<PasswordHasher>,
    ) -> Result<Self, AppError> {
        let dummy_hash = hasher.hash_password(DUMMY_SECRET)?;
        Ok(Self {
            source,
            hasher,
            dummy_hash,
        })
    }

    /// Validates `identifier`/`secret` and returns the matching principal.
    ///
    /// An unknown identifier still pays for one hash verification so both
    /// failure paths take comparable time.
    pub fn validate(&self, identifier: &str, secret: &str) -> Option<Principal> {
        match self.source.get_stored_credential(identifier) {
            Some(stored) => {
                if self.matches(identifier, secret, &stored) {
                    Some(Principal::from(&stored))
                } else {
                    debug!(username = %identifier, "Credential mismatch");
                    None
                }
            }
            None => {
                let _ = self.hasher.verify_password(secret, &self.dummy_hash);
                debug!(username = %identifier, "Unknown identifier");
                None
            }
        }
    }

    /// Compares a submitted pair with a stored credential.
    ///
    /// Both halves are always evaluated.
    pub fn matches(&self, identifier: &str, secret: &str, stored: &StoredCredential) -> bool {
        let identifier_ok = constant_time_eq(identifier.as_bytes(), stored.username.as_bytes());

        let secret_ok = match self.hasher.verify_password(secret, &stored.password_hash) {
            Ok(ok) => ok,
            Err(e) => {
                warn!(username = %stored.username, error = %e, "Stored credential unusable");
                false
            }
        };

        identifier_ok & secret_ok
    }
}
