//! Credential source trait consumed by the credential validator.

/// A credential as persisted by the credential source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Canonical login name.
    pub username: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Roles granted to the user.
    pub roles: Vec<String>,
}

/// Synchronous lookup of stored credentials by identifier.
pub trait CredentialSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the stored credential for `identifier`, or `None` if absent.
    fn get_stored_credential(&self, identifier: &str) -> Option<StoredCredential>;
}
