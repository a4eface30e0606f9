//! The authenticated identity.

use serde::{Deserialize, Serialize};

use crate::traits::StoredCredential;

/// An authenticated user and the roles granted at login.
///
/// Immutable for the lifetime of the session it was authenticated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Login name.
    pub username: String,
    /// Granted roles (may be empty).
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Principal {
    /// Creates a principal with the given roles.
    pub fn new(username: impl Into<String>, roles: Vec<String>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    /// Checks whether the principal holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<&StoredCredential> for Principal {
    fn from(credential: &StoredCredential) -> Self {
        Self::new(credential.username.clone(), credential.roles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_role() {
        let principal = Principal::new("admin", vec!["admin".to_string()]);
        assert!(principal.has_role("admin"));
        assert!(!principal.has_role("viewer"));
    }

    #[test]
    fn test_from_stored_credential_drops_hash() {
        let stored = StoredCredential {
            username: "alice".to_string(),
            password_hash: "$argon2id$...".to_string(),
            roles: vec!["viewer".to_string()],
        };
        let principal = Principal::from(&stored);
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.roles, vec!["viewer".to_string()]);
    }
}
