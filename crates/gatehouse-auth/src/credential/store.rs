//! In-memory credential store with self-service registration.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use gatehouse_core::config::SeedUser;
use gatehouse_core::error::AppError;
use gatehouse_core::traits::{CredentialSource, StoredCredential};

use super::hasher::PasswordHasher;

/// Process-local credential store keyed by username.
#[derive(Debug)]
pub struct InMemoryCredentialStore {
    /// Username → stored credential.
    users: RwLock<HashMap<String, StoredCredential>>,
    /// Hasher used for newly registered passwords.
    hasher: Arc<PasswordHasher>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    pub fn new(hasher: Arc<PasswordHasher>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            hasher,
        }
    }

    /// Creates a store pre-populated from configuration.
    ///
    /// Every seeded hash must be a parseable PHC string.
    pub fn from_seed(seed: &[SeedUser], hasher: Arc<PasswordHasher>) -> Result<Self, AppError> {
        let store = Self::new(hasher);

        for user in seed {
            if !PasswordHasher::is_valid_hash(&user.password_hash) {
                return Err(AppError::configuration(format!(
                    "auth.users entry '{}' has an invalid password_hash",
                    user.username
                )));
            }
            store.insert(StoredCredential {
                username: user.username.clone(),
                password_hash: user.password_hash.clone(),
                roles: user.roles.clone(),
            })?;
        }

        info!(count = seed.len(), "Seeded credential store");
        Ok(store)
    }

    /// Hashes `password` and registers a new user.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        roles: Vec<String>,
    ) -> Result<StoredCredential, AppError> {
        if username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if self.contains(username) {
            return Err(AppError::conflict("User already exists"));
        }

        let credential = StoredCredential {
            username: username.to_string(),
            password_hash: self.hasher.hash_password(password)?,
            roles,
        };
        self.insert(credential.clone())?;

        info!(username = %username, "User registered");
        Ok(credential)
    }

    /// Inserts a pre-hashed credential. Fails if the username is taken.
    pub fn insert(&self, credential: StoredCredential) -> Result<(), AppError> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if users.contains_key(&credential.username) {
            return Err(AppError::conflict("User already exists"));
        }
        users.insert(credential.username.clone(), credential);
        Ok(())
    }

    /// Checks whether `username` is registered.
    pub fn contains(&self, username: &str) -> bool {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(username)
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no users are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialSource for InMemoryCredentialStore {
    fn get_stored_credential(&self, identifier: &str) -> Option<StoredCredential> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .cloned()
    }
}
