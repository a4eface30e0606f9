//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use gatehouse_auth::{InMemoryCredentialStore, PasswordHasher, SessionManager};
use gatehouse_core::config::AppConfig;
use gatehouse_core::AppResult;
use gatehouse_core::traits::Clock;

/// Application state passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Token lifecycle manager.
    pub session_manager: Arc<SessionManager>,
    /// Registered users.
    pub credential_store: Arc<InMemoryCredentialStore>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Wires the credential store and session manager from configuration.
    ///
    /// Fails on a weak signing secret, bad Argon2 parameters, or an
    /// unparseable seeded password hash.
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let hasher = Arc::new(PasswordHasher::new(&config.auth.argon2)?);
        let credential_store = Arc::new(InMemoryCredentialStore::from_seed(
            &config.auth.users,
            Arc::clone(&hasher),
        )?);

        let session_manager = Arc::new(SessionManager::new(
            &config.auth,
            credential_store.clone(),
            hasher,
            clock,
        )?);

        Ok(Self {
            config: Arc::new(config),
            session_manager,
            credential_store,
            started_at: Instant::now(),
        })
    }
}
