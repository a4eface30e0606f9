//! Authentication configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholder shipped in sample configs; never accepted as a signing secret.
pub const PLACEHOLDER_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Minimum signing secret length in bytes (HS256 key size).
pub const MIN_SECRET_BYTES: usize = 32;

/// Longest accepted access token lifetime (one day).
pub const MAX_ACCESS_TTL_MINUTES: u64 = 24 * 60;

/// Longest accepted refresh token lifetime (ten years).
pub const MAX_REFRESH_TTL_DAYS: u64 = 3_650;

/// Authentication and token lifetime configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Required.
    #[serde(default)]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days for a regular login.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Refresh token TTL in days when the caller asked to be remembered.
    #[serde(default = "default_refresh_remember_ttl")]
    pub refresh_ttl_remember_days: u64,
    /// Issue a new refresh token on every refresh and supersede the old one.
    #[serde(default = "default_true")]
    pub rotate_refresh: bool,
    /// Argon2id cost parameters for password hashing.
    #[serde(default)]
    pub argon2: Argon2Config,
    /// Credentials loaded into the in-memory credential store at startup.
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("refresh_ttl_remember_days", &self.refresh_ttl_remember_days)
            .field("rotate_refresh", &self.rotate_refresh)
            .field("argon2", &self.argon2)
            .field("users", &self.users.len())
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            refresh_ttl_remember_days: default_refresh_remember_ttl(),
            rotate_refresh: true,
            argon2: Argon2Config::default(),
            users: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Checks the signing secret and token lifetimes.
    ///
    /// A missing or weak secret is fatal: every signature would be forgeable.
    pub fn validate(&self) -> Result<(), AppError> {
        let secret = self.jwt_secret.trim();
        if secret.is_empty() {
            return Err(AppError::configuration("auth.jwt_secret is not set"));
        }
        if secret == PLACEHOLDER_SECRET {
            return Err(AppError::configuration(
                "auth.jwt_secret still holds the placeholder value",
            ));
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AppError::configuration(format!(
                "auth.jwt_secret must be at least {MIN_SECRET_BYTES} bytes"
            )));
        }

        if self.access_ttl_minutes == 0 {
            return Err(AppError::configuration(
                "auth.access_ttl_minutes must be greater than zero",
            ));
        }
        if self.access_ttl_minutes > MAX_ACCESS_TTL_MINUTES {
            return Err(AppError::configuration(format!(
                "auth.access_ttl_minutes must not exceed {MAX_ACCESS_TTL_MINUTES}"
            )));
        }

        // Refresh tokens must outlive the access token they are paired with.
        let access_ttl = self.access_ttl();
        for (name, days) in [
            ("refresh_ttl_days", self.refresh_ttl_days),
            ("refresh_ttl_remember_days", self.refresh_ttl_remember_days),
        ] {
            if days > MAX_REFRESH_TTL_DAYS {
                return Err(AppError::configuration(format!(
                    "auth.{name} must not exceed {MAX_REFRESH_TTL_DAYS}"
                )));
            }
            if days_delta(days) < access_ttl {
                return Err(AppError::configuration(format!(
                    "auth.{name} must not be shorter than the access token TTL"
                )));
            }
        }

        Ok(())
    }

    /// Access token lifetime. Saturates instead of wrapping on huge values.
    pub fn access_ttl(&self) -> TimeDelta {
        i64::try_from(self.access_ttl_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .unwrap_or(TimeDelta::MAX)
    }

    /// Refresh token lifetime for the given remember flag.
    pub fn refresh_ttl(&self, remember: bool) -> TimeDelta {
        if remember {
            days_delta(self.refresh_ttl_remember_days)
        } else {
            days_delta(self.refresh_ttl_days)
        }
    }
}

fn days_delta(days: u64) -> TimeDelta {
    i64::try_from(days)
        .ok()
        .and_then(TimeDelta::try_days)
        .unwrap_or(TimeDelta::MAX)
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Argon2Config {
    /// Memory cost in KiB.
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes.
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism.
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

impl Default for Argon2Config {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// A credential seeded from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedUser {
    /// Login name.
    pub username: String,
    /// Argon2id PHC string (see `gatehouse-server hash-password`).
    pub password_hash: String,
    /// Roles granted to the user.
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    1
}

fn default_refresh_remember_ttl() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_memory_kib() -> u32 {
    19_456
}

fn default_iterations() -> u32 {
    2
}

fn default_parallelism() -> u32 {
    1
}
