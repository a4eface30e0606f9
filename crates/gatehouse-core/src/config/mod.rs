//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod logging;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::{Argon2Config, AuthConfig, SeedUser};
pub use self::logging::LoggingConfig;
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`GATEHOUSE__AUTH__JWT_SECRET`).
const ENV_PREFIX: &str = "GATEHOUSE";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication and token settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Cleanup sweep settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `GATEHOUSE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Validate cross-field constraints before any component starts.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;

        if self.session.cleanup_enabled && self.session.cleanup_interval_seconds == 0 {
            return Err(AppError::configuration(
                "session.cleanup_interval_seconds must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_for_missing_sections() {
        let config = AppConfig::from_toml(
            r#"
            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.auth.access_ttl_minutes, 15);
        assert_eq!(config.auth.refresh_ttl_days, 1);
        assert_eq!(config.auth.refresh_ttl_remember_days, 30);
        assert!(config.auth.rotate_refresh);
        assert_eq!(config.session.cleanup_interval_seconds, 60);
        assert_eq!(config.logging.format, "json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_seed_users_parsed() {
        let config = AppConfig::from_toml(
            r#"
            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"

            [[auth.users]]
            username = "admin"
            password_hash = "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaA"
            roles = ["admin"]
            "#,
        )
        .unwrap();

        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(config.auth.users[0].username, "admin");
        assert_eq!(config.auth.users[0].roles, vec!["admin".to_string()]);
    }

    #[test]
    fn test_missing_secret_fails_validation() {
        let config = AppConfig::from_toml("[server]\nport = 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cleanup_interval_rejected() {
        let config = AppConfig::from_toml(
            r#"
            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"

            [session]
            cleanup_interval_seconds = 0
            "#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
