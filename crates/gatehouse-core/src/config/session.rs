//! Session cleanup configuration.

use serde::{Deserialize, Serialize};

/// Settings for the background sweep that purges expired token state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Whether the periodic cleanup task runs at all.
    #[serde(default = "default_true")]
    pub cleanup_enabled: bool,
    /// Interval between cleanup passes in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cleanup_enabled: true,
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    60
}
