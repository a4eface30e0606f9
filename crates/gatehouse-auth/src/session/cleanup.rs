//! Periodic sweep of expired refresh entries and revocations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use gatehouse_core::config::SessionConfig;

use crate::token::PurgeStats;

use super::manager::SessionManager;

/// Background task that reclaims memory held by expired token state.
///
/// Expiry is already enforced when tokens are read, so a late or skipped
/// sweep never lets an expired token through.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Manager whose store is swept.
    manager: Arc<SessionManager>,
    /// Time between sweeps.
    interval: Duration,
}

impl SessionCleanup {
    /// Creates a cleanup task for `manager`.
    pub fn new(manager: Arc<SessionManager>, config: &SessionConfig) -> Self {
        Self {
            manager,
            interval: Duration::from_secs(config.cleanup_interval_seconds.max(1)),
        }
    }

    /// Runs one sweep.
    pub fn run_cleanup(&self) -> PurgeStats {
        let stats = self.manager.purge_expired();

        if stats.total() > 0 {
            info!(
                refresh_removed = stats.refresh_removed,
                revocations_removed = stats.revocations_removed,
                "Session cleanup completed"
            );
        } else {
            debug!("Session cleanup found nothing to remove");
        }

        stats
    }

    /// Sweeps on a fixed interval until `shutdown` turns `true`.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_seconds = self.interval.as_secs(),
            "Session cleanup started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.run_cleanup();
                }
            }
        }

        info!("Session cleanup stopped");
    }
}
