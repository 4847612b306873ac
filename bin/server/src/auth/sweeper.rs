//! Periodic removal of sessions older than the configured maximum age.

use recruit_portal_platform_access::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Runs one sweep and logs the outcome. Returns the number of rows removed.
pub async fn sweep_once(store: &dyn SessionStore, max_age: chrono::Duration) -> u64 {
    match store.sweep(max_age).await {
        Ok(count) => {
            if count > 0 {
                tracing::info!(deleted_sessions = count, "swept stale sessions");
            }
            count
        }
        Err(report) => {
            tracing::warn!(error = %report, "failed to sweep stale sessions");
            0
        }
    }
}

/// Spawns a task sweeping every `period`, starting one period from now.
pub fn spawn_session_sweeper(
    store: Arc<dyn SessionStore>,
    max_age: chrono::Duration,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        loop {
            interval.tick().await;
            sweep_once(store.as_ref(), max_age).await;
        }
    })
}
