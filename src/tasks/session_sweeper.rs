use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::service::session_store::SessionStore;

pub async fn run_session_sweeper(
    sessions: Arc<Mutex<SessionStore>>,
    ttl: Duration,
    interval: std::time::Duration,
) {
    loop {
        sleep(interval).await;
        let mut sessions = sessions.lock().await;
        sweep_tick(&mut sessions, Utc::now(), ttl);
    }
}

/// Drops every dialogue idle for longer than `ttl`.
pub fn sweep_tick(sessions: &mut SessionStore, now: DateTime<Utc>, ttl: Duration) -> usize {
    let removed = sessions.expire_stale(now, ttl);
    if removed > 0 {
        tracing::info!(removed, remaining = sessions.len(), "expired abandoned bookings");
    }
    removed
}
