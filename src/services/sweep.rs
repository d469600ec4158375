//! Background eviction of idle page views.
//!
//! A view whose owner closed the tab without `DELETE /api/views/{id}` would
//! otherwise stay registered forever.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::AppState;

/// Spawn the sweeper. Checks every quarter of `ttl` (at least once a second).
pub fn spawn_view_sweeper(state: AppState, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    info!(ttl_secs = ttl.as_secs(), "view sweeper configured");
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;
            let evicted = state.evict_idle(ttl).await;
            if evicted > 0 {
                debug!(evicted, "evicted idle page views");
            }
        }
    })
}
