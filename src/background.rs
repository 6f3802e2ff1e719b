use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

/// Deletes stored drafts that have outlived the TTL. Loading a draft applies the
/// TTL on its own, this only keeps the table from growing.
pub async fn start_background_worker(state: Arc<AppState>) {
    info!("Starting draft purge worker...");

    let interval = Duration::from_secs(state.config.draft_purge_interval_secs.max(1));

    loop {
        let span = info_span!("draft_purge", ttl_hours = state.config.draft_ttl_hours);
        async {
            let cutoff = Utc::now() - state.config.draft_ttl();
            match state.draft_repo.purge_older_than(cutoff).await {
                Ok(0) => {}
                Ok(purged) => info!("Purged {} expired drafts", purged),
                Err(e) => error!("Failed to purge expired drafts: {:?}", e),
            }
        }
            .instrument(span)
            .await;

        sleep(interval).await;
    }
}
