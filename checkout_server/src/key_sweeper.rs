use checkout_engine::{traits::ProcessingKeyStore, SqliteDatabase};
use chrono::Duration;
use log::*;
use tokio::task::JoinHandle;

/// Starts the processing-key sweeper. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Expired keys are already unusable (the consume check is part of the delete predicate), so the sweeper exists
/// only to stop abandoned checkouts from accumulating rows.
pub fn start_key_sweeper(db: SqliteDatabase, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(60));
        info!("🕰️ Processing key sweeper started");
        loop {
            timer.tick().await;
            trace!("🕰️ Running processing key sweep");
            match db.sweep_expired_keys(ttl).await {
                Ok(0) => {},
                Ok(n) => info!("🕰️ {n} expired processing key(s) swept"),
                Err(e) => error!("🕰️ Error sweeping expired processing keys: {e}"),
            }
        }
    })
}
