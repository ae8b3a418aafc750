use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use sqlx::SqliteConnection;

use crate::traits::KeyStoreError;

/// Records a processing key. A key that is already present is a duplicate order submission, whether or not it has
/// expired; expired keys only leave the table via [`consume_key`] or [`sweep_expired_keys`].
pub async fn issue_key(key: &str, conn: &mut SqliteConnection) -> Result<(), KeyStoreError> {
    let res = sqlx::query("INSERT INTO processing_keys (key, created_at) VALUES ($1, $2)")
        .bind(key)
        .bind(Utc::now())
        .execute(conn)
        .await;
    match res {
        Ok(_) => {
            trace!("🔑️ Processing key issued");
            Ok(())
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => Err(KeyStoreError::AlreadyIssued(key.to_string())),
        Err(e) => Err(e.into()),
    }
}

/// Atomically checks-and-deletes the key. The age check is part of the `DELETE` predicate, so two racing consumers
/// cannot both observe a live key; exactly one sees a row deleted.
pub async fn consume_key(key: &str, ttl: Duration, conn: &mut SqliteConnection) -> Result<bool, KeyStoreError> {
    let cutoff = cutoff(ttl);
    let res = sqlx::query("DELETE FROM processing_keys WHERE key = $1 AND created_at > $2")
        .bind(key)
        .bind(cutoff)
        .execute(conn)
        .await?;
    Ok(res.rows_affected() > 0)
}

/// Removes keys older than `ttl`. Returns the number of keys removed.
pub async fn sweep_expired_keys(ttl: Duration, conn: &mut SqliteConnection) -> Result<usize, KeyStoreError> {
    let cutoff = cutoff(ttl);
    let res = sqlx::query("DELETE FROM processing_keys WHERE created_at <= $1").bind(cutoff).execute(conn).await?;
    let removed = res.rows_affected() as usize;
    if removed > 0 {
        debug!("🔑️ Swept {removed} expired processing key(s)");
    }
    Ok(removed)
}

fn cutoff(ttl: Duration) -> DateTime<Utc> {
    Utc::now() - ttl
}
