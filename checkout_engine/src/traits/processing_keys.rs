use chrono::Duration;
use thiserror::Error;

/// The idempotency guard: a keyed store of single-use processing keys.
///
/// A key is recorded with [`issue`](ProcessingKeyStore::issue) when a checkout successfully creates its payment
/// order, and consumed (checked-and-deleted, atomically) exactly once at verification time. Consuming an unknown,
/// already-consumed or expired key is not an error — it returns `false` and the caller rejects the triggering
/// request as a duplicate.
///
/// Implementations must make `consume` atomic per key so that two racing "pay now" clicks cannot both proceed to
/// shipment creation. The in-memory [`crate::MemoryKeyStore`] does this with a mutex; the SQLite backend with a
/// compare-and-delete, which also makes it safe for multi-instance deployments.
#[allow(async_fn_in_trait)]
pub trait ProcessingKeyStore: Clone {
    /// Records a client-supplied processing key. Fails with [`KeyStoreError::AlreadyIssued`] if the key is
    /// already present — the signal for a duplicate order submission.
    async fn issue_key(&self, key: &str) -> Result<(), KeyStoreError>;

    /// Atomically checks-and-deletes the key. Returns `true` exactly once per issued key that is younger than
    /// `ttl`; `false` for unknown, already-consumed or expired keys.
    async fn consume_key(&self, key: &str, ttl: Duration) -> Result<bool, KeyStoreError>;

    /// Removes keys older than `ttl`. Returns the number of keys removed.
    async fn sweep_expired_keys(&self, ttl: Duration) -> Result<usize, KeyStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum KeyStoreError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Processing key {0} has already been issued")]
    AlreadyIssued(String),
}

impl From<sqlx::Error> for KeyStoreError {
    fn from(e: sqlx::Error) -> Self {
        KeyStoreError::DatabaseError(e.to_string())
    }
}
