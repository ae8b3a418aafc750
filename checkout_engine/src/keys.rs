use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use tokio::sync::Mutex;

use crate::traits::{KeyStoreError, ProcessingKeyStore};

/// The in-process idempotency guard: a mutex-guarded map of processing key → issue time.
///
/// Suitable for a single server instance only — it does not survive restarts and two instances would each accept
/// the same key once. Multi-instance deployments should use the SQLite-backed store, whose consume is an atomic
/// compare-and-delete.
#[derive(Clone, Default)]
pub struct MemoryKeyStore {
    keys: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessingKeyStore for MemoryKeyStore {
    async fn issue_key(&self, key: &str) -> Result<(), KeyStoreError> {
        let mut keys = self.keys.lock().await;
        if keys.contains_key(key) {
            return Err(KeyStoreError::AlreadyIssued(key.to_string()));
        }
        keys.insert(key.to_string(), Utc::now());
        trace!("🔑️ Issued processing key {key}");
        Ok(())
    }

    async fn consume_key(&self, key: &str, ttl: Duration) -> Result<bool, KeyStoreError> {
        let mut keys = self.keys.lock().await;
        match keys.remove(key) {
            Some(issued_at) if Utc::now() - issued_at <= ttl => {
                trace!("🔑️ Consumed processing key {key}");
                Ok(true)
            },
            Some(_) => {
                debug!("🔑️ Processing key {key} had expired before consumption");
                Ok(false)
            },
            None => Ok(false),
        }
    }

    async fn sweep_expired_keys(&self, ttl: Duration) -> Result<usize, KeyStoreError> {
        let cutoff = Utc::now() - ttl;
        let mut keys = self.keys.lock().await;
        let before = keys.len();
        keys.retain(|_, issued_at| *issued_at > cutoff);
        Ok(before - keys.len())
    }
}

#[cfg(test)]
mod test {
    use chrono::Duration;

    use super::MemoryKeyStore;
    use crate::traits::{KeyStoreError, ProcessingKeyStore};

    fn ttl() -> Duration {
        Duration::hours(1)
    }

    #[tokio::test]
    async fn a_key_is_consumable_exactly_once() {
        let store = MemoryKeyStore::new();
        store.issue_key("key-1").await.unwrap();
        assert!(store.consume_key("key-1", ttl()).await.unwrap());
        assert!(!store.consume_key("key-1", ttl()).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_keys_are_not_consumable() {
        let store = MemoryKeyStore::new();
        assert!(!store.consume_key("never-issued", ttl()).await.unwrap());
    }

    #[tokio::test]
    async fn reissuing_a_key_is_rejected() {
        let store = MemoryKeyStore::new();
        store.issue_key("key-1").await.unwrap();
        let err = store.issue_key("key-1").await.unwrap_err();
        assert!(matches!(err, KeyStoreError::AlreadyIssued(k) if k == "key-1"));
    }

    #[tokio::test]
    async fn expired_keys_are_not_consumable() {
        let store = MemoryKeyStore::new();
        store.issue_key("key-1").await.unwrap();
        assert!(!store.consume_key("key-1", Duration::milliseconds(-1)).await.unwrap());
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_keys() {
        let store = MemoryKeyStore::new();
        store.issue_key("old").await.unwrap();
        let swept = store.sweep_expired_keys(Duration::milliseconds(-1)).await.unwrap();
        assert_eq!(swept, 1);
        store.issue_key("fresh").await.unwrap();
        let swept = store.sweep_expired_keys(ttl()).await.unwrap();
        assert_eq!(swept, 0);
        assert!(store.consume_key("fresh", ttl()).await.unwrap());
    }
}
