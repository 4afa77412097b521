use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::store::TokenStore;
use crate::error::StoreError;
use crate::helpers::time::{expires_at_millis, now_millis};

/// Stored value and its absolute expiry (unix millis)
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: String,
    pub expires_at: Option<i64>,
}

impl CacheEntry {
    pub fn new(value: String, ttl: Duration) -> Self {
        Self { value, expires_at: expires_at_millis(ttl) }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| now_millis() >= expires_at)
            .unwrap_or(false)
    }
}

/// In-process store, the default backend.
///
/// Expired entries are never returned; they are dropped lazily when read
/// or overwritten.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn remove(&self, key: &str) -> bool {
        self.inner.write().await.remove(key).is_some()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// Number of live (non-expired) entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.values().filter(|entry| !entry.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entry = self.inner.read().await.get(key).cloned();
        match entry {
            Some(entry) if entry.is_expired() => {
                debug!("cache entry '{}' expired", key);
                let mut map = self.inner.write().await;
                // a concurrent writer may have refreshed it in between
                if map.get(key).is_some_and(|current| current.is_expired()) {
                    map.remove(key);
                }
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut map = self.inner.write().await;
        map.insert(key.to_owned(), CacheEntry::new(value.to_owned(), ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_ttl_never_expires() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn expired_entry_is_dropped_on_read() {
        let store = MemoryStore::new();
        store.set("k", "v", Duration::from_millis(30)).await.unwrap();
        assert_eq!(store.len().await, 1);

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.get("k").await.unwrap().is_none());
        assert!(store.is_empty().await);
        assert!(!store.remove("k").await);
    }

    #[tokio::test]
    async fn huge_ttl_is_clamped_instead_of_wrapping() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(10_000_000_000_000_000);
        store.set("k", "v", ttl).await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
        let entry = store.inner.read().await.get("k").cloned().unwrap();
        assert_eq!(entry.expires_at, Some(i64::MAX));
        assert!(!entry.is_expired());
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let store = MemoryStore::new();
        store.set("k", "old", Duration::from_secs(60)).await.unwrap();
        store.set("k", "new", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("new"));

        store.clear().await;
        assert!(store.get("k").await.unwrap().is_none());
    }
}
