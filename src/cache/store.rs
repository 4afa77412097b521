use async_trait::async_trait;
use std::time::Duration;

use crate::error::StoreError;

/// Key/value store with per-entry time-to-live.
///
/// This is the whole dependency surface of the credential cache: any shared
/// TTL-capable store (redis, memcached, ...) can stand in for [`MemoryStore`].
///
/// [`MemoryStore`]: crate::cache::memory::MemoryStore
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    /// Returns `Ok(None)` when the key is unknown or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`. A zero `ttl` stores the entry without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;
}
