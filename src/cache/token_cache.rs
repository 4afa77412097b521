use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::cache::memory::MemoryStore;
use crate::cache::store::TokenStore;
use crate::config::settings::{CacheConfig, StoreKind};
use crate::error::StoreError;

/// Credential families kept in the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    AccessToken,
    JsapiTicket,
}

impl CredentialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKind::AccessToken => "accessToken",
            CredentialKind::JsapiTicket => "jsapiTicket",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{prefix}.{credentialType}.{appId}`
pub fn build_key(prefix: &str, kind: &str, app_id: &str) -> String {
    [prefix, kind, app_id].join(".")
}

/// Adapter over a [`TokenStore`] that owns the key naming scheme.
#[derive(Clone)]
pub struct TokenCache {
    store: Arc<dyn TokenStore>,
    prefix: Arc<str>,
}

impl fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache").field("prefix", &self.prefix).finish_non_exhaustive()
    }
}

impl TokenCache {
    pub fn new(store: Arc<dyn TokenStore>, prefix: &str) -> Self {
        Self { store, prefix: Arc::from(prefix) }
    }

    /// Cache backed by the store selected in configuration
    pub fn from_config(config: &CacheConfig) -> Self {
        let store: Arc<dyn TokenStore> = match config.store {
            StoreKind::Memory => Arc::new(MemoryStore::new()),
        };
        Self::new(store, &config.prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, kind: CredentialKind, app_id: &str) -> String {
        build_key(&self.prefix, kind.as_str(), app_id)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.store.get(key).await?;
        debug!(key, hit = value.is_some(), "cache lookup");
        Ok(value)
    }

    /// Writes the entry, then reads it back and returns what the store holds.
    pub async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<String, StoreError> {
        self.store.set(key, value, Duration::from_secs(ttl_seconds)).await?;
        let stored = self.store.get(key).await?;
        debug!(key, ttl_seconds, "cache entry stored");
        stored.ok_or_else(|| StoreError::Vanished(key.to_owned()))
    }
}
