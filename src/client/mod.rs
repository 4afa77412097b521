//! WeChat API client.
//!
//! One [`WechatClient`] serves every [`AppMode`]; mode specific endpoints
//! and field names come from [`ModeProfile`]. The client is cheap to clone
//! and all clones share the same credential cache.
//!
//! [`ModeProfile`]: mode::ModeProfile

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::cache::store::TokenStore;
use crate::cache::token_cache::{CredentialKind, TokenCache};
use crate::config::settings::WechatConfig;
use crate::config::validator::validate_config;
use crate::error::{Result, WechatError};
use crate::observability::metrics::get_metrics;

pub mod callback;
pub mod dto;
pub mod execute;
pub mod login;
pub mod mode;
pub mod token;

use callback::{EventCipher, PlaintextCipher};
pub use mode::AppMode;

#[derive(Clone)]
pub struct WechatClient {
    config: Arc<WechatConfig>,
    http: Client,
    cache: TokenCache,
    cipher: Arc<dyn EventCipher>,
}

impl std::fmt::Debug for WechatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WechatClient")
            .field("app_id", &self.config.app_id)
            .field("app_mode", &self.config.app_mode)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl WechatClient {
    /// Builds a client with the store selected by `config.cache.store`.
    pub fn new(config: WechatConfig) -> Result<Self> {
        let cache = TokenCache::from_config(&config.cache);
        Self::build(config, cache)
    }

    /// Builds a client on top of an externally provided store.
    pub fn with_store(config: WechatConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let cache = TokenCache::new(store, &config.cache.prefix);
        Self::build(config, cache)
    }

    fn build(config: WechatConfig, cache: TokenCache) -> Result<Self> {
        validate_config(&config).map_err(|errors| WechatError::InvalidConfig(errors.join("; ")))?;
        let http = Client::builder()
            .timeout(Duration::from_millis(config.http.timeout_ms))
            .build()?;
        info!(app_id = %config.app_id, app_mode = %config.app_mode, "wechat client ready");
        Ok(Self {
            config: Arc::new(config),
            http,
            cache,
            cipher: Arc::new(PlaintextCipher),
        })
    }

    /// Replaces the callback cipher (plaintext by default).
    pub fn with_cipher(mut self, cipher: Arc<dyn EventCipher>) -> Self {
        self.cipher = cipher;
        self
    }

    pub fn config(&self) -> &WechatConfig {
        &self.config
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Cache lookup; an empty stored value counts as a miss.
    async fn cached(&self, kind: CredentialKind, key: &str) -> Result<Option<String>> {
        let value = self.cache.get(key).await?.filter(|value| !value.is_empty());
        let result = if value.is_some() { "hit" } else { "miss" };
        get_metrics().await.cache_lookups.with_label_values(&[kind.as_str(), result]).inc();
        Ok(value)
    }

    /// Plain GET against an upstream endpoint, returning the raw body.
    async fn get_text(&self, url: &str, params: &[(&str, &str)]) -> Result<String> {
        debug!(url, "upstream request");
        let response = self.http.get(url).query(params).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

pub(crate) fn ensure_credentials(app_id: &str, app_secret: &str) -> Result<()> {
    if app_id.trim().is_empty() || app_secret.trim().is_empty() {
        return Err(WechatError::MissingCredentials);
    }
    Ok(())
}
