use serde::Deserialize;

use crate::client::mode::AppMode;

pub const DEFAULT_BASE_URL: &str = "https://api.weixin.qq.com/cgi-bin";
pub const DEFAULT_AUTH_TOKEN_URL: &str = "https://api.weixin.qq.com/cgi-bin/token";
pub const DEFAULT_SNS_URL: &str = "https://api.weixin.qq.com/sns";
pub const DEFAULT_CACHE_PREFIX: &str = "wechat";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// ================================
/// Client configuration
/// ================================
/// Every field but the credentials has a default, so a config file only
/// needs to name what it overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct WechatConfig {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default)]
    pub app_mode: AppMode,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_auth_token_url")]
    pub auth_token_url: String,
    #[serde(default = "default_sns_url")]
    pub sns_url: String,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub http: HttpConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl WechatConfig {
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            app_mode: AppMode::default(),
            base_url: default_base_url(),
            auth_token_url: default_auth_token_url(),
            sns_url: default_sns_url(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
            logging: None,
            server: ServerConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }

    pub fn ticket_url(&self) -> String {
        format!("{}/ticket/getticket", self.base_url.trim_end_matches('/'))
    }
}

/// ================================
/// Cache
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default = "default_cache_prefix")]
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { store: StoreKind::default(), prefix: default_cache_prefix() }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Memory,
}

/// ================================
/// Outgoing HTTP
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_ms: default_http_timeout_ms() }
    }
}

/// ================================
/// Callback server & metrics
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_callback_path")]
    pub callback_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_owned(), port: 3000, callback_path: default_callback_path() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { path: default_metrics_path(), is_enabled: false }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), format: LogFormat::Compact }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_auth_token_url() -> String {
    DEFAULT_AUTH_TOKEN_URL.to_owned()
}

fn default_sns_url() -> String {
    DEFAULT_SNS_URL.to_owned()
}

fn default_cache_prefix() -> String {
    DEFAULT_CACHE_PREFIX.to_owned()
}

fn default_http_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_callback_path() -> String {
    "/wechat/callback".to_owned()
}

fn default_metrics_path() -> String {
    "/metrics".to_owned()
}
