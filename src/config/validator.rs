//! Configuration validation with aggregated errors.
//! - credentials must be present before any credential operation
//! - every upstream URL must be absolute http(s)
//! - cache prefix must be non-empty and dot-free so keys stay unambiguous
//! - server/metrics paths must be rooted and distinct

use tracing::{error, info};

use crate::config::settings::WechatConfig;

/// Returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_config(cfg: &WechatConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.app_id.trim().is_empty() {
        errors.push("config: 'app_id' must be set".to_string());
    }
    if cfg.app_secret.trim().is_empty() {
        errors.push("config: 'app_secret' must be set".to_string());
    }

    validate_url("base_url", &cfg.base_url, &mut errors);
    validate_url("auth_token_url", &cfg.auth_token_url, &mut errors);
    validate_url("sns_url", &cfg.sns_url, &mut errors);

    if cfg.cache.prefix.is_empty() {
        errors.push("cache.prefix must not be empty".to_string());
    } else if cfg.cache.prefix.contains('.') {
        errors.push(format!("cache.prefix '{}' must not contain '.'", cfg.cache.prefix));
    }

    if cfg.http.timeout_ms == 0 {
        errors.push("http.timeout_ms must be greater than 0".to_string());
    }

    if let Some(logging) = &cfg.logging {
        let level = logging.level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            errors.push(format!("logging.level '{}' is not one of trace|debug|info|warn|error", logging.level));
        }
    }

    validate_path("server.callback_path", &cfg.server.callback_path, &mut errors);
    if cfg.metrics.is_enabled {
        validate_path("metrics.path", &cfg.metrics.path, &mut errors);
        if cfg.metrics.path == cfg.server.callback_path {
            errors.push(format!("metrics.path '{}' collides with server.callback_path", cfg.metrics.path));
        }
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        for e in &errors {
            error!("config error: {}", e);
        }
        Err(errors)
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} '{}' must start with http:// or https://", field, url));
    }
}

fn validate_path(field: &str, path: &str, errors: &mut Vec<String>) {
    if !path.starts_with('/') {
        errors.push(format!("{} '{}' must start with '/'", field, path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_with_credentials_are_valid() {
        assert!(validate_config(&WechatConfig::new("A1", "S1")).is_ok());
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut cfg = WechatConfig::new("", " ");
        cfg.base_url = "api.weixin.qq.com".to_owned();
        cfg.cache.prefix = "we.chat".to_owned();

        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 4, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("app_id")));
        assert!(errors.iter().any(|e| e.contains("app_secret")));
        assert!(errors.iter().any(|e| e.contains("base_url")));
        assert!(errors.iter().any(|e| e.contains("cache.prefix")));
    }

    #[test]
    fn metrics_path_must_not_shadow_callback() {
        let mut cfg = WechatConfig::new("A1", "S1");
        cfg.metrics.is_enabled = true;
        cfg.metrics.path = cfg.server.callback_path.clone();
        let errors = validate_config(&cfg).unwrap_err();
        assert!(errors[0].contains("collides"));
    }
}
