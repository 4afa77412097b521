use anyhow::{anyhow, Context, Result};
use regex::{Captures, Regex};
use std::path::Path;
use tracing::{debug, error};

use crate::config::settings::{LoggingConfig, WechatConfig};
use crate::config::validator::validate_config;

/// Load, expand and validate a YAML config file
pub async fn file_to_config(path: &Path) -> Result<WechatConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    parse_config(&expand_env_vars(&content)).map_err(|e| anyhow!("Invalid config format: {}", e))
}

pub fn parse_config(content: &str) -> Result<WechatConfig> {
    let mut config: WechatConfig = serde_yaml::from_str(content).inspect_err(|e| {
        error!("parse config error: {}", e);
    })?;

    // Apply defaults
    if config.logging.is_none() {
        config.logging = Some(LoggingConfig::default());
    }

    debug!("validating config ...");
    validate_config(&config).map_err(|errors| anyhow!(errors.join("; ")))?;

    Ok(config)
}

/// Replaces `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]*))?\}").expect("static regex");
    re.replace_all(input, |caps: &Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
