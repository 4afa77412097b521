use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::client::mode::AppMode;
use crate::client::WechatClient;
use crate::error::Result;
use crate::observability::metrics::get_metrics;

/// Caller side of a signed API request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestOptions {
    #[serde(with = "http_serde::method", default)]
    pub method: Method,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self { method: Method::POST, body: Some(body), ..Self::default() }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

/// Per-call overrides of the configured application
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Scope {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub app_mode: Option<AppMode>,
}

impl WechatClient {
    /// Calls `{base_url}{api}` signed with a current access token.
    ///
    /// The `access_token` query parameter always wins over a caller supplied
    /// one. The body comes back as is: upstream `errcode`s are left to the
    /// caller, an empty body is `null` and a non-JSON body a JSON string.
    pub async fn execute(&self, api: &str, request: RequestOptions, scope: Scope) -> Result<Value> {
        let config = self.config();
        let app_id = scope.app_id.as_deref().unwrap_or(&config.app_id);
        let app_secret = scope.app_secret.as_deref().unwrap_or(&config.app_secret);
        let mode = scope.app_mode.unwrap_or(config.app_mode);

        let access_token = self.get_token_for(mode, app_id, app_secret).await?;

        let RequestOptions { method, mut params, headers, body } = request;
        params.insert("access_token".to_owned(), access_token);

        let url = format!("{}{}", config.base_url.trim_end_matches('/'), api);
        debug!(%method, url = %url, "api request");
        get_metrics().await.api_requests.with_label_values(&[method.as_str()]).inc();

        let mut builder = self.http.request(method, &url).query(&params);
        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(parse_verbatim(&text))
    }
}

fn parse_verbatim(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bodies_are_returned_without_interpretation() {
        assert_eq!(parse_verbatim(""), Value::Null);
        assert_eq!(parse_verbatim(r#"{"errcode":40001}"#), json!({"errcode": 40001}));
        assert_eq!(parse_verbatim("plain text"), json!("plain text"));
    }

    #[test]
    fn request_options_deserialize_with_defaults() {
        let options: RequestOptions = serde_json::from_value(json!({"params": {"next_openid": "X"}})).unwrap();
        assert_eq!(options.method, Method::GET);
        assert_eq!(options.params.get("next_openid").map(String::as_str), Some("X"));
        assert!(options.body.is_none());

        let options: RequestOptions = serde_json::from_value(json!({"method": "POST", "body": {"a": 1}})).unwrap();
        assert_eq!(options.method, Method::POST);
    }
}
