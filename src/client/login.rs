use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::dto::{decode, Code2Session, UserAccessToken};
use crate::client::mode::AppMode;
use crate::client::{ensure_credentials, WechatClient};
use crate::error::Result;

/// One-time code exchanges. Codes are single use, so nothing here is cached.
impl WechatClient {
    /// Mini-program login: `js_code` from `wx.login()` to openid/session.
    pub async fn code2session(&self, js_code: &str) -> Result<Code2Session> {
        self.exchange_code(AppMode::Mp, js_code, "code2session").await
    }

    /// Official-account web authorization: OAuth `code` to a user token.
    pub async fn code2token(&self, code: &str) -> Result<UserAccessToken> {
        self.exchange_code(AppMode::H5, code, "code2token").await
    }

    async fn exchange_code<T: DeserializeOwned>(&self, mode: AppMode, code: &str, endpoint: &'static str) -> Result<T> {
        let config = self.config();
        ensure_credentials(&config.app_id, &config.app_secret)?;

        let profile = mode.profile();
        let url = format!("{}{}", config.sns_url.trim_end_matches('/'), profile.login_path);
        let params = [
            ("appid", config.app_id.as_str()),
            ("secret", config.app_secret.as_str()),
            (profile.login_code_param, code),
            ("grant_type", profile.login_grant_type),
        ];
        debug!(endpoint, mode = %mode, "exchanging login code");

        let body = self.get_text(&url, &params).await?;
        decode(endpoint, &body).inspect_err(|e| warn!(endpoint, error = %e, "login code exchange failed"))
    }
}
