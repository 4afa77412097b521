use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::cache::token_cache::CredentialKind;
use crate::client::dto::{decode, TicketResponse, TokenResponse};
use crate::client::mode::AppMode;
use crate::client::{ensure_credentials, WechatClient};
use crate::error::{Result, WechatError};
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;

/// Cache-aside acquisition of application credentials.
///
/// Concurrent callers that miss the cache at the same time each fetch
/// their own copy; the last write wins.
impl WechatClient {
    /// Access token for the configured application.
    pub async fn access_token(&self) -> Result<String> {
        let config = self.config();
        self.get_token_for(config.app_mode, &config.app_id, &config.app_secret).await
    }

    /// Access token for any application, using the configured mode.
    ///
    /// <https://developers.weixin.qq.com/doc/offiaccount/Basic_Information/Get_access_token.html>
    pub async fn get_token(&self, app_id: &str, app_secret: &str) -> Result<String> {
        self.get_token_for(self.config().app_mode, app_id, app_secret).await
    }

    pub async fn get_token_for(&self, mode: AppMode, app_id: &str, app_secret: &str) -> Result<String> {
        ensure_credentials(app_id, app_secret)?;

        let kind = CredentialKind::AccessToken;
        let key = self.cache().key(kind, app_id);
        if let Some(token) = self.cached(kind, &key).await? {
            return Ok(token);
        }

        let params = [
            ("appid", app_id),
            ("secret", app_secret),
            ("grant_type", mode.profile().credential_grant_type),
        ];
        let url = self.config().auth_token_url.clone();
        self.refresh::<TokenResponse, _>(kind, &key, "token", &url, &params, |r| (r.access_token, r.expires_in))
            .await
    }

    /// JS-API ticket for the configured application.
    pub async fn get_ticket(&self) -> Result<String> {
        let config = self.config();
        self.get_ticket_for(&config.app_id, &config.app_secret).await
    }

    /// JS-API ticket; obtains (or reuses) an access token only when the
    /// ticket itself is not cached.
    pub async fn get_ticket_for(&self, app_id: &str, app_secret: &str) -> Result<String> {
        ensure_credentials(app_id, app_secret)?;

        let kind = CredentialKind::JsapiTicket;
        let key = self.cache().key(kind, app_id);
        if let Some(ticket) = self.cached(kind, &key).await? {
            return Ok(ticket);
        }

        let access_token = self.get_token(app_id, app_secret).await?;
        let params = [("access_token", access_token.as_str()), ("type", "jsapi")];
        let url = self.config().ticket_url();
        self.refresh::<TicketResponse, _>(kind, &key, "ticket", &url, &params, |r| (r.ticket, r.expires_in))
            .await
    }

    /// Fetches a credential upstream and stores it with ttl = `expires_in`.
    async fn refresh<T, F>(
        &self,
        kind: CredentialKind,
        key: &str,
        endpoint: &'static str,
        url: &str,
        params: &[(&str, &str)],
        extract: F,
    ) -> Result<String>
    where
        T: DeserializeOwned,
        F: FnOnce(T) -> (String, u64),
    {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.credential_fetch_requests.with_label_values(&[kind.as_str()]).inc();

        let result = async {
            let body = self.get_text(url, params).await?;
            let (value, expires_in) = extract(decode::<T>(endpoint, &body)?);
            info!(kind = %kind, key, expires_in, "credential fetched");
            let stored = self.cache().set(key, &value, expires_in).await?;
            Ok::<_, WechatError>(stored)
        }
        .await;

        metrics.credential_fetch_duration.with_label_values(&[kind.as_str()]).observe(start.elapsed().as_secs_f64());
        result.inspect_err(|e| {
            metrics.credential_fetch_failures.with_label_values(&[kind.as_str(), e.reason()]).inc();
            warn!(kind = %kind, key, error = %e, "credential fetch failed");
        })
    }
}
