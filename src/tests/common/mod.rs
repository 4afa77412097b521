pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use httpmock::Method::GET;
use httpmock::{Mock, MockServer};
use reqwest::Client;
use serde_json::Value;
use std::net::SocketAddr;

use crate::client::WechatClient;
use crate::config::settings::WechatConfig;

pub const APP_ID: &str = "A1";
pub const APP_SECRET: &str = "S1";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Config with every upstream URL pointed at the mock server
pub fn mock_config(server: &MockServer) -> WechatConfig {
    let mut config = WechatConfig::new(APP_ID, APP_SECRET);
    config.base_url = server.url("/cgi-bin");
    config.auth_token_url = server.url("/cgi-bin/token");
    config.sns_url = server.url("/sns");
    config
}

pub fn mock_client(server: &MockServer) -> WechatClient {
    WechatClient::new(mock_config(server)).expect("client")
}

/// `/cgi-bin/token` answering `body` for the given credentials
pub async fn mock_token_endpoint<'a>(server: &'a MockServer, app_id: &str, app_secret: &str, body: Value) -> Mock<'a> {
    let app_id = app_id.to_owned();
    let app_secret = app_secret.to_owned();
    server
        .mock_async(move |when, then| {
            when.method(GET)
                .path("/cgi-bin/token")
                .query_param("appid", app_id.as_str())
                .query_param("secret", app_secret.as_str())
                .query_param("grant_type", "client_credential");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}
