// Drives the callback router the way the platform does: URL verification
// via GET, event push via POST, and scrapes /metrics afterwards.

#[cfg(test)]
mod test {
    use http::StatusCode;
    use serde_json::Value;

    use crate::client::WechatClient;
    use crate::config::settings::WechatConfig;
    use crate::server::server::router;
    use crate::tests::common::{build_reqwest_client, json, spawn_axum};

    fn client_with_metrics() -> WechatClient {
        let mut config = WechatConfig::new("A1", "S1");
        config.metrics.is_enabled = true;
        WechatClient::new(config).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn verification_echoes_echostr() {
        let (handle, addr) = spawn_axum(router(client_with_metrics()).await).await;
        let http = build_reqwest_client();

        let res = http
            .get(format!("http://{}/wechat/callback", addr))
            .query(&[("signature", "sig"), ("timestamp", "1"), ("nonce", "n"), ("echostr", "hello")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), "hello");

        let res = http.get(format!("http://{}/wechat/callback", addr)).send().await.unwrap();
        assert_eq!(res.text().await.unwrap(), "success");

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn encrypted_events_are_rejected() {
        let (handle, addr) = spawn_axum(router(client_with_metrics()).await).await;
        let http = build_reqwest_client();

        let res = http
            .get(format!("http://{}/wechat/callback", addr))
            .query(&[("encrypt_type", "aes"), ("echostr", "hello")])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(res.text().await.unwrap().contains("aes"));

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn pushed_event_is_merged_and_returned() {
        let (handle, addr) = spawn_axum(router(client_with_metrics()).await).await;
        let http = build_reqwest_client();

        let res = http
            .post(format!("http://{}/wechat/callback", addr))
            .query(&[("openid", "O1"), ("MsgType", "query")])
            .json(&json!({"MsgType": "event", "Event": "subscribe"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({"openid": "O1", "MsgType": "event", "Event": "subscribe"}));

        let res = http
            .post(format!("http://{}/wechat/callback", addr))
            .body("[1, 2]")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        handle.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn metrics_are_exposed_when_enabled() {
        let (handle, addr) = spawn_axum(router(client_with_metrics()).await).await;
        let http = build_reqwest_client();

        http.get(format!("http://{}/wechat/callback?echostr=x", addr)).send().await.unwrap();
        let res = http.get(format!("http://{}/metrics", addr)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.text().await.unwrap().contains("wechatsdk_callback_events_total"));
        handle.abort();

        let (handle, addr) = spawn_axum(router(WechatClient::new(WechatConfig::new("A1", "S1")).unwrap()).await).await;
        let res = http.get(format!("http://{}/metrics", addr)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        handle.abort();
    }
}
