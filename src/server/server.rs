use std::collections::HashMap;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::callback::CallbackEvent;
use crate::client::WechatClient;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;

/// Reply the platform expects for events that need no answer
const ACK_BODY: &str = "success";

#[derive(Clone)]
pub struct AppState {
    pub client: WechatClient,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub async fn new(client: WechatClient) -> Self {
        let metrics = get_metrics().await;
        Self { client, metrics_state: MetricsState::new(metrics.registry.clone()) }
    }
}

/// Callback + metrics routes for a client.
pub async fn router(client: WechatClient) -> Router {
    let state = AppState::new(client).await;
    let callback_path = state.client.config().server.callback_path.clone();
    let metrics_router = state.metrics_state.router(&state.client.config().metrics);
    info!("served path: {}", &callback_path);

    Router::new()
        .route(&callback_path, get(handle_verify).post(handle_event))
        .merge(metrics_router)
        .with_state(state)
}

/// Start the callback server on `server.host:server.port`.
pub async fn start(client: WechatClient) -> Result<()> {
    let bind_addr = format!("{}:{}", client.config().server.host, client.config().server.port);
    let app = router(client).await;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("callback server listening on {}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// `GET` is the platform's URL verification: answer with `echostr`.
async fn handle_verify(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    match state.client.callback(query_to_event(query)).await {
        Ok(reply) => {
            let body = reply
                .get("echostr")
                .and_then(Value::as_str)
                .unwrap_or(ACK_BODY)
                .to_owned();
            (StatusCode::OK, body).into_response()
        }
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// `POST` carries an event; JSON body fields override query fields.
async fn handle_event(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> Response {
    let mut event = query_to_event(query);
    if !body.is_empty() {
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(fields)) => event.extend(fields),
            Ok(_) | Err(_) => {
                warn!("callback body is not a JSON object");
                return (StatusCode::BAD_REQUEST, "callback body must be a JSON object").into_response();
            }
        }
    }

    match state.client.callback(event).await {
        Ok(reply) => Json(Value::Object(reply)).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

fn query_to_event(query: HashMap<String, String>) -> CallbackEvent {
    query.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}
