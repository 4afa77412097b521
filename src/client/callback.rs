//! Inbound event callbacks.
//!
//! Message encryption ("safe mode") is not implemented. The transform is an
//! [`EventCipher`]; the built-in [`PlaintextCipher`] handles plaintext-mode
//! accounts only and refuses encrypted events instead of passing them on
//! as if they had been verified.

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::client::WechatClient;
use crate::error::{Result, WechatError};
use crate::observability::metrics::get_metrics;

/// Query string and body of an inbound callback merged into one object
pub type CallbackEvent = Map<String, Value>;

const ENCRYPT_TYPE_FIELD: &str = "encrypt_type";
const PLAINTEXT_ENCRYPT_TYPE: &str = "raw";

/// Decrypts inbound events and encrypts the replies sent back.
#[async_trait]
pub trait EventCipher: Send + Sync + 'static {
    async fn decrypt(&self, event: CallbackEvent) -> Result<CallbackEvent>;
    async fn encrypt(&self, reply: CallbackEvent) -> Result<CallbackEvent>;
}

/// Plaintext mode
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCipher;

#[async_trait]
impl EventCipher for PlaintextCipher {
    async fn decrypt(&self, event: CallbackEvent) -> Result<CallbackEvent> {
        match event.get(ENCRYPT_TYPE_FIELD).and_then(Value::as_str) {
            None | Some(PLAINTEXT_ENCRYPT_TYPE) => Ok(event),
            Some(other) => Err(WechatError::UnsupportedEncryption(other.to_owned())),
        }
    }

    async fn encrypt(&self, reply: CallbackEvent) -> Result<CallbackEvent> {
        Ok(reply)
    }
}

impl WechatClient {
    /// Runs an inbound event through the configured cipher and returns the reply.
    ///
    /// <https://developers.weixin.qq.com/doc/oplatform/Third-party_Platforms/Message_Encryption/Message_encryption_and_decryption.html>
    pub async fn callback(&self, event: CallbackEvent) -> Result<CallbackEvent> {
        let result = async {
            let event = self.cipher.decrypt(event).await?;
            debug!(fields = event.len(), "callback event decoded");
            self.cipher.encrypt(event).await
        }
        .await;

        let label = if result.is_ok() { "ok" } else { "error" };
        get_metrics().await.callback_events.with_label_values(&[label]).inc();
        result.inspect_err(|e| warn!(error = %e, "callback rejected"))
    }
}
