//! Error taxonomy of the client.
//!
//! Nothing here is retried or downgraded: every variant reaches the
//! immediate caller as is.

use thiserror::Error;

pub type Result<T, E = WechatError> = std::result::Result<T, E>;

/// Failure of the backing key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),

    /// The entry written by `set` could not be read back.
    #[error("cache entry '{0}' vanished right after it was written")]
    Vanished(String),
}

#[derive(Debug, Error)]
pub enum WechatError {
    /// The endpoint answered with no parsable body.
    #[error("{endpoint}: upstream returned an empty response")]
    EmptyResponse { endpoint: &'static str },

    /// The endpoint answered with an `errcode`; `body` is the serialized payload.
    #[error("{endpoint}: {body}")]
    ErrorCode { endpoint: &'static str, body: String },

    /// The body parsed but lacks the fields the endpoint is documented to return.
    #[error("{endpoint}: unexpected response {body}")]
    MalformedResponse { endpoint: &'static str, body: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("app id and app secret must be set before requesting credentials")]
    MissingCredentials,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("callback encryption '{0}' is not supported by the configured cipher")]
    UnsupportedEncryption(String),
}

impl WechatError {
    /// Short label used for metrics and structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            WechatError::EmptyResponse { .. } => "empty_response",
            WechatError::ErrorCode { .. } => "errcode",
            WechatError::MalformedResponse { .. } => "malformed",
            WechatError::Store(_) => "store",
            WechatError::Http(_) => "http",
            WechatError::MissingCredentials => "credentials",
            WechatError::InvalidConfig(_) => "config",
            WechatError::UnsupportedEncryption(_) => "encryption",
        }
    }
}
