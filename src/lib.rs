//! # WeChat SDK
//!
//! Fetches and caches the short-lived credentials of the WeChat API
//! (access tokens, JS-API tickets) and signs outgoing API calls with them.
//!
//! Modules:
//! - `client` — credential provider, signed API calls, login exchanges, callbacks
//! - `cache` — store abstraction and the credential cache adapter
//! - `config` — configuration, loading and validation
//! - `server` — callback endpoint for the platform's event push

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::client::{AppMode, WechatClient};
pub use crate::config::settings::WechatConfig;
pub use crate::error::{StoreError, WechatError};
