pub mod common;

mod callback_server;
mod expiration_and_cache;
