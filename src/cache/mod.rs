pub mod memory;
pub mod store;
pub mod token_cache;
