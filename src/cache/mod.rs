pub mod error;
pub mod request_key;
pub mod response_cache;
pub mod store;
