pub mod clock;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod response;
pub mod retry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
