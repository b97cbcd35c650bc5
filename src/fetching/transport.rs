//! The HTTP seam of the fetcher.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// A request that did not produce a response at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Connection { url: String, message: String },
}

/// Performs a single GET request. Retrying is the caller's job.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a `reqwest` client with a per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(url, e))?;
        debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn classify_reqwest_error(url: &str, e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        TransportError::Connection {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
