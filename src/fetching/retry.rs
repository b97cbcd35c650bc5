use crate::fetching::config::FetcherConfig;
use crate::fetching::error::FetchError;
use crate::fetching::response::describe_error_body;
use crate::fetching::transport::{HttpResponse, TransportError};
use std::time::Duration;

/// Exponential backoff for transient provider failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor,
            max_backoff: config.max_backoff,
        }
    }

    /// Delay before the `retry`-th retry (1-based): `backoff_factor * 2^(retry - 1)` seconds,
    /// capped at `max_backoff`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        if retry == 0 || !self.backoff_factor.is_finite() || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        let cap = self.max_backoff.as_secs_f64();
        if !seconds.is_finite() || seconds >= cap {
            self.max_backoff
        } else {
            Duration::from_secs_f64(seconds)
        }
    }
}

/// A failed attempt that is worth repeating.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TransientFailure {
    Timeout { url: String },
    Connection { message: String },
    ServerError { status: u16, message: String },
}

impl TransientFailure {
    /// The error reported once no retries are left.
    pub(crate) fn into_fetch_error(self, attempts: u32) -> FetchError {
        match self {
            TransientFailure::Timeout { url } => FetchError::Timeout { url, attempts },
            TransientFailure::Connection { message } => {
                FetchError::NetworkUnavailable { attempts, message }
            }
            TransientFailure::ServerError { status, message } => FetchError::NetworkUnavailable {
                attempts,
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

/// Outcome of a single attempt.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    Success(Vec<u8>),
    Retry(TransientFailure),
    Fatal(FetchError),
}

/// Sorts one transport result into success, retryable or fatal.
///
/// Timeouts, connection failures and 5xx are retried. 429 and the remaining
/// 4xx are returned to the caller straight away.
pub(crate) fn classify_attempt(
    url: &str,
    result: Result<HttpResponse, TransportError>,
) -> AttemptOutcome {
    let response = match result {
        Ok(response) => response,
        Err(TransportError::Timeout { url, .. }) => {
            return AttemptOutcome::Retry(TransientFailure::Timeout { url })
        }
        Err(TransportError::Connection { message, .. }) => {
            return AttemptOutcome::Retry(TransientFailure::Connection { message })
        }
    };

    match response.status {
        200..=299 => AttemptOutcome::Success(response.body),
        429 => AttemptOutcome::Fatal(FetchError::RateLimited {
            url: url.to_string(),
        }),
        500..=599 => AttemptOutcome::Retry(TransientFailure::ServerError {
            status: response.status,
            message: describe_error_body(&response.body),
        }),
        status => AttemptOutcome::Fatal(FetchError::InvalidResponse(format!(
            "HTTP {}: {}",
            status,
            describe_error_body(&response.body)
        ))),
    }
}
