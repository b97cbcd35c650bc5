use crate::cache::error::CacheError;
use std::fmt;
use thiserror::Error;

/// Why a fetch ultimately failed, independent of the error's details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorReason {
    Timeout,
    RateLimited,
    InvalidResponse,
    NetworkUnavailable,
}

impl fmt::Display for FetchErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FetchErrorReason::Timeout => "timeout",
            FetchErrorReason::RateLimited => "rate limited",
            FetchErrorReason::InvalidResponse => "invalid response",
            FetchErrorReason::NetworkUnavailable => "network unavailable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} timed out after {attempts} attempt(s)")]
    Timeout { url: String, attempts: u32 },

    #[error("Weather provider rate limit exceeded for {url} (HTTP 429)")]
    RateLimited { url: String },

    #[error("Invalid response from weather provider: {0}")]
    InvalidResponse(String),

    #[error("Weather provider unreachable after {attempts} attempt(s): {message}")]
    NetworkUnavailable { attempts: u32, message: String },

    #[error("Fetch cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl FetchError {
    /// The provider-facing failure reason. `None` for cancellations and local cache failures.
    pub fn reason(&self) -> Option<FetchErrorReason> {
        match self {
            FetchError::Timeout { .. } => Some(FetchErrorReason::Timeout),
            FetchError::RateLimited { .. } => Some(FetchErrorReason::RateLimited),
            FetchError::InvalidResponse(_) => Some(FetchErrorReason::InvalidResponse),
            FetchError::NetworkUnavailable { .. } => Some(FetchErrorReason::NetworkUnavailable),
            FetchError::Cancelled { .. } | FetchError::Cache(_) => None,
        }
    }
}
