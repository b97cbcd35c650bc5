use crate::cache::response_cache::DEFAULT_FRESHNESS;
use bon::Builder;
use std::time::Duration;

/// Open-Meteo historical weather endpoint.
pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Tunables of the [`crate::WeatherFetcher`].
///
/// Every field has a default, so only the values that differ need to be set.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tempdist::FetcherConfig;
///
/// let config = FetcherConfig::builder()
///     .max_retries(2)
///     .freshness(Duration::from_secs(10 * 60))
///     .build();
///
/// assert_eq!(config.max_retries, 2);
/// assert_eq!(config.backoff_factor, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct FetcherConfig {
    /// Endpoint the daily temperatures are requested from.
    #[builder(default = DEFAULT_ARCHIVE_URL.to_string(), into)]
    pub base_url: String,

    /// How long a cached response is served without asking the provider again.
    #[builder(default = DEFAULT_FRESHNESS)]
    pub freshness: Duration,

    /// Retries after the first attempt for transient failures.
    #[builder(default = 5)]
    pub max_retries: u32,

    /// Seconds; the n-th retry waits `backoff_factor * 2^(n-1)`.
    #[builder(default = 0.2)]
    pub backoff_factor: f64,

    /// Upper bound for a single backoff delay.
    #[builder(default = Duration::from_secs(120))]
    pub max_backoff: Duration,

    /// Per-request timeout of the HTTP client.
    #[builder(default = Duration::from_secs(30))]
    pub timeout: Duration,

    /// Decimals the coordinates are rounded to, both in the request and in the cache key.
    #[builder(default = 4)]
    pub coordinate_precision: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::default();
        assert_eq!(config.base_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(config.freshness, Duration::from_secs(3600));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.backoff_factor, 0.2);
        assert_eq!(config.max_backoff, Duration::from_secs(120));
        assert_eq!(config.coordinate_precision, 4);
    }

    #[test]
    fn test_builder_overrides() {
        let config = FetcherConfig::builder()
            .base_url("http://localhost:8080/v1/archive")
            .max_retries(0)
            .build();
        assert_eq!(config.base_url, "http://localhost:8080/v1/archive");
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
