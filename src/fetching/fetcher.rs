use crate::cache::request_key::RequestKey;
use crate::cache::response_cache::ResponseCache;
use crate::fetching::clock::{Clock, TokioClock};
use crate::fetching::config::FetcherConfig;
use crate::fetching::error::FetchError;
use crate::fetching::response::{parse_archive_response, DAILY_VARIABLES};
use crate::fetching::retry::{classify_attempt, AttemptOutcome, RetryPolicy};
use crate::fetching::transport::{HttpTransport, ReqwestTransport};
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::location::LocationQuery;
use crate::types::metadata::LocationMetadata;
use bon::bon;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fetches daily minimum and maximum temperatures from the Open-Meteo archive.
///
/// A fetch is one logical request: the response cache is consulted first, and on a
/// miss the provider is asked with a bounded retry loop for transient failures.
/// Only bodies that parse into a complete record sequence are cached.
///
/// Cloning is cheap; clones share the transport, the cache and the clock.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    config: FetcherConfig,
    retry: RetryPolicy,
    transport: Arc<dyn HttpTransport>,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
}

#[bon]
impl WeatherFetcher {
    /// Creates a fetcher.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.config(FetcherConfig)`: Optional. Defaults to [`FetcherConfig::default`].
    /// * `.transport(Arc<dyn HttpTransport>)`: Optional. Defaults to a [`ReqwestTransport`]
    ///   using the configured timeout.
    /// * `.cache(ResponseCache)`: Optional. Defaults to an in-memory cache with the
    ///   configured freshness window.
    /// * `.clock(Arc<dyn Clock>)`: Optional. Defaults to [`TokioClock`].
    ///
    /// # Errors
    ///
    /// Returns a `reqwest::Error` if the default HTTP client cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tempdist::{FetcherConfig, WeatherFetcher};
    ///
    /// # fn main() -> Result<(), reqwest::Error> {
    /// let fetcher = WeatherFetcher::builder()
    ///     .config(FetcherConfig::builder().max_retries(2).build())
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        #[builder(default)] config: FetcherConfig,
        transport: Option<Arc<dyn HttpTransport>>,
        cache: Option<ResponseCache>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Result<Self, reqwest::Error> {
        let transport = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(config.timeout)?),
        };
        let cache = cache.unwrap_or_else(|| ResponseCache::in_memory(config.freshness));
        let clock = clock.unwrap_or_else(|| Arc::new(TokioClock));

        Ok(Self {
            retry: RetryPolicy::from_config(&config),
            config,
            transport,
            cache,
            clock,
        })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Fetches the daily records for `query`, one per calendar day from start to end.
    ///
    /// # Errors
    ///
    /// See [`FetchError`] and [`FetchError::reason`].
    pub async fn fetch(
        &self,
        query: &LocationQuery,
    ) -> Result<(LocationMetadata, Vec<DailyTemperatureRecord>), FetchError> {
        self.fetch_cancellable(query, &CancellationToken::new())
            .await
    }

    /// Like [`WeatherFetcher::fetch`], but gives up with [`FetchError::Cancelled`] as
    /// soon as `cancel` fires, whether a request or a backoff sleep is in flight.
    pub async fn fetch_cancellable(
        &self,
        query: &LocationQuery,
        cancel: &CancellationToken,
    ) -> Result<(LocationMetadata, Vec<DailyTemperatureRecord>), FetchError> {
        let key = RequestKey::new(query, self.config.coordinate_precision);

        if let Some(body) = self.cache.get_fresh(&key, self.clock.now()).await? {
            match parse_archive_response(&body, query) {
                Ok(parsed) => {
                    info!("Serving {} from cache", key);
                    return Ok(log_suspect_days(parsed));
                }
                Err(e) => {
                    warn!("Discarding cached response for {}: {}", key, e);
                    self.cache.remove(&key).await?;
                }
            }
        }

        let body = self.download(&key, cancel).await?;
        let parsed = parse_archive_response(&body, query)?;
        self.cache.put(&key, body, self.clock.now()).await?;

        Ok(log_suspect_days(parsed))
    }

    async fn download(
        &self,
        key: &RequestKey,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, FetchError> {
        let url = self.config.base_url.as_str();
        let params = request_params(key);
        let mut completed: u32 = 0;

        loop {
            debug!("Requesting {} (attempt {})", key, completed + 1);
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled { attempts: completed }),
                result = self.transport.get(url, &params) => result,
            };
            completed += 1;

            let failure = match classify_attempt(url, result) {
                AttemptOutcome::Success(body) => {
                    info!("Downloaded {} ({} bytes)", key, body.len());
                    return Ok(body);
                }
                AttemptOutcome::Fatal(e) => return Err(e),
                AttemptOutcome::Retry(failure) => failure,
            };

            if completed > self.retry.max_retries {
                warn!("Giving up on {} after {} attempts", key, completed);
                return Err(failure.into_fetch_error(completed));
            }

            let delay = self.retry.delay_for(completed);
            warn!(
                "Attempt {} for {} failed ({:?}), retrying in {:?}",
                completed, key, failure, delay
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled { attempts: completed }),
                _ = self.clock.sleep(delay) => {}
            }
        }
    }
}

fn request_params(key: &RequestKey) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", key.latitude().to_string()),
        ("longitude", key.longitude().to_string()),
        ("start_date", key.start_date().to_string()),
        ("end_date", key.end_date().to_string()),
        ("daily", DAILY_VARIABLES.to_string()),
        ("timezone", "GMT".to_string()),
    ]
}

fn log_suspect_days(
    parsed: (LocationMetadata, Vec<DailyTemperatureRecord>),
) -> (LocationMetadata, Vec<DailyTemperatureRecord>) {
    for record in parsed.1.iter().filter(|r| r.is_suspect()) {
        warn!(
            "Suspect record on {}: min {} °C above max {} °C",
            record.date, record.min_temp, record.max_temp
        );
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetching::error::FetchErrorReason;
    use crate::fetching::testing::{archive_body, ok, status, timeout, ManualClock, ScriptedTransport};
    use crate::fetching::transport::{HttpResponse, TransportError};
    use crate::validation::validator::validate;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn london_query() -> LocationQuery {
        validate(51.5074, -0.1278, date(2023, 1, 1), date(2023, 1, 3)).unwrap()
    }

    fn london_records() -> Vec<DailyTemperatureRecord> {
        vec![
            DailyTemperatureRecord::new(date(2023, 1, 1), -2.0, 5.0),
            DailyTemperatureRecord::new(date(2023, 1, 2), -5.0, 3.0),
            DailyTemperatureRecord::new(date(2023, 1, 3), 1.0, 8.0),
        ]
    }

    fn fetcher(transport: Arc<ScriptedTransport>, clock: Arc<ManualClock>) -> WeatherFetcher {
        WeatherFetcher::builder()
            .transport(transport)
            .clock(clock)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_sends_rounded_coordinates_and_daily_variables() -> Result<(), FetchError> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let fetcher = fetcher(Arc::clone(&transport), Arc::new(ManualClock::new()));

        let query = validate(51.50741234, -0.1278, date(2023, 1, 1), date(2023, 1, 3)).unwrap();
        fetcher.fetch(&query).await?;

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let params: std::collections::HashMap<_, _> = requests[0].iter().cloned().collect();
        assert_eq!(params["latitude"], "51.5074");
        assert_eq!(params["longitude"], "-0.1278");
        assert_eq!(params["start_date"], "2023-01-01");
        assert_eq!(params["end_date"], "2023-01-03");
        assert_eq!(params["daily"], "temperature_2m_max,temperature_2m_min");
        assert_eq!(params["timezone"], "GMT");
        Ok(())
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() -> Result<(), FetchError> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let clock = Arc::new(ManualClock::new());
        let fetcher = fetcher(Arc::clone(&transport), Arc::clone(&clock));

        let (first_meta, first) = fetcher.fetch(&london_query()).await?;
        clock.advance(Duration::from_secs(59 * 60));
        let (second_meta, second) = fetcher.fetch(&london_query()).await?;

        assert_eq!(transport.calls(), 1);
        assert_eq!(first, second);
        assert_eq!(first_meta, second_meta);
        assert_eq!(first, london_records());
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entry_is_fetched_again() -> Result<(), FetchError> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let clock = Arc::new(ManualClock::new());
        let fetcher = fetcher(Arc::clone(&transport), Arc::clone(&clock));

        fetcher.fetch(&london_query()).await?;
        clock.advance(Duration::from_secs(60 * 60));
        fetcher.fetch(&london_query()).await?;

        assert_eq!(transport.calls(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried_with_doubling_backoff() -> Result<(), FetchError> {
        let transport = Arc::new(ScriptedTransport::new(vec![
            status(503),
            timeout(),
            status(502),
            ok(archive_body(&london_records())),
        ]));
        let clock = Arc::new(ManualClock::new());
        let fetcher = fetcher(Arc::clone(&transport), Arc::clone(&clock));

        let (_, records) = fetcher.fetch(&london_query()).await?;

        assert_eq!(records, london_records());
        assert_eq!(transport.calls(), 4);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_to_network_unavailable() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(500)]));
        let clock = Arc::new(ManualClock::new());
        let fetcher = fetcher(Arc::clone(&transport), Arc::clone(&clock));

        let err = fetcher.fetch(&london_query()).await.unwrap_err();

        assert_eq!(err.reason(), Some(FetchErrorReason::NetworkUnavailable));
        assert!(matches!(err, FetchError::NetworkUnavailable { attempts: 6, .. }));
        assert_eq!(transport.calls(), 6);
        assert_eq!(
            clock.sleeps(),
            vec![
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800),
                Duration::from_millis(1600),
                Duration::from_millis(3200),
            ]
        );
    }

    #[tokio::test]
    async fn test_timeouts_exhaust_to_timeout() {
        let transport = Arc::new(ScriptedTransport::new(vec![timeout()]));
        let fetcher = WeatherFetcher::builder()
            .config(FetcherConfig::builder().max_retries(2).build())
            .transport(transport.clone())
            .clock(Arc::new(ManualClock::new()))
            .build()
            .unwrap();

        let err = fetcher.fetch(&london_query()).await.unwrap_err();

        assert_eq!(err.reason(), Some(FetchErrorReason::Timeout));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(404)]));
        let clock = Arc::new(ManualClock::new());
        let fetcher = fetcher(Arc::clone(&transport), Arc::clone(&clock));

        let err = fetcher.fetch(&london_query()).await.unwrap_err();

        assert_eq!(err.reason(), Some(FetchErrorReason::InvalidResponse));
        assert_eq!(transport.calls(), 1);
        assert!(clock.sleeps().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_is_reported_without_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![status(429)]));
        let fetcher = fetcher(Arc::clone(&transport), Arc::new(ManualClock::new()));

        let err = fetcher.fetch(&london_query()).await.unwrap_err();

        assert_eq!(err.reason(), Some(FetchErrorReason::RateLimited));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_response_is_invalid_and_not_cached() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            ok(archive_body(&london_records()[..2])),
            ok(archive_body(&london_records())),
        ]));
        let fetcher = fetcher(Arc::clone(&transport), Arc::new(ManualClock::new()));

        let err = fetcher.fetch(&london_query()).await.unwrap_err();
        assert_eq!(err.reason(), Some(FetchErrorReason::InvalidResponse));

        let (_, records) = fetcher.fetch(&london_query()).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let fetcher = fetcher(Arc::clone(&transport), Arc::new(ManualClock::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fetcher
            .fetch_cancellable(&london_query(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Cancelled { attempts: 0 }));
        assert_eq!(err.reason(), None);
        assert_eq!(transport.calls(), 0);
    }

    /// Never answers.
    #[derive(Debug)]
    struct HangingTransport;

    #[async_trait]
    impl HttpTransport for HangingTransport {
        async fn get(
            &self,
            _url: &str,
            _query: &[(&str, String)],
        ) -> Result<HttpResponse, TransportError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_in_flight_request() {
        let fetcher = WeatherFetcher::builder()
            .transport(Arc::new(HangingTransport))
            .clock(Arc::new(ManualClock::new()))
            .build()
            .unwrap();
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let err = fetcher
            .fetch_cancellable(&london_query(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Cancelled { attempts: 0 }));
    }

    #[tokio::test]
    async fn test_against_mock_server() -> Result<(), Box<dyn std::error::Error>> {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/archive"))
            .and(query_param("latitude", "51.5074"))
            .and(query_param("longitude", "-0.1278"))
            .and(query_param("start_date", "2023-01-01"))
            .and(query_param("end_date", "2023-01-03"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(archive_body(&london_records()), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = WeatherFetcher::builder()
            .config(
                FetcherConfig::builder()
                    .base_url(format!("{}/v1/archive", server.uri()))
                    .build(),
            )
            .build()?;

        let (metadata, records) = fetcher.fetch(&london_query()).await?;
        let (_, again) = fetcher.fetch(&london_query()).await?;

        assert_eq!(records, london_records());
        assert_eq!(again, records);
        assert_eq!(metadata.timezone, "GMT");
        Ok(())
    }
}
