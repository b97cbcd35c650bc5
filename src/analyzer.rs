//! The main entry point: one call runs a full analysis cycle for a location and date range.
//!
//! `validate → fetch → summarize → cold / hot day curves`

use crate::cache::response_cache::ResponseCache;
use crate::cache::store::DiskStore;
use crate::error::TempDistError;
use crate::export::csv::{default_file_name, to_csv, write_csv_file};
use crate::export::error::ExportError;
use crate::fetching::config::FetcherConfig;
use crate::fetching::fetcher::WeatherFetcher;
use crate::statistics::distribution::{
    check_threshold_step, cold_day_curve, hot_day_curve, DEFAULT_THRESHOLD_STEP,
};
use crate::statistics::summary::summarize;
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::distribution::ThresholdDistribution;
use crate::types::location::LocationQuery;
use crate::types::metadata::LocationMetadata;
use crate::types::summary::TemperatureSummary;
use crate::utils::get_cache_dir;
use crate::validation::validator::validate;
use bon::bon;
use chrono::NaiveDate;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;

/// Everything derived from one analysis cycle. Held in memory only.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureAnalysis {
    pub query: LocationQuery,
    pub metadata: LocationMetadata,
    pub records: Vec<DailyTemperatureRecord>,
    pub summary: TemperatureSummary,
    /// Days with a minimum below each threshold.
    pub cold_days: ThresholdDistribution,
    /// Days with a maximum above each threshold.
    pub hot_days: ThresholdDistribution,
}

impl TemperatureAnalysis {
    /// The records as CSV (`date,min_temp,max_temp`).
    pub fn to_csv(&self) -> Result<String, ExportError> {
        to_csv(&self.records)
    }

    pub fn export_file_name(&self) -> String {
        default_file_name(&self.query)
    }

    /// Writes the records to `dir` under [`TemperatureAnalysis::export_file_name`]
    /// and returns the full path.
    pub async fn write_csv(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(self.export_file_name());
        write_csv_file(&path, &self.records).await?;
        Ok(path)
    }
}

/// Client for historic temperature analyses.
///
/// Provider responses are cached, so repeating an analysis for the same
/// location and dates within the freshness window does not hit the network.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use tempdist::{TempDistError, TemperatureAnalyzer};
///
/// # async fn run() -> Result<(), TempDistError> {
/// let analyzer = TemperatureAnalyzer::new().await?;
///
/// let analysis = analyzer
///     .analyze()
///     .latitude(51.5074)
///     .longitude(-0.1278)
///     .start_date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap())
///     .end_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
///     .call()
///     .await?;
///
/// println!("Coldest day: {:?}", analysis.summary.coldest_day);
/// println!("Days below 0°C: {:?}", analysis.cold_days.count(0.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TemperatureAnalyzer {
    fetcher: WeatherFetcher,
}

#[bon]
impl TemperatureAnalyzer {
    /// Creates an analyzer that caches provider responses on disk under `cache_folder`.
    ///
    /// The directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`TempDistError::Cache`] if the directory cannot be created, or
    /// [`TempDistError::HttpClient`] if the HTTP client cannot be built.
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, TempDistError> {
        let config = FetcherConfig::default();
        let store = task::spawn_blocking(move || DiskStore::open(cache_folder))
            .await
            .map_err(crate::cache::error::CacheError::from)??;
        info!("Caching responses in {}", store.cache_dir().display());

        let fetcher = WeatherFetcher::builder()
            .cache(ResponseCache::new(Arc::new(store), config.freshness))
            .config(config)
            .build()?;
        Ok(Self::with_fetcher(fetcher))
    }

    /// Creates an analyzer with a disk cache in the platform cache directory,
    /// e.g. `~/.cache/tempdist_cache` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`TempDistError::CacheDirResolution`] if the platform has no cache directory,
    /// otherwise the errors of [`TemperatureAnalyzer::with_cache_folder`].
    pub async fn new() -> Result<Self, TempDistError> {
        let cache_folder = get_cache_dir().ok_or(TempDistError::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder).await
    }

    /// Creates an analyzer whose cache lives only as long as the process.
    pub fn in_memory() -> Result<Self, TempDistError> {
        Ok(Self::with_fetcher(WeatherFetcher::builder().build()?))
    }

    /// Uses a preconfigured fetcher, e.g. with a custom transport or cache.
    pub fn with_fetcher(fetcher: WeatherFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &WeatherFetcher {
        &self.fetcher
    }

    /// Runs a full analysis for a location and date range.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.latitude(f64)`: **Required.** Within `[-90, 90]`.
    /// * `.longitude(f64)`: **Required.** Within `[-180, 180]`.
    /// * `.start_date(NaiveDate)`: **Required.**
    /// * `.end_date(NaiveDate)`: **Required.** Must be after `start_date`.
    /// * `.threshold_step(f64)`: Optional. Spacing of the distribution thresholds in °C,
    ///   defaults to [`DEFAULT_THRESHOLD_STEP`].
    ///
    /// # Errors
    ///
    /// * [`TempDistError::Validation`] for bad input. Nothing is fetched in that case.
    /// * [`TempDistError::Statistics`] with [`crate::StatisticsError::InvalidThresholdStep`]
    ///   if the step is not positive and finite. Nothing is fetched in that case either.
    /// * [`TempDistError::Fetch`] if the provider data cannot be obtained.
    /// * [`TempDistError::Statistics`] if the provider returned no records, or the
    ///   step is too fine for the temperature range.
    #[builder]
    pub async fn analyze(
        &self,
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        threshold_step: Option<f64>,
    ) -> Result<TemperatureAnalysis, TempDistError> {
        let query = validate(latitude, longitude, start_date, end_date)?;
        self.analyze_query(&query, threshold_step.unwrap_or(DEFAULT_THRESHOLD_STEP))
            .await
    }

    /// Runs a full analysis for an already validated query.
    ///
    /// The threshold step is checked before anything is fetched.
    pub async fn analyze_query(
        &self,
        query: &LocationQuery,
        threshold_step: f64,
    ) -> Result<TemperatureAnalysis, TempDistError> {
        check_threshold_step(threshold_step)?;
        let (metadata, records) = self.fetcher.fetch(query).await?;
        let summary = summarize(&records)?;
        let cold_days = cold_day_curve(&records, threshold_step)?;
        let hot_days = hot_day_curve(&records, threshold_step)?;

        info!(
            "Analyzed {} days at {}: coldest {} ({} °C), hottest {} ({} °C)",
            summary.total_days,
            metadata.coordinates_label(),
            summary.coldest_day.date,
            summary.coldest_day.min_temp,
            summary.hottest_day.date,
            summary.hottest_day.max_temp
        );

        Ok(TemperatureAnalysis {
            query: *query,
            metadata,
            records,
            summary,
            cold_days,
            hot_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetching::testing::{archive_body, ok, ManualClock, ScriptedTransport};
    use crate::statistics::error::StatisticsError;
    use crate::validation::error::ValidationError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn london_records() -> Vec<DailyTemperatureRecord> {
        vec![
            DailyTemperatureRecord::new(date(2023, 1, 1), -2.0, 5.0),
            DailyTemperatureRecord::new(date(2023, 1, 2), -5.0, 3.0),
            DailyTemperatureRecord::new(date(2023, 1, 3), 1.0, 8.0),
        ]
    }

    fn analyzer(transport: Arc<ScriptedTransport>) -> TemperatureAnalyzer {
        TemperatureAnalyzer::with_fetcher(
            WeatherFetcher::builder()
                .transport(transport)
                .clock(Arc::new(ManualClock::new()))
                .build()
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_london_end_to_end() -> Result<(), TempDistError> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let analyzer = analyzer(Arc::clone(&transport));

        let analysis = analyzer
            .analyze()
            .latitude(51.5074)
            .longitude(-0.1278)
            .start_date(date(2023, 1, 1))
            .end_date(date(2023, 1, 3))
            .call()
            .await?;

        assert_eq!(analysis.records, london_records());
        assert_eq!(analysis.summary.total_days, 3);
        assert_eq!(analysis.summary.coldest_day.date, date(2023, 1, 2));
        assert_eq!(analysis.summary.coldest_day.min_temp, -5.0);
        assert_eq!(analysis.summary.hottest_day.date, date(2023, 1, 3));
        assert_eq!(analysis.summary.hottest_day.max_temp, 8.0);
        assert_eq!(analysis.summary.avg_min, -2.0);
        assert!((analysis.summary.avg_max - 5.33).abs() < 0.01);
        assert_eq!(analysis.cold_days.count(0.0), Some(2));
        assert_eq!(analysis.hot_days.count(4.0), Some(2));
        assert_eq!(
            analysis.export_file_name(),
            "temperature_data_51.5074_-0.1278_2023-01-01_2023-01-03.csv"
        );
        assert!(analysis.to_csv()?.starts_with("date,min_temp,max_temp"));
        assert_eq!(transport.calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_reversed_dates_fail_before_fetching() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let analyzer = analyzer(Arc::clone(&transport));

        let result = analyzer
            .analyze()
            .latitude(51.5074)
            .longitude(-0.1278)
            .start_date(date(2023, 6, 1))
            .end_date(date(2023, 1, 1))
            .call()
            .await;

        assert!(matches!(
            result,
            Err(TempDistError::Validation(ValidationError::InvalidRange { .. }))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_threshold_step_fails_before_fetching() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let analyzer = analyzer(Arc::clone(&transport));

        for step in [0.0, -0.2, f64::NAN] {
            let result = analyzer
                .analyze()
                .latitude(51.5074)
                .longitude(-0.1278)
                .start_date(date(2023, 1, 1))
                .end_date(date(2023, 1, 3))
                .threshold_step(step)
                .call()
                .await;

            assert!(
                matches!(
                    result,
                    Err(TempDistError::Statistics(StatisticsError::InvalidThresholdStep(_)))
                ),
                "step {step} should be rejected"
            );
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_too_fine_threshold_step_is_an_error() {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let result = analyzer(transport)
            .analyze()
            .latitude(51.5074)
            .longitude(-0.1278)
            .start_date(date(2023, 1, 1))
            .end_date(date(2023, 1, 3))
            .threshold_step(1e-12)
            .call()
            .await;

        assert!(matches!(
            result,
            Err(TempDistError::Statistics(StatisticsError::SweepTooLarge { .. }))
        ));
    }

    #[tokio::test]
    async fn test_custom_threshold_step() -> Result<(), TempDistError> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let analysis = analyzer(transport)
            .analyze()
            .latitude(51.5074)
            .longitude(-0.1278)
            .start_date(date(2023, 1, 1))
            .end_date(date(2023, 1, 3))
            .threshold_step(1.0)
            .call()
            .await?;

        assert_eq!(analysis.cold_days.thresholds(), vec![-5.0, -4.0, -3.0, -2.0, -1.0, 0.0, 1.0]);
        assert_eq!(analysis.hot_days.thresholds(), vec![3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        Ok(())
    }

    #[tokio::test]
    async fn test_disk_cache_survives_a_new_analyzer() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let folder = dir.path().join("nested").join("cache");
        let first = TemperatureAnalyzer::with_cache_folder(folder.clone()).await?;
        assert!(folder.is_dir());

        let query = validate(51.5074, -0.1278, date(2023, 1, 1), date(2023, 1, 3))?;
        let key = crate::cache::request_key::RequestKey::new(&query, 4);
        first
            .fetcher()
            .cache()
            .put(&key, archive_body(&london_records()), chrono::Utc::now())
            .await?;

        let second = TemperatureAnalyzer::with_cache_folder(folder).await?;
        let analysis = second.analyze_query(&query, DEFAULT_THRESHOLD_STEP).await?;
        assert_eq!(analysis.records, london_records());
        Ok(())
    }

    #[tokio::test]
    async fn test_write_csv_uses_export_file_name() -> Result<(), Box<dyn std::error::Error>> {
        let transport = Arc::new(ScriptedTransport::new(vec![ok(archive_body(&london_records()))]));
        let analysis = analyzer(transport)
            .analyze()
            .latitude(51.5074)
            .longitude(-0.1278)
            .start_date(date(2023, 1, 1))
            .end_date(date(2023, 1, 3))
            .call()
            .await?;

        let dir = tempfile::tempdir()?;
        let path = analysis.write_csv(dir.path()).await?;
        assert_eq!(path, dir.path().join(analysis.export_file_name()));
        assert!(path.is_file());
        Ok(())
    }
}
