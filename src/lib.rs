mod analyzer;
mod cache;
mod error;
mod export;
mod fetching;
mod statistics;
mod types;
mod utils;
mod validation;

pub use analyzer::*;
pub use error::TempDistError;

pub use validation::error::ValidationError;
pub use validation::validator::{parse_iso_date, validate, validate_iso, LATITUDE_RANGE, LONGITUDE_RANGE};

pub use fetching::clock::{Clock, TokioClock};
pub use fetching::config::{FetcherConfig, DEFAULT_ARCHIVE_URL};
pub use fetching::error::{FetchError, FetchErrorReason};
pub use fetching::fetcher::WeatherFetcher;
pub use fetching::response::parse_archive_response;
pub use fetching::retry::RetryPolicy;
pub use fetching::transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};

pub use cache::error::CacheError;
pub use cache::request_key::RequestKey;
pub use cache::response_cache::{ResponseCache, DEFAULT_FRESHNESS};
pub use cache::store::{CacheStore, CachedResponse, DiskStore, MemoryStore, NoopStore};

pub use statistics::distribution::{
    check_threshold_step, cold_day_curve, distribution, hot_day_curve, threshold_sweep,
    DEFAULT_THRESHOLD_STEP, MAX_SWEEP_POINTS,
};
pub use statistics::error::StatisticsError;
pub use statistics::summary::summarize;

pub use export::csv::{
    dataframe_to_records, default_file_name, distribution_to_dataframe, from_csv,
    records_to_dataframe, to_csv, write_csv_file,
};
pub use export::error::ExportError;

pub use types::daily_record::DailyTemperatureRecord;
pub use types::distribution::{TemperatureField, ThresholdDistribution, ThresholdPoint};
pub use types::location::{LatLon, LocationQuery};
pub use types::metadata::LocationMetadata;
pub use types::popular_location::{
    find_popular_location, PopularLocation, DEFAULT_LOCATION, POPULAR_LOCATIONS,
};
pub use types::summary::TemperatureSummary;

pub use utils::get_cache_dir;
