use crate::cache::error::CacheError;
use crate::export::error::ExportError;
use crate::fetching::error::FetchError;
use crate::statistics::error::StatisticsError;
use crate::validation::error::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TempDistError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to build the HTTP client")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to determine the platform cache directory")]
    CacheDirResolution,
}
