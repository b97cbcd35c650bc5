use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Coordinates out of range: latitude {latitude} must be within [-90, 90] and longitude {longitude} within [-180, 180]")]
    OutOfRange { latitude: f64, longitude: f64 },

    #[error("Start date {start} must be before end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Could not parse '{input}' as an ISO-8601 date (YYYY-MM-DD)")]
    UnparseableDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
