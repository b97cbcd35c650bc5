use crate::types::location::LocationQuery;
use chrono::NaiveDate;
use std::fmt;

/// The exact parameters of one provider request, used as the cache key.
///
/// Coordinates are rounded to a fixed number of decimals and stored in their
/// formatted form, so two queries that only differ below that precision share
/// a key, and the key hashes and compares without floating point pitfalls.
/// The same rounded values are sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    latitude: String,
    longitude: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl RequestKey {
    pub fn new(query: &LocationQuery, precision: usize) -> Self {
        Self {
            latitude: format_coordinate(query.latitude(), precision),
            longitude: format_coordinate(query.longitude(), precision),
            start_date: query.start_date(),
            end_date: query.end_date(),
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// A file-name-safe rendering of the key, e.g. `51.5074_-0.1278_2023-01-01_2023-01-03`.
    pub fn storage_name(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.latitude, self.longitude, self.start_date, self.end_date
        )
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}..{}",
            self.latitude, self.longitude, self.start_date, self.end_date
        )
    }
}

fn format_coordinate(value: f64, precision: usize) -> String {
    let factor = 10f64.powi(precision as i32);
    // Adding 0.0 turns a rounded -0.0 into 0.0 so both hemispheres share one key at the equator.
    let rounded = (value * factor).round() / factor + 0.0;
    format!("{:.*}", precision, rounded)
}
