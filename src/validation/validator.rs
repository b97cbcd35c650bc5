//! Input checks that run before any network traffic happens.

use crate::types::location::LocationQuery;
use crate::validation::error::ValidationError;
use chrono::NaiveDate;
use std::ops::RangeInclusive;

pub const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
pub const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates user input and turns it into a [`LocationQuery`].
///
/// Coordinates are checked first, then the date order. `NaN` coordinates are out of range.
/// This function is pure: it performs no I/O.
///
/// # Errors
///
/// * [`ValidationError::OutOfRange`] if the latitude is outside `[-90, 90]` or the
///   longitude outside `[-180, 180]`.
/// * [`ValidationError::InvalidRange`] if `start_date >= end_date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempdist::{validate, ValidationError};
///
/// let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
///
/// let result = validate(51.5074, -0.1278, start, end);
/// assert!(matches!(result, Err(ValidationError::InvalidRange { .. })));
/// ```
pub fn validate(
    latitude: f64,
    longitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<LocationQuery, ValidationError> {
    if !LATITUDE_RANGE.contains(&latitude) || !LONGITUDE_RANGE.contains(&longitude) {
        return Err(ValidationError::OutOfRange {
            latitude,
            longitude,
        });
    }
    if start_date >= end_date {
        return Err(ValidationError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }
    Ok(LocationQuery::from_validated(
        latitude, longitude, start_date, end_date,
    ))
}

/// Same as [`validate`], with the dates given as ISO-8601 strings (`YYYY-MM-DD`).
///
/// # Errors
///
/// [`ValidationError::UnparseableDate`] for a malformed date, otherwise the errors of [`validate`].
pub fn validate_iso(
    latitude: f64,
    longitude: f64,
    start_date: &str,
    end_date: &str,
) -> Result<LocationQuery, ValidationError> {
    let start = parse_iso_date(start_date)?;
    let end = parse_iso_date(end_date)?;
    validate(latitude, longitude, start, end)
}

pub fn parse_iso_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE_FORMAT).map_err(|source| {
        ValidationError::UnparseableDate {
            input: input.to_string(),
            source,
        }
    })
}
