//! Open-Meteo archive response schema and its conversion into validated records.
//!
//! The JSON is first deserialized into loosely shaped structs (every temperature is
//! an `Option<f64>`, because the provider sends `null` for missing days), then
//! checked against the query: exactly one entry per requested calendar day, in
//! order, without gaps or nulls. Anything else is [`FetchError::InvalidResponse`].

use crate::fetching::error::FetchError;
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::location::LocationQuery;
use crate::types::metadata::LocationMetadata;
use chrono::NaiveDate;
use serde::Deserialize;

/// Daily variables requested from the provider, in this order.
pub const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min";

const PROVIDER_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: Option<String>,
    #[serde(default)]
    utc_offset_seconds: i32,
    daily: Option<ArchiveDaily>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

/// Body the provider sends with 4xx responses.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    reason: Option<String>,
}

/// Parses and validates a successful archive response for `query`.
pub fn parse_archive_response(
    body: &[u8],
    query: &LocationQuery,
) -> Result<(LocationMetadata, Vec<DailyTemperatureRecord>), FetchError> {
    let response: ArchiveResponse = serde_json::from_slice(body)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed JSON: {e}")))?;

    let daily = response.daily.ok_or_else(|| {
        FetchError::InvalidResponse("response contains no daily data block".to_string())
    })?;

    let expected_days = query.day_count();
    if daily.time.len() != expected_days {
        return Err(FetchError::InvalidResponse(format!(
            "expected {} days for {}..{}, provider returned {}",
            expected_days,
            query.start_date(),
            query.end_date(),
            daily.time.len()
        )));
    }
    if daily.temperature_2m_min.len() != expected_days
        || daily.temperature_2m_max.len() != expected_days
    {
        return Err(FetchError::InvalidResponse(format!(
            "temperature arrays are not aligned with the {} dates (min: {}, max: {})",
            expected_days,
            daily.temperature_2m_min.len(),
            daily.temperature_2m_max.len()
        )));
    }

    let records = query
        .dates()
        .zip(daily.time.iter())
        .zip(daily.temperature_2m_min.iter().zip(daily.temperature_2m_max.iter()))
        .map(|((expected_date, raw_date), (min_temp, max_temp))| {
            let date = NaiveDate::parse_from_str(raw_date, PROVIDER_DATE_FORMAT).map_err(|e| {
                FetchError::InvalidResponse(format!("unparseable date '{raw_date}': {e}"))
            })?;
            if date != expected_date {
                return Err(FetchError::InvalidResponse(format!(
                    "expected {expected_date} but provider returned {date}"
                )));
            }
            match (min_temp, max_temp) {
                (Some(min_temp), Some(max_temp)) => {
                    Ok(DailyTemperatureRecord::new(date, *min_temp, *max_temp))
                }
                _ => Err(FetchError::InvalidResponse(format!(
                    "missing temperature for {date}"
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let metadata = LocationMetadata {
        latitude: response.latitude,
        longitude: response.longitude,
        elevation: response.elevation,
        timezone: response.timezone,
        timezone_abbreviation: response.timezone_abbreviation,
        utc_offset_seconds: response.utc_offset_seconds,
    };

    Ok((metadata, records))
}

/// Extracts a human-readable message from an error response body.
pub(crate) fn describe_error_body(body: &[u8]) -> String {
    if let Ok(ProviderErrorBody {
        reason: Some(reason),
    }) = serde_json::from_slice::<ProviderErrorBody>(body)
    {
        return reason;
    }
    truncate_body(&String::from_utf8_lossy(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
