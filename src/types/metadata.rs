use serde::{Deserialize, Serialize};
use std::fmt;

/// Location details reported by the weather provider alongside the daily data.
///
/// The provider snaps the requested coordinates to its grid, so `latitude` and
/// `longitude` usually differ slightly from the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetadata {
    /// Grid-cell latitude in decimal degrees.
    pub latitude: f64,
    /// Grid-cell longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation: f64,
    /// IANA timezone name the daily aggregation was computed in (e.g. "GMT").
    pub timezone: String,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: i32,
}

impl LocationMetadata {
    /// Formats the coordinates the way the analysis overview shows them, e.g. `51.49°N, -0.16°E`.
    pub fn coordinates_label(&self) -> String {
        format!("{:.2}°N, {:.2}°E", self.latitude, self.longitude)
    }
}

impl fmt::Display for LocationMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | elevation {} m | timezone {}",
            self.coordinates_label(),
            self.elevation,
            self.timezone
        )
    }
}
