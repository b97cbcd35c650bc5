use crate::types::daily_record::DailyTemperatureRecord;
use chrono::NaiveDate;

/// Aggregate statistics over a non-empty sequence of [`DailyTemperatureRecord`]s.
///
/// Produced by [`crate::summarize`]. All temperatures are in °C.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSummary {
    /// Number of days summarized.
    pub total_days: usize,
    /// The day with the lowest minimum temperature. The earliest date wins ties.
    pub coldest_day: DailyTemperatureRecord,
    /// The day with the highest maximum temperature. The earliest date wins ties.
    pub hottest_day: DailyTemperatureRecord,
    /// Highest minimum temperature.
    pub warmest_min: f64,
    /// Lowest maximum temperature.
    pub coolest_max: f64,
    pub avg_min: f64,
    pub avg_max: f64,
    /// Hottest maximum minus coldest minimum.
    pub temp_range: f64,
    /// Dates whose minimum temperature exceeds their maximum.
    pub suspect_days: Vec<NaiveDate>,
}

impl TemperatureSummary {
    pub fn has_suspect_days(&self) -> bool {
        !self.suspect_days.is_empty()
    }
}
