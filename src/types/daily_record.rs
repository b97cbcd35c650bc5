use crate::types::distribution::TemperatureField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Represents one day of temperature data.
///
/// Temperatures are in degrees Celsius at 2 meters above ground. A sequence of
/// records is ordered by `date`, which is unique within the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperatureRecord {
    pub date: NaiveDate,
    /// Minimum temperature of the day (°C).
    pub min_temp: f64,
    /// Maximum temperature of the day (°C).
    pub max_temp: f64,
}

impl DailyTemperatureRecord {
    pub fn new(date: NaiveDate, min_temp: f64, max_temp: f64) -> Self {
        Self {
            date,
            min_temp,
            max_temp,
        }
    }

    /// Returns the temperature for the requested field.
    pub fn value(&self, field: TemperatureField) -> f64 {
        match field {
            TemperatureField::Min => self.min_temp,
            TemperatureField::Max => self.max_temp,
        }
    }

    /// A record whose minimum exceeds its maximum is physically impossible.
    /// Such records are reported, never corrected.
    pub fn is_suspect(&self) -> bool {
        self.min_temp > self.max_temp
    }
}
