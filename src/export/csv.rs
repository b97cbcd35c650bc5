//! CSV export and import of daily records through polars.
//!
//! The format is the one offered for download next to the charts:
//!
//! ```text
//! date,min_temp,max_temp
//! 2023-01-01,-2.0,5.0
//! ```

use crate::export::error::ExportError;
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::distribution::ThresholdDistribution;
use crate::types::location::LocationQuery;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

const DATE_COLUMN: &str = "date";
const MIN_COLUMN: &str = "min_temp";
const MAX_COLUMN: &str = "max_temp";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds a `DataFrame` with a `date` (Date) column and `min_temp` / `max_temp` (Float64) columns.
pub fn records_to_dataframe(records: &[DailyTemperatureRecord]) -> Result<DataFrame, ExportError> {
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    let min_temps: Vec<f64> = records.iter().map(|r| r.min_temp).collect();
    let max_temps: Vec<f64> = records.iter().map(|r| r.max_temp).collect();

    Ok(df!(
        DATE_COLUMN => dates,
        MIN_COLUMN => min_temps,
        MAX_COLUMN => max_temps,
    )?)
}

/// Converts a `DataFrame` with `date`, `min_temp` and `max_temp` columns back into records.
///
/// The date column may be a Date or an ISO string column; temperature columns are cast to Float64.
pub fn dataframe_to_records(df: &DataFrame) -> Result<Vec<DailyTemperatureRecord>, ExportError> {
    let date_column = required_column(df, DATE_COLUMN)?.cast(&DataType::String)?;
    let min_column = required_column(df, MIN_COLUMN)?.cast(&DataType::Float64)?;
    let max_column = required_column(df, MAX_COLUMN)?.cast(&DataType::Float64)?;

    let dates = date_column.str()?;
    let min_temps = min_column.f64()?;
    let max_temps = max_column.f64()?;

    dates
        .into_iter()
        .zip(min_temps.into_iter())
        .zip(max_temps.into_iter())
        .enumerate()
        .map(|(row, ((date, min_temp), max_temp))| {
            let date = date.ok_or_else(|| missing(DATE_COLUMN, row))?;
            let date = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|source| {
                ExportError::InvalidDate {
                    row,
                    value: date.to_string(),
                    source,
                }
            })?;
            let min_temp = min_temp.ok_or_else(|| missing(MIN_COLUMN, row))?;
            let max_temp = max_temp.ok_or_else(|| missing(MAX_COLUMN, row))?;
            Ok(DailyTemperatureRecord::new(date, min_temp, max_temp))
        })
        .collect()
}

/// Renders records as CSV with the header `date,min_temp,max_temp`.
pub fn to_csv(records: &[DailyTemperatureRecord]) -> Result<String, ExportError> {
    let mut df = records_to_dataframe(records)?;
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    Ok(String::from_utf8(buffer)?)
}

/// Parses CSV produced by [`to_csv`].
pub fn from_csv(csv: &str) -> Result<Vec<DailyTemperatureRecord>, ExportError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(csv.as_bytes().to_vec()))
        .finish()?;
    dataframe_to_records(&df)
}

/// A two-column frame of a distribution: `threshold` and the count label of its field.
pub fn distribution_to_dataframe(distribution: &ThresholdDistribution) -> Result<DataFrame, ExportError> {
    let counts: Vec<u32> = distribution
        .counts()
        .into_iter()
        .map(|c| u32::try_from(c).unwrap_or(u32::MAX))
        .collect();

    Ok(df!(
        "threshold" => distribution.thresholds(),
        distribution.field().count_label() => counts,
    )?)
}

/// File name offered for an export of `query`,
/// e.g. `temperature_data_51.5074_-0.1278_2023-01-01_2023-01-03.csv`.
pub fn default_file_name(query: &LocationQuery) -> String {
    format!(
        "temperature_data_{}_{}_{}_{}.csv",
        query.latitude(),
        query.longitude(),
        query.start_date(),
        query.end_date()
    )
}

/// Writes the CSV rendering of `records` to `path`, replacing any existing file.
pub async fn write_csv_file(path: &Path, records: &[DailyTemperatureRecord]) -> Result<(), ExportError> {
    let csv = to_csv(records)?;
    tokio::fs::write(path, csv)
        .await
        .map_err(|e| ExportError::FileWrite(path.to_path_buf(), e))?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ExportError> {
    df.column(name)
        .map_err(|_| ExportError::MissingColumn(name.to_string()))
}

fn missing(column: &str, row: usize) -> ExportError {
    ExportError::MissingValue {
        column: column.to_string(),
        row,
    }
}
