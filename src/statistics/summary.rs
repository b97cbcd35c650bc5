use crate::statistics::error::StatisticsError;
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::summary::TemperatureSummary;

/// Computes the aggregate statistics of `records`.
///
/// The coldest day is the record with the lowest `min_temp`, the hottest day the one
/// with the highest `max_temp`. When several records share the extreme value, the one
/// with the earliest date is reported, regardless of input order.
///
/// Records with `min_temp > max_temp` are not corrected; their dates are listed in
/// [`TemperatureSummary::suspect_days`].
///
/// # Errors
///
/// [`StatisticsError::EmptyInput`] if `records` is empty.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempdist::{summarize, DailyTemperatureRecord};
///
/// let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
/// let records = [
///     DailyTemperatureRecord::new(day(1), -2.0, 5.0),
///     DailyTemperatureRecord::new(day(2), -5.0, 3.0),
///     DailyTemperatureRecord::new(day(3), 1.0, 8.0),
/// ];
///
/// let summary = summarize(&records)?;
/// assert_eq!(summary.coldest_day.date, day(2));
/// assert_eq!(summary.hottest_day.max_temp, 8.0);
/// assert_eq!(summary.temp_range, 13.0);
/// # Ok::<(), tempdist::StatisticsError>(())
/// ```
pub fn summarize(records: &[DailyTemperatureRecord]) -> Result<TemperatureSummary, StatisticsError> {
    let (first, rest) = records.split_first().ok_or(StatisticsError::EmptyInput)?;

    let mut coldest = first;
    let mut hottest = first;
    let mut warmest_min = first.min_temp;
    let mut coolest_max = first.max_temp;
    let mut sum_min = first.min_temp;
    let mut sum_max = first.max_temp;

    for record in rest {
        if record.min_temp < coldest.min_temp
            || (record.min_temp == coldest.min_temp && record.date < coldest.date)
        {
            coldest = record;
        }
        if record.max_temp > hottest.max_temp
            || (record.max_temp == hottest.max_temp && record.date < hottest.date)
        {
            hottest = record;
        }
        warmest_min = warmest_min.max(record.min_temp);
        coolest_max = coolest_max.min(record.max_temp);
        sum_min += record.min_temp;
        sum_max += record.max_temp;
    }

    let total_days = records.len();
    let suspect_days = records
        .iter()
        .filter(|r| r.is_suspect())
        .map(|r| r.date)
        .collect();

    Ok(TemperatureSummary {
        total_days,
        coldest_day: *coldest,
        hottest_day: *hottest,
        warmest_min,
        coolest_max,
        avg_min: sum_min / total_days as f64,
        avg_max: sum_max / total_days as f64,
        temp_range: hottest.max_temp - coldest.min_temp,
        suspect_days,
    })
}
