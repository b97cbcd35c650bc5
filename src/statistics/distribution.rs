//! Threshold-crossing counts over a record sequence.

use crate::statistics::error::StatisticsError;
use crate::types::daily_record::DailyTemperatureRecord;
use crate::types::distribution::{TemperatureField, ThresholdDistribution, ThresholdPoint};
use log::warn;

/// Spacing of the thresholds of [`cold_day_curve`] and [`hot_day_curve`] in °C.
pub const DEFAULT_THRESHOLD_STEP: f64 = 0.2;

/// Upper bound on the number of thresholds a single sweep may produce.
pub const MAX_SWEEP_POINTS: usize = 100_000;

// Quotients this close to an integer are treated as exact multiples of the step,
// so 1.0 / 0.2 = 4.999999... does not push the sweep one step outward.
const SNAP_TOLERANCE: f64 = 1e-9;
const THRESHOLD_DECIMALS_FACTOR: f64 = 1e10;

/// Counts, for every threshold, the days crossing it.
///
/// * [`TemperatureField::Min`]: days with `min_temp < threshold` (cold days).
/// * [`TemperatureField::Max`]: days with `max_temp > threshold` (hot days).
///
/// Thresholds may be given in any order; the result is keyed by threshold.
/// For `Min` the counts never decrease as the threshold grows, for `Max` they never increase.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempdist::{distribution, DailyTemperatureRecord, TemperatureField};
///
/// let day = |d| NaiveDate::from_ymd_opt(2023, 1, d).unwrap();
/// let records = [
///     DailyTemperatureRecord::new(day(1), -2.0, 5.0),
///     DailyTemperatureRecord::new(day(2), -5.0, 3.0),
///     DailyTemperatureRecord::new(day(3), 1.0, 8.0),
/// ];
///
/// let cold = distribution(&records, &[-3.0, 0.0, 2.0], TemperatureField::Min);
/// assert_eq!(cold.count(-3.0), Some(1));
/// assert_eq!(cold.count(0.0), Some(2));
/// assert_eq!(cold.count(2.0), Some(3));
/// ```
pub fn distribution(
    records: &[DailyTemperatureRecord],
    thresholds: &[f64],
    field: TemperatureField,
) -> ThresholdDistribution {
    let mut values: Vec<f64> = records.iter().map(|r| r.value(field)).collect();
    values.sort_by(f64::total_cmp);

    let points = thresholds.iter().map(|&threshold| {
        let count = match field {
            TemperatureField::Min => values.partition_point(|&v| v < threshold),
            TemperatureField::Max => values.len() - values.partition_point(|&v| v <= threshold),
        };
        ThresholdPoint { threshold, count }
    });

    ThresholdDistribution::new(field, points)
}

/// Ascending thresholds spanning the values of `field`, `step` apart.
///
/// The sweep runs from `floor(min / step) * step` to `ceil(max / step) * step`, both
/// inclusive, so the lowest threshold counts no cold days and the highest no hot days.
/// An empty record sequence yields an empty sweep.
///
/// # Errors
///
/// * [`StatisticsError::InvalidThresholdStep`] if `step` is not a positive finite number.
/// * [`StatisticsError::SweepTooLarge`] if the sweep would exceed [`MAX_SWEEP_POINTS`].
pub fn threshold_sweep(
    records: &[DailyTemperatureRecord],
    field: TemperatureField,
    step: f64,
) -> Result<Vec<f64>, StatisticsError> {
    check_threshold_step(step)?;

    let bounds = records
        .iter()
        .map(|r| r.value(field))
        .filter(|v| v.is_finite())
        .fold(None, |bounds: Option<(f64, f64)>, v| match bounds {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });
    let Some((lowest, highest)) = bounds else {
        return Ok(Vec::new());
    };

    let first = snapped_floor(lowest / step);
    let last = snapped_ceil(highest / step);
    let points = (i128::from(last) - i128::from(first) + 1).unsigned_abs();
    if points > MAX_SWEEP_POINTS as u128 {
        warn!(
            "Refusing a sweep of {} points over [{}, {}] with step {}",
            points, lowest, highest, step
        );
        return Err(StatisticsError::SweepTooLarge {
            points,
            max: MAX_SWEEP_POINTS,
        });
    }

    Ok((first..=last)
        .map(|idx| round_threshold(idx as f64 * step))
        .collect())
}

/// Distribution of cold days over a [`threshold_sweep`] of the daily minimums.
pub fn cold_day_curve(
    records: &[DailyTemperatureRecord],
    step: f64,
) -> Result<ThresholdDistribution, StatisticsError> {
    let thresholds = threshold_sweep(records, TemperatureField::Min, step)?;
    Ok(distribution(records, &thresholds, TemperatureField::Min))
}

/// Distribution of hot days over a [`threshold_sweep`] of the daily maximums.
pub fn hot_day_curve(
    records: &[DailyTemperatureRecord],
    step: f64,
) -> Result<ThresholdDistribution, StatisticsError> {
    let thresholds = threshold_sweep(records, TemperatureField::Max, step)?;
    Ok(distribution(records, &thresholds, TemperatureField::Max))
}

/// Fails with [`StatisticsError::InvalidThresholdStep`] unless `step` is positive and finite.
pub fn check_threshold_step(step: f64) -> Result<(), StatisticsError> {
    if step.is_finite() && step > 0.0 {
        Ok(())
    } else {
        Err(StatisticsError::InvalidThresholdStep(step))
    }
}

fn snapped_floor(quotient: f64) -> i64 {
    let nearest = quotient.round();
    if (quotient - nearest).abs() < SNAP_TOLERANCE {
        nearest as i64
    } else {
        quotient.floor() as i64
    }
}

fn snapped_ceil(quotient: f64) -> i64 {
    let nearest = quotient.round();
    if (quotient - nearest).abs() < SNAP_TOLERANCE {
        nearest as i64
    } else {
        quotient.ceil() as i64
    }
}

fn round_threshold(value: f64) -> f64 {
    (value * THRESHOLD_DECIMALS_FACTOR).round() / THRESHOLD_DECIMALS_FACTOR + 0.0
}
