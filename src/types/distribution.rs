//! Types describing threshold-crossing distributions ("how many days were colder than X").

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;
use std::fmt;

/// Selects which daily temperature a computation looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureField {
    /// The daily minimum. Distributions count days with `min_temp < threshold` (cold days).
    Min,
    /// The daily maximum. Distributions count days with `max_temp > threshold` (hot days).
    Max,
}

impl TemperatureField {
    /// Column name used for this field in exported data.
    pub fn column_name(&self) -> &'static str {
        match self {
            TemperatureField::Min => "min_temp",
            TemperatureField::Max => "max_temp",
        }
    }

    /// Human-readable label of the count axis of a distribution over this field.
    pub fn count_label(&self) -> &'static str {
        match self {
            TemperatureField::Min => "Days with Min Temp Below",
            TemperatureField::Max => "Days with Max Temp Above",
        }
    }
}

impl fmt::Display for TemperatureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureField::Min => f.write_str("minimum temperature"),
            TemperatureField::Max => f.write_str("maximum temperature"),
        }
    }
}

/// One point of a [`ThresholdDistribution`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPoint {
    /// Threshold in °C.
    pub threshold: f64,
    /// Number of days crossing the threshold.
    pub count: usize,
}

/// Maps threshold values (°C) to the number of days crossing them.
///
/// Which direction counts as "crossing" depends on [`ThresholdDistribution::field`]:
/// below the threshold for [`TemperatureField::Min`], above it for [`TemperatureField::Max`].
/// Points are kept in ascending threshold order.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdDistribution {
    field: TemperatureField,
    counts: BTreeMap<OrderedFloat<f64>, usize>,
}

impl ThresholdDistribution {
    pub fn new(field: TemperatureField, points: impl IntoIterator<Item = ThresholdPoint>) -> Self {
        let counts = points
            .into_iter()
            .map(|point| (OrderedFloat(point.threshold), point.count))
            .collect();
        Self { field, counts }
    }

    pub fn field(&self) -> TemperatureField {
        self.field
    }

    /// Count for an exact threshold value, if that threshold was part of the sweep.
    pub fn count(&self, threshold: f64) -> Option<usize> {
        self.counts.get(&OrderedFloat(threshold)).copied()
    }

    /// Points in ascending threshold order.
    pub fn points(&self) -> impl Iterator<Item = ThresholdPoint> + '_ {
        self.counts.iter().map(|(threshold, count)| ThresholdPoint {
            threshold: threshold.into_inner(),
            count: *count,
        })
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.counts.keys().map(|t| t.into_inner()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.counts.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
