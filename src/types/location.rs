//! Geographic coordinates and the validated query that a single analysis cycle runs on.

use chrono::NaiveDate;
use std::fmt;

/// A `(latitude, longitude)` pair in decimal degrees, e.g. one of the preset cities.
///
/// Unchecked: turn it into a [`LocationQuery`] through [`crate::validate`] before fetching.
///
/// ```
/// use tempdist::{find_popular_location, LatLon};
///
/// let LatLon(latitude, longitude) = find_popular_location("Paris").unwrap().location;
/// assert_eq!((latitude, longitude), (48.85, 2.35));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A validated request for daily temperatures at one location over a date range.
///
/// A `LocationQuery` can only be obtained through [`crate::validate`] (or
/// [`LocationQuery::new`], which delegates to it), so every instance satisfies:
///
/// * latitude within `[-90, 90]` and longitude within `[-180, 180]`
/// * `start_date < end_date`
///
/// It is immutable and lives for exactly one analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    latitude: f64,
    longitude: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl LocationQuery {
    /// Validates the inputs and builds a query. See [`crate::validate`].
    pub fn new(
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, crate::ValidationError> {
        crate::validate(latitude, longitude, start_date, end_date)
    }

    /// Only called by the validator once every invariant has been checked.
    pub(crate) fn from_validated(
        latitude: f64,
        longitude: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            latitude,
            longitude,
            start_date,
            end_date,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days covered by the query, both ends inclusive.
    ///
    /// This is the exact number of daily records a complete provider response must contain.
    pub fn day_count(&self) -> usize {
        let days = self
            .end_date
            .signed_duration_since(self.start_date)
            .num_days();
        // start < end is guaranteed, so this is always at least 2.
        days as usize + 1
    }

    /// Iterates every calendar day of the query in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start_date.iter_days().take(self.day_count())
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) from {} to {}",
            self.latitude, self.longitude, self.start_date, self.end_date
        )
    }
}
