//! The daily minimum temperature series returned by the archive.

use crate::types::lat_lon::LatLon;
use crate::types::unit_system::UnitSystem;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperature {
    pub date: NaiveDate,
    /// Daily minimum air temperature at 2 m, in the series' unit system.
    pub min_temperature: f64,
}

/// An ordered run of daily minimum temperatures for one location.
///
/// Dates ascend one day at a time without gaps or duplicates. `location` is the
/// grid point the archive actually resolved, which is usually a little away from
/// the coordinate that was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTemperatureSeries {
    location: LatLon,
    units: UnitSystem,
    points: Vec<DailyTemperature>,
}

impl DailyTemperatureSeries {
    pub fn new(location: LatLon, units: UnitSystem, points: Vec<DailyTemperature>) -> Self {
        Self {
            location,
            units,
            points,
        }
    }

    /// Builds a series of consecutive days starting at `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use heatpump_counter::{DailyTemperatureSeries, LatLon, UnitSystem};
    ///
    /// let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    /// let series = DailyTemperatureSeries::from_values(
    ///     LatLon(40.1, -88.2),
    ///     UnitSystem::Imperial,
    ///     start,
    ///     [3.0, -1.5, 7.2],
    /// );
    /// assert_eq!(series.len(), 3);
    /// assert_eq!(series.end_date(), NaiveDate::from_ymd_opt(2022, 1, 3));
    /// ```
    pub fn from_values(
        location: LatLon,
        units: UnitSystem,
        start: NaiveDate,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        let points = start
            .iter_days()
            .zip(values)
            .map(|(date, min_temperature)| DailyTemperature {
                date,
                min_temperature,
            })
            .collect();
        Self::new(location, units, points)
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn points(&self) -> &[DailyTemperature] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.min_temperature)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}

/// Number of days in `start..=end`. Zero when `end` precedes `start`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> usize {
    if end < start {
        return 0;
    }
    (end - start).num_days() as usize + 1
}

/// The date `offset` days after `start`, if representable.
pub(crate) fn nth_day(start: NaiveDate, offset: usize) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(offset as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_range_is_inclusive() {
        assert_eq!(days_in_range(date(2022, 1, 1), date(2022, 1, 10)), 10);
        assert_eq!(days_in_range(date(2022, 1, 1), date(2022, 1, 1)), 1);
        assert_eq!(days_in_range(date(2022, 1, 2), date(2022, 1, 1)), 0);
        // 2024 is a leap year
        assert_eq!(days_in_range(date(2024, 1, 1), date(2024, 12, 31)), 366);
    }

    #[test]
    fn test_from_values_assigns_consecutive_dates() {
        let series = DailyTemperatureSeries::from_values(
            LatLon(1.0, 2.0),
            UnitSystem::Metric,
            date(2022, 2, 27),
            [1.0, 2.0, 3.0],
        );
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, [date(2022, 2, 27), date(2022, 2, 28), date(2022, 3, 1)]);
        assert_eq!(series.values().collect::<Vec<_>>(), [1.0, 2.0, 3.0]);
        assert_eq!(series.units(), UnitSystem::Metric);
    }

    #[test]
    fn test_empty_series() {
        let series = DailyTemperatureSeries::new(LatLon(0.0, 0.0), UnitSystem::Imperial, vec![]);
        assert!(series.is_empty());
        assert_eq!(series.start_date(), None);
        assert_eq!(series.end_date(), None);
    }

    #[test]
    fn test_nth_day() {
        assert_eq!(nth_day(date(2022, 12, 31), 1), Some(date(2023, 1, 1)));
    }
}
