//! Rolling averages and threshold partitions over a daily series.

use crate::types::lat_lon::LatLon;
use crate::types::series::{DailyTemperature, DailyTemperatureSeries};
use crate::types::unit_system::UnitSystem;
use chrono::NaiveDate;

pub const WEEKLY_WINDOW: usize = 7;
pub const MONTHLY_WINDOW: usize = 30;

/// A series point with its trailing rolling means.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPoint {
    pub date: NaiveDate,
    pub min_temperature: f64,
    /// Mean of this and the previous 6 days; `None` for the first 6 points.
    pub weekly_avg: Option<f64>,
    /// Mean of this and the previous 29 days; `None` for the first 29 points.
    pub monthly_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub location: LatLon,
    pub units: UnitSystem,
    pub points: Vec<DerivedPoint>,
}

/// Points on either side of a plot threshold.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdPartition {
    /// `min_temperature >= threshold`
    pub at_or_above: Vec<DailyTemperature>,
    /// `min_temperature < threshold`
    pub below: Vec<DailyTemperature>,
}

/// Trailing mean over `window` values, `None` until the window is full.
///
/// A `window` of zero yields all `None`.
///
/// # Examples
///
/// ```
/// use heatpump_counter::rolling_mean;
///
/// let means = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 3);
/// assert_eq!(means, [None, None, Some(2.0), Some(3.0)]);
/// ```
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut means = Vec::with_capacity(values.len());
    if window == 0 {
        means.resize(values.len(), None);
        return means;
    }

    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        means.push((i + 1 >= window).then(|| sum / window as f64));
    }
    means
}

/// Adds the weekly and monthly trailing means to every point.
pub fn derive(series: &DailyTemperatureSeries) -> DerivedSeries {
    let values: Vec<f64> = series.values().collect();
    let weekly = rolling_mean(&values, WEEKLY_WINDOW);
    let monthly = rolling_mean(&values, MONTHLY_WINDOW);

    let points = series
        .points()
        .iter()
        .zip(weekly)
        .zip(monthly)
        .map(|((point, weekly_avg), monthly_avg)| DerivedPoint {
            date: point.date,
            min_temperature: point.min_temperature,
            weekly_avg,
            monthly_avg,
        })
        .collect();

    DerivedSeries {
        location: series.location(),
        units: series.units(),
        points,
    }
}

/// Splits the series at `threshold`, keeping date order on both sides.
pub fn partition(series: &DailyTemperatureSeries, threshold: f64) -> ThresholdPartition {
    let (at_or_above, below) = series
        .points()
        .iter()
        .copied()
        .partition(|p| p.min_temperature >= threshold);
    ThresholdPartition { at_or_above, below }
}

impl DerivedSeries {
    /// `(date, weekly_avg)` pairs, for drawing the weekly overlay.
    pub fn weekly_line(&self) -> Vec<(NaiveDate, Option<f64>)> {
        self.points.iter().map(|p| (p.date, p.weekly_avg)).collect()
    }

    /// `(date, monthly_avg)` pairs, for drawing the monthly overlay.
    pub fn monthly_line(&self) -> Vec<(NaiveDate, Option<f64>)> {
        self.points.iter().map(|p| (p.date, p.monthly_avg)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> DailyTemperatureSeries {
        DailyTemperatureSeries::from_values(
            LatLon(40.1, -88.2),
            UnitSystem::Imperial,
            NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            values.iter().copied(),
        )
    }

    #[test]
    fn test_weekly_average_of_one_to_eight() {
        let derived = derive(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));
        let weekly: Vec<_> = derived.points.iter().map(|p| p.weekly_avg).collect();

        assert!(weekly[..6].iter().all(Option::is_none));
        assert_eq!(weekly[6], Some(4.0));
        assert_eq!(weekly[7], Some(5.0));
        assert!(derived.points.iter().all(|p| p.monthly_avg.is_none()));
    }

    #[test]
    fn test_monthly_average_window() {
        let values: Vec<f64> = (1..=31).map(f64::from).collect();
        let derived = derive(&series(&values));

        assert!(derived.points[..29].iter().all(|p| p.monthly_avg.is_none()));
        // mean(1..=30) and mean(2..=31)
        assert_eq!(derived.points[29].monthly_avg, Some(15.5));
        assert_eq!(derived.points[30].monthly_avg, Some(16.5));
    }

    #[test]
    fn test_rolling_mean_matches_naive_mean() {
        let values: Vec<f64> = (0..200).map(|i| ((i * 37) % 23) as f64 * 0.7 - 5.3).collect();
        let fast = rolling_mean(&values, WEEKLY_WINDOW);
        for (i, mean) in fast.iter().enumerate() {
            match mean {
                None => assert!(i < WEEKLY_WINDOW - 1),
                Some(mean) => {
                    let window = &values[i + 1 - WEEKLY_WINDOW..=i];
                    let naive = window.iter().sum::<f64>() / WEEKLY_WINDOW as f64;
                    assert!((mean - naive).abs() < 1e-9, "index {i}: {mean} vs {naive}");
                }
            }
        }
    }

    #[test]
    fn test_short_and_empty_inputs() {
        assert!(rolling_mean(&[], 7).is_empty());
        assert_eq!(rolling_mean(&[1.0, 2.0], 7), [None, None]);
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), [None, None]);
        assert!(derive(&series(&[])).points.is_empty());
    }

    #[test]
    fn test_derive_is_deterministic() {
        let input = series(&[3.3, -1.7, 8.25, 0.1, 4.4, 9.9, -3.0, 2.2, 5.5]);
        assert_eq!(derive(&input), derive(&input));
    }

    #[test]
    fn test_partition_at_threshold() {
        let split = partition(&series(&[-5.0, 0.0, 5.0, 10.0]), 5.0);
        let above: Vec<_> = split.at_or_above.iter().map(|p| p.min_temperature).collect();
        let below: Vec<_> = split.below.iter().map(|p| p.min_temperature).collect();
        assert_eq!(above, [5.0, 10.0]);
        assert_eq!(below, [-5.0, 0.0]);
    }
}
