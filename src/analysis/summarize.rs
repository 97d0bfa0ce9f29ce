//! How many days fell below each temperature in a range.

use crate::types::lat_lon::round_to;
use crate::types::series::DailyTemperatureSeries;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SummaryError {
    #[error("No data for this range")]
    EmptySeries,

    #[error("Table range is inverted: low {low} is above high {high}")]
    InvertedRange { low: i32, high: i32 },
}

/// One line of the threshold table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRow {
    pub temperature: i32,
    /// Days whose minimum was strictly below `temperature`.
    pub days_below: usize,
    /// `days_below / series length`, rounded to 3 decimals with ties to even.
    pub proportion_below: f64,
}

/// Builds one row per integer temperature from `high` down to `low`, inclusive.
///
/// # Errors
///
/// [`SummaryError::EmptySeries`] when there is nothing to count, and
/// [`SummaryError::InvertedRange`] when `low > high`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use heatpump_counter::{summarize, DailyTemperatureSeries, LatLon, UnitSystem};
///
/// let series = DailyTemperatureSeries::from_values(
///     LatLon(40.1, -88.2),
///     UnitSystem::Imperial,
///     NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
///     [-5.0, 0.0, 5.0, 10.0],
/// );
/// let rows = summarize(&series, 4, 5).unwrap();
/// assert_eq!(rows[0].temperature, 5);
/// assert_eq!(rows[0].days_below, 2);
/// assert_eq!(rows[0].proportion_below, 0.5);
/// ```
pub fn summarize(
    series: &DailyTemperatureSeries,
    low: i32,
    high: i32,
) -> Result<Vec<ThresholdRow>, SummaryError> {
    if low > high {
        return Err(SummaryError::InvertedRange { low, high });
    }
    if series.is_empty() {
        return Err(SummaryError::EmptySeries);
    }

    let mut sorted: Vec<f64> = series.values().collect();
    sorted.sort_by(f64::total_cmp);
    let total = sorted.len() as f64;

    Ok((low..=high)
        .rev()
        .map(|temperature| {
            let threshold = f64::from(temperature);
            let days_below = sorted.partition_point(|&v| v < threshold);
            ThresholdRow {
                temperature,
                days_below,
                proportion_below: round_to(days_below as f64 / total, 3),
            }
        })
        .collect())
}
