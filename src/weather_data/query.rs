use crate::types::lat_lon::LatLon;
use crate::types::series::days_in_range;
use crate::types::unit_system::UnitSystem;
use crate::weather_data::error::WeatherDataError;
use chrono::{Datelike, NaiveDate};

/// First year the ERA5-backed archive has data for.
pub const ARCHIVE_FIRST_YEAR: i32 = 1940;

/// The daily variable requested from the archive.
pub(crate) const DAILY_VARIABLE: &str = "temperature_2m_min";

/// Everything that identifies one archive request.
///
/// Both `start` and `end` are inclusive, so `2022-01-01..=2022-01-10` asks for ten days.
/// Two equal `QueryParams` always produce the same request and the same cache entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParams {
    pub location: LatLon,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub units: UnitSystem,
}

impl QueryParams {
    pub fn new(location: LatLon, start: NaiveDate, end: NaiveDate, units: UnitSystem) -> Self {
        Self {
            location,
            start,
            end,
            units,
        }
    }

    pub fn validate(&self) -> Result<(), WeatherDataError> {
        if !self.location.is_valid() {
            return Err(WeatherDataError::InvalidQuery(format!(
                "coordinate ({}, {}) is out of range",
                self.location.0, self.location.1
            )));
        }
        if self.start > self.end {
            return Err(WeatherDataError::InvalidQuery(format!(
                "start date {} is after end date {}",
                self.start, self.end
            )));
        }
        if self.start.year() < ARCHIVE_FIRST_YEAR {
            return Err(WeatherDataError::InvalidQuery(format!(
                "start date {} predates the archive ({}-01-01)",
                self.start, ARCHIVE_FIRST_YEAR
            )));
        }
        Ok(())
    }

    /// Number of daily rows a complete answer has.
    pub fn expected_days(&self) -> usize {
        days_in_range(self.start, self.end)
    }

    pub(crate) fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", self.location.0.to_string()),
            ("longitude", self.location.1.to_string()),
            ("start_date", self.start.format("%Y-%m-%d").to_string()),
            ("end_date", self.end.format("%Y-%m-%d").to_string()),
            ("daily", DAILY_VARIABLE.to_string()),
            ("temperature_unit", self.units.api_value().to_string()),
            ("timezone", "GMT".to_string()),
        ]
    }

    /// A stable, filename-safe key built from every request parameter.
    pub(crate) fn cache_key(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            DAILY_VARIABLE,
            self.location.0,
            self.location.1,
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d"),
            self.units.api_value()
        )
    }
}
