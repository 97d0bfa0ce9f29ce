//! The rendered dashboard: one result per region, plus a plain-text rendering.

use crate::analysis::summarize::{SummaryError, ThresholdRow};
use crate::catalog::error::CatalogError;
use crate::dashboard::inputs::DashboardInputs;
use crate::types::lat_lon::LatLon;
use crate::types::series::DailyTemperature;
use crate::types::unit_system::UnitSystem;
use crate::weather_data::error::WeatherDataError;
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

pub const MAP_ZOOM: u8 = 12;

/// Why a region of the dashboard could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("Weather data is unavailable right now: {0}")]
    Unavailable(String),

    #[error("Weather data could not be used: {0}")]
    DataContract(String),

    #[error("No data for this range")]
    NoData,

    #[error("Unknown city '{0}'")]
    UnknownCity(String),

    #[error("Invalid request: {0}")]
    InvalidQuery(String),
}

impl From<&WeatherDataError> for RegionError {
    fn from(err: &WeatherDataError) -> Self {
        match err {
            WeatherDataError::InvalidQuery(reason) => RegionError::InvalidQuery(reason.clone()),
            WeatherDataError::UpstreamRejected { .. } | WeatherDataError::UpstreamData(_) => {
                RegionError::DataContract(err.to_string())
            }
            _ => RegionError::Unavailable(err.to_string()),
        }
    }
}

impl From<&CatalogError> for RegionError {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::NotFound(label) => RegionError::UnknownCity(label.clone()),
            other => RegionError::Unavailable(other.to_string()),
        }
    }
}

impl From<&SummaryError> for RegionError {
    fn from(err: &SummaryError) -> Self {
        match err {
            SummaryError::EmptySeries => RegionError::NoData,
            SummaryError::InvertedRange { .. } => RegionError::InvalidQuery(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapMarker {
    pub center: LatLon,
    pub zoom: u8,
}

impl MapMarker {
    pub fn at(center: LatLon) -> Self {
        Self {
            center,
            zoom: MAP_ZOOM,
        }
    }
}

/// A rolling-mean overlay, `None` where the window is not yet full.
pub type OverlayLine = Vec<(NaiveDate, Option<f64>)>;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotView {
    pub threshold: i32,
    pub y_label: String,
    pub above: Vec<DailyTemperature>,
    pub below: Vec<DailyTemperature>,
    pub weekly: Option<OverlayLine>,
    pub monthly: Option<OverlayLine>,
}

pub fn y_axis_label(units: UnitSystem) -> String {
    format!("Daily Minimum Temperature {}", units.symbol())
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub inputs: DashboardInputs,
    pub coordinate_text: Result<String, RegionError>,
    pub map: Result<MapMarker, RegionError>,
    pub plot: Result<PlotView, RegionError>,
    pub table: Result<Vec<ThresholdRow>, RegionError>,
}

fn last_mean(line: &OverlayLine) -> String {
    line.iter()
        .rev()
        .find_map(|(_, mean)| *mean)
        .map_or_else(|| "n/a".to_string(), |mean| format!("{:.1}", mean))
}

impl fmt::Display for PlotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.y_label)?;
        writeln!(
            f,
            "  threshold {}: {} days at or above, {} days below",
            self.threshold,
            self.above.len(),
            self.below.len()
        )?;
        if let Some(weekly) = &self.weekly {
            writeln!(f, "  weekly average (latest): {}", last_mean(weekly))?;
        }
        if let Some(monthly) = &self.monthly {
            writeln!(f, "  monthly average (latest): {}", last_mean(monthly))?;
        }
        Ok(())
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dates = self.inputs.dates();
        writeln!(
            f,
            "{} | {} to {} | {}",
            self.inputs.city(),
            dates.start(),
            dates.end(),
            self.inputs.units()
        )?;

        match &self.coordinate_text {
            Ok(text) => writeln!(f, "Coordinate: {}", text)?,
            Err(e) => writeln!(f, "Coordinate: {}", e)?,
        }
        match &self.map {
            Ok(marker) => writeln!(f, "Map: {} (zoom {})", marker.center, marker.zoom)?,
            Err(e) => writeln!(f, "Map: {}", e)?,
        }
        match &self.plot {
            Ok(plot) => write!(f, "Plot: {}", plot)?,
            Err(e) => writeln!(f, "Plot: {}", e)?,
        }
        match &self.table {
            Ok(rows) => {
                writeln!(f, "{:>6} {:>6} {:>7}", "Temp", "Days", "Prop")?;
                for row in rows {
                    writeln!(
                        f,
                        "{:>6} {:>6} {:>7.3}",
                        row.temperature, row.days_below, row.proportion_below
                    )?;
                }
            }
            Err(e) => writeln!(f, "Table: {}", e)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather_data::error::UpstreamDataError;
    use std::time::Duration;

    #[test]
    fn test_region_error_classification() {
        let outage = WeatherDataError::UpstreamUnavailable {
            attempts: 6,
            elapsed: Duration::from_secs(30),
            last_error: Box::new(WeatherDataError::AttemptTimeout(Duration::from_secs(10))),
        };
        assert!(matches!(RegionError::from(&outage), RegionError::Unavailable(_)));

        let short = WeatherDataError::UpstreamData(UpstreamDataError::RowCountMismatch {
            expected: 10,
            found: 9,
        });
        assert!(matches!(RegionError::from(&short), RegionError::DataContract(_)));

        let unknown = CatalogError::NotFound("Atlantis, Nowhere".to_string());
        assert_eq!(
            RegionError::from(&unknown),
            RegionError::UnknownCity("Atlantis, Nowhere".to_string())
        );

        assert_eq!(RegionError::from(&SummaryError::EmptySeries), RegionError::NoData);
    }

    #[test]
    fn test_y_axis_label() {
        assert_eq!(
            y_axis_label(UnitSystem::Imperial),
            "Daily Minimum Temperature °F"
        );
        assert_eq!(y_axis_label(UnitSystem::Metric), "Daily Minimum Temperature °C");
    }

    #[test]
    fn test_text_rendering_shows_region_errors() {
        let view = DashboardView {
            inputs: DashboardInputs::default(),
            coordinate_text: Err(RegionError::NoData),
            map: Ok(MapMarker::at(LatLon(40.5, -88.0))),
            plot: Err(RegionError::NoData),
            table: Ok(vec![ThresholdRow {
                temperature: 0,
                days_below: 3,
                proportion_below: 0.25,
            }]),
        };
        let text = view.to_string();
        assert!(text.starts_with("Urbana, Illinois | 2022-01-01 to 2024-01-01 | fahrenheit"));
        assert!(text.contains("Coordinate: No data for this range"));
        assert!(text.contains("Map: 40.5°N, -88.0°E (zoom 12)"));
        assert!(text.contains("0.250"));
    }
}
