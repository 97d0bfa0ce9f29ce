//! An in-process archive for tests: deterministic data, scripted failures, call counting.

use crate::types::lat_lon::LatLon;
use crate::types::series::nth_day;
use crate::types::unit_system::UnitSystem;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::open_meteo::{ArchiveResponse, ArchiveTransport, DailyBlock};
use crate::weather_data::query::QueryParams;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FakeBehavior {
    Healthy,
    /// Every attempt fails with a 503.
    Outage,
    /// The first `n` attempts fail with a 503, later ones succeed.
    FailFirst(usize),
    /// Answers one day short of the request.
    DropLastDay,
    /// Snaps every requested coordinate to this one grid cell.
    SingleCell(LatLon),
}

pub(crate) struct FakeArchive {
    behavior: Mutex<FakeBehavior>,
    calls: AtomicUsize,
}

impl FakeArchive {
    pub(crate) fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn set_behavior(&self, behavior: FakeBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// The grid cell the fake snaps a requested coordinate to.
    pub(crate) fn resolve(location: LatLon) -> LatLon {
        LatLon(location.0 - 0.0043, location.1 + 0.0087)
    }

    /// The minimum temperature the fake reports for the `index`-th requested day.
    ///
    /// Fahrenheit values cycle through -10..=29; Celsius is the exact conversion.
    pub(crate) fn value(index: usize, units: UnitSystem) -> f64 {
        let fahrenheit = (index * 7 % 40) as f64 - 10.0;
        match units {
            UnitSystem::Imperial => fahrenheit,
            UnitSystem::Metric => (fahrenheit - 32.0) * 5.0 / 9.0,
        }
    }

    fn respond(query: &QueryParams, resolved: LatLon, days: usize) -> ArchiveResponse {
        let time = (0..days).filter_map(|i| nth_day(query.start, i)).collect();
        let values = (0..days)
            .map(|i| Some(Self::value(i, query.units)))
            .collect();
        ArchiveResponse {
            latitude: resolved.0,
            longitude: resolved.1,
            daily: Some(DailyBlock {
                time,
                temperature_2m_min: Some(values),
            }),
        }
    }
}

impl ArchiveTransport for FakeArchive {
    async fn request_daily_minimum(
        &self,
        query: &QueryParams,
    ) -> Result<ArchiveResponse, WeatherDataError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = *self.behavior.lock().unwrap();
        let outage = || WeatherDataError::ServerError {
            url: "http://archive.test/v1/archive".to_string(),
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        };
        let resolved = Self::resolve(query.location);
        let days = query.expected_days();
        match behavior {
            FakeBehavior::Healthy => Ok(Self::respond(query, resolved, days)),
            FakeBehavior::Outage => Err(outage()),
            FakeBehavior::FailFirst(n) if call < n => Err(outage()),
            FakeBehavior::FailFirst(_) => Ok(Self::respond(query, resolved, days)),
            FakeBehavior::DropLastDay => {
                Ok(Self::respond(query, resolved, days.saturating_sub(1)))
            }
            FakeBehavior::SingleCell(cell) => Ok(Self::respond(query, cell, days)),
        }
    }
}
