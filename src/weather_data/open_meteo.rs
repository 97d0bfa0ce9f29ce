//! The Open-Meteo historical archive: wire format and HTTP transport.

use crate::types::lat_lon::LatLon;
use crate::types::series::{nth_day, DailyTemperature, DailyTemperatureSeries};
use crate::weather_data::error::{UpstreamDataError, WeatherDataError};
use crate::weather_data::query::{QueryParams, DAILY_VARIABLE};
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://archive-api.open-meteo.com";

/// One attempt at fetching the raw archive answer for a query.
///
/// This is the seam between the fetcher (validation, retries, caching) and the
/// network. Implementations should do exactly one outbound request per call and
/// report transient failures with an error for which
/// [`WeatherDataError::is_transient`] holds.
pub trait ArchiveTransport {
    fn request_daily_minimum(
        &self,
        query: &QueryParams,
    ) -> impl Future<Output = Result<ArchiveResponse, WeatherDataError>> + Send;
}

/// The subset of Open-Meteo's archive JSON this crate reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArchiveResponse {
    /// Latitude of the grid cell the archive used.
    pub latitude: f64,
    /// Longitude of the grid cell the archive used.
    pub longitude: f64,
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<NaiveDate>,
    #[serde(default)]
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    reason: String,
}

impl ArchiveResponse {
    /// Checks the answer against the query and turns it into a series.
    ///
    /// Every requested day must be present, in order, with a value. Nothing is
    /// dropped or filled in.
    pub fn into_series(self, query: &QueryParams) -> Result<DailyTemperatureSeries, UpstreamDataError> {
        let location = LatLon(self.latitude, self.longitude);
        if !location.is_valid() {
            return Err(UpstreamDataError::InvalidLocation {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }

        let daily = self.daily.ok_or(UpstreamDataError::MissingVariable("daily"))?;
        let values = daily
            .temperature_2m_min
            .ok_or(UpstreamDataError::MissingVariable(DAILY_VARIABLE))?;
        if values.len() != daily.time.len() {
            return Err(UpstreamDataError::LengthMismatch {
                variable: DAILY_VARIABLE,
                expected: daily.time.len(),
                found: values.len(),
            });
        }

        let expected = query.expected_days();
        if daily.time.len() != expected {
            return Err(UpstreamDataError::RowCountMismatch {
                expected,
                found: daily.time.len(),
            });
        }

        let mut points = Vec::with_capacity(expected);
        for (index, (date, value)) in daily.time.into_iter().zip(values).enumerate() {
            let expected_date = nth_day(query.start, index).unwrap_or(date);
            if date != expected_date {
                return Err(UpstreamDataError::DateMisaligned {
                    index,
                    expected: expected_date,
                    found: date,
                });
            }
            let min_temperature = value
                .filter(|v| v.is_finite())
                .ok_or(UpstreamDataError::MissingValue(date))?;
            points.push(DailyTemperature {
                date,
                min_temperature,
            });
        }

        Ok(DailyTemperatureSeries::new(location, query.units, points))
    }
}

/// HTTP transport for `{base_url}/v1/archive`.
#[derive(Debug, Clone)]
pub struct OpenMeteoArchive {
    client: Client,
    base_url: String,
}

impl OpenMeteoArchive {
    /// Creates a transport whose individual requests give up after `attempt_timeout`.
    pub fn new(base_url: impl Into<String>, attempt_timeout: Duration) -> Result<Self, WeatherDataError> {
        let client = Client::builder()
            .timeout(attempt_timeout)
            .build()
            .map_err(WeatherDataError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn archive_url(&self) -> String {
        format!("{}/v1/archive", self.base_url.trim_end_matches('/'))
    }
}

impl ArchiveTransport for OpenMeteoArchive {
    async fn request_daily_minimum(
        &self,
        query: &QueryParams,
    ) -> Result<ArchiveResponse, WeatherDataError> {
        let url = self.archive_url();
        debug!("Requesting {} with {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.clone(), e))?;

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Archive answered {} for {}", status, url);
            return Err(WeatherDataError::ServerError { url, status });
        }
        if !status.is_success() {
            let reason = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.reason)
                .unwrap_or_else(|_| body.trim().to_string());
            return Err(WeatherDataError::UpstreamRejected { status, reason });
        }

        serde_json::from_str(&body)
            .map_err(|e| WeatherDataError::UpstreamData(UpstreamDataError::Decode(e)))
    }
}
