use crate::types::series::DailyTemperatureSeries;
use crate::weather_data::cache::SeriesCache;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::open_meteo::{ArchiveTransport, OpenMeteoArchive};
use crate::weather_data::query::QueryParams;
use crate::weather_data::retry::RetryPolicy;
use log::{debug, info};

/// Fetches daily minimum temperature series, retrying and caching around a transport.
pub struct WeatherFetcher<T = OpenMeteoArchive> {
    transport: T,
    retry: RetryPolicy,
    cache: SeriesCache,
}

impl<T: ArchiveTransport> WeatherFetcher<T> {
    pub fn new(transport: T, retry: RetryPolicy, cache: SeriesCache) -> Self {
        Self {
            transport,
            retry,
            cache,
        }
    }

    /// Returns the series for `query`, from cache when possible.
    ///
    /// # Errors
    ///
    /// - [`WeatherDataError::InvalidQuery`] before any I/O if the query is malformed.
    /// - [`WeatherDataError::UpstreamUnavailable`] once the retry policy is spent.
    /// - [`WeatherDataError::UpstreamRejected`] when the archive refuses the request.
    /// - [`WeatherDataError::UpstreamData`] when the answer does not match the request.
    pub async fn fetch(&self, query: &QueryParams) -> Result<DailyTemperatureSeries, WeatherDataError> {
        query.validate()?;

        if let Some(series) = self.cache.get(query).await {
            return Ok(series);
        }

        let response = self
            .retry
            .run(move |attempt| {
                debug!("Archive attempt {} for {:?}", attempt, query);
                self.transport.request_daily_minimum(query)
            })
            .await?;
        let series = response.into_series(query)?;
        info!(
            "Fetched {} days for {} ({} to {}, {})",
            series.len(),
            series.location(),
            query.start,
            query.end,
            query.units
        );

        self.cache.put(query, &series).await;
        Ok(series)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }
}
