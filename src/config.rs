//! Startup settings for the dashboard.

use crate::catalog::city_catalog::{default_catalog_path, CityCatalog};
use crate::error::DashboardError;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::cache::SeriesCache;
use crate::weather_data::fetcher::WeatherFetcher;
use crate::weather_data::open_meteo::{OpenMeteoArchive, DEFAULT_BASE_URL};
use crate::weather_data::retry::RetryPolicy;
use bon::Builder;
use std::path::PathBuf;

/// Where the dashboard reads its cities, caches archive answers, and
/// which archive it talks to.
///
/// # Examples
///
/// ```
/// use heatpump_counter::{DashboardConfig, RetryPolicy};
///
/// let config = DashboardConfig::builder()
///     .catalog_path("data/cities.csv")
///     .cache_folder("/tmp/heatpump")
///     .retry(RetryPolicy::builder().max_retries(2).build())
///     .build();
/// assert_eq!(config.api_base_url, "https://archive-api.open-meteo.com");
/// assert_eq!(config.retry.max_retries, 2);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct DashboardConfig {
    #[builder(default = default_catalog_path(), into)]
    pub catalog_path: PathBuf,
    /// Defaults to `heatpump_counter_cache` inside the system cache directory.
    #[builder(into)]
    pub cache_folder: Option<PathBuf>,
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub api_base_url: String,
    /// Also carries the per-attempt timeout applied to the HTTP client.
    #[builder(default)]
    pub retry: RetryPolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DashboardConfig {
    pub fn load_catalog(&self) -> Result<CityCatalog, DashboardError> {
        Ok(CityCatalog::load(&self.catalog_path)?)
    }

    /// Resolves and creates the cache folder, then wires an archive client,
    /// retry policy and disk cache into a fetcher.
    pub async fn open_fetcher(&self) -> Result<WeatherFetcher, DashboardError> {
        let folder = match &self.cache_folder {
            Some(folder) => folder.clone(),
            None => get_cache_dir().map_err(DashboardError::CacheDirResolution)?,
        };
        ensure_cache_dir_exists(&folder)
            .await
            .map_err(|e| DashboardError::CacheDirCreation(folder.clone(), e))?;

        let transport = OpenMeteoArchive::new(&self.api_base_url, self.retry.attempt_timeout)?;
        Ok(WeatherFetcher::new(
            transport,
            self.retry,
            SeriesCache::on_disk(&folder),
        ))
    }
}
