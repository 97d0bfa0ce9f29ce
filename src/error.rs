use crate::catalog::error::CatalogError;
use crate::weather_data::error::WeatherDataError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
