mod analysis;
mod catalog;
mod config;
mod dashboard;
mod error;
mod types;
mod utils;
mod weather_data;

pub use config::DashboardConfig;
pub use error::DashboardError;

pub use types::lat_lon::LatLon;
pub use types::series::{days_in_range, DailyTemperature, DailyTemperatureSeries};
pub use types::unit_system::UnitSystem;

pub use catalog::city_catalog::{default_catalog_path, CityCatalog, CityEntry};
pub use catalog::error::CatalogError;
pub use catalog::prepare::{prepare_catalog, DEFAULT_MIN_POPULATION};

pub use weather_data::cache::SeriesCache;
pub use weather_data::error::{UpstreamDataError, WeatherDataError};
pub use weather_data::fetcher::WeatherFetcher;
pub use weather_data::open_meteo::{
    ArchiveResponse, ArchiveTransport, DailyBlock, OpenMeteoArchive, DEFAULT_BASE_URL,
};
pub use weather_data::query::QueryParams;
pub use weather_data::retry::RetryPolicy;

pub use analysis::derive::{
    derive, partition, rolling_mean, DerivedPoint, DerivedSeries, ThresholdPartition,
    MONTHLY_WINDOW, WEEKLY_WINDOW,
};
pub use analysis::summarize::{summarize, SummaryError, ThresholdRow};

pub use dashboard::dashboard::{Dashboard, NodeComputations};
pub use dashboard::inputs::{
    date_picker_bounds, slider_defaults, DashboardInputs, DateRange, Overlays, RangeSlider,
    Slider, DEFAULT_CITY,
};
pub use dashboard::memo::Memo;
pub use dashboard::view::{DashboardView, MapMarker, OverlayLine, PlotView, RegionError};
