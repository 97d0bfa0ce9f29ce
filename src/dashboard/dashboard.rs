//! The dashboard's dependency graph: inputs feed memoized nodes, nodes feed regions.
//!
//! ```text
//! city ──► coordinate ─┐
//! dates ───────────────┼─► raw series ─┬─► derived ──┐
//! units ───────────────┘               │             ├─► plot (+ threshold, overlays)
//!                                      │             │
//!                                      ├─────────────┘
//!                                      └─► table (+ table range)
//! ```
//!
//! A node recomputes only when one of its own dependencies changed, so moving
//! the plot threshold never refetches and switching units never re-reads the
//! catalog.

use crate::analysis::derive::{derive, partition, DerivedSeries};
use crate::analysis::summarize::{summarize, ThresholdRow};
use crate::catalog::city_catalog::CityCatalog;
use crate::config::DashboardConfig;
use crate::dashboard::inputs::{DashboardInputs, Overlays, DEFAULT_CITY};
use crate::dashboard::memo::Memo;
use crate::dashboard::view::{y_axis_label, DashboardView, MapMarker, PlotView, RegionError};
use crate::error::DashboardError;
use crate::types::lat_lon::LatLon;
use crate::types::series::DailyTemperatureSeries;
use crate::types::unit_system::UnitSystem;
use crate::weather_data::fetcher::WeatherFetcher;
use crate::weather_data::open_meteo::{ArchiveTransport, OpenMeteoArchive};
use crate::weather_data::query::QueryParams;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::sync::Arc;

/// A fetched series as a dependency of downstream nodes. Two keys match when
/// the series are equal, so a refetch that returns the same data reuses them.
#[derive(Debug, Clone)]
struct SeriesKey(Arc<DailyTemperatureSeries>);

impl PartialEq for SeriesKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

/// How often each node has been (re)computed since the dashboard was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeComputations {
    pub coordinate: usize,
    pub raw_series: usize,
    pub derived: usize,
    pub table: usize,
}

pub struct Dashboard<T = OpenMeteoArchive> {
    catalog: CityCatalog,
    fetcher: WeatherFetcher<T>,
    inputs: DashboardInputs,
    coordinate: Memo<String, LatLon>,
    raw_series: Memo<QueryParams, Arc<DailyTemperatureSeries>>,
    derived: Memo<SeriesKey, Arc<DerivedSeries>>,
    table: Memo<(SeriesKey, (i32, i32)), Vec<ThresholdRow>>,
}

impl Dashboard<OpenMeteoArchive> {
    /// Loads the catalog and prepares the archive client and cache folder.
    ///
    /// # Errors
    ///
    /// A missing or malformed catalog is fatal, as is a cache folder that
    /// cannot be created.
    pub async fn open(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let catalog = config.load_catalog()?;
        let fetcher = config.open_fetcher().await?;
        info!(
            "Dashboard ready with {} cities from {}",
            catalog.len(),
            config.catalog_path.display()
        );
        Ok(Self::new(catalog, fetcher))
    }
}

impl<T: ArchiveTransport> Dashboard<T> {
    /// Starts on the default city, or on the first catalog entry when the
    /// default is not listed.
    pub fn new(catalog: CityCatalog, fetcher: WeatherFetcher<T>) -> Self {
        let city = if catalog.contains(DEFAULT_CITY) {
            DEFAULT_CITY.to_string()
        } else {
            catalog
                .labels()
                .next()
                .unwrap_or(DEFAULT_CITY)
                .to_string()
        };
        Self {
            catalog,
            fetcher,
            inputs: DashboardInputs::new(city),
            coordinate: Memo::new(),
            raw_series: Memo::new(),
            derived: Memo::new(),
            table: Memo::new(),
        }
    }

    pub fn inputs(&self) -> &DashboardInputs {
        &self.inputs
    }

    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    pub fn fetcher(&self) -> &WeatherFetcher<T> {
        &self.fetcher
    }

    /// Unknown labels are accepted here and reported by the next render.
    pub fn set_city(&mut self, city: impl Into<String>) {
        self.inputs.set_city(city);
    }

    /// # Errors
    ///
    /// [`DashboardError::InvalidInput`] for an inverted range or dates outside
    /// the picker bounds; the previous range is kept.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), DashboardError> {
        self.inputs.set_dates(start, end)
    }

    pub fn set_units(&mut self, units: UnitSystem) {
        if self.inputs.set_units(units) {
            info!("Units switched to {}, sliders reset", units);
        }
    }

    pub fn set_plot_threshold(&mut self, value: i32) {
        self.inputs.set_plot_threshold(value);
    }

    pub fn set_overlays(&mut self, overlays: Overlays) {
        self.inputs.set_overlays(overlays);
    }

    pub fn set_weekly(&mut self, enabled: bool) {
        let overlays = Overlays {
            weekly: enabled,
            ..self.inputs.overlays()
        };
        self.inputs.set_overlays(overlays);
    }

    pub fn set_monthly(&mut self, enabled: bool) {
        let overlays = Overlays {
            monthly: enabled,
            ..self.inputs.overlays()
        };
        self.inputs.set_overlays(overlays);
    }

    pub fn set_table_range(&mut self, low: i32, high: i32) {
        self.inputs.set_table_range(low, high);
    }

    pub fn node_computations(&self) -> NodeComputations {
        NodeComputations {
            coordinate: self.coordinate.computations(),
            raw_series: self.raw_series.computations(),
            derived: self.derived.computations(),
            table: self.table.computations(),
        }
    }

    /// Brings every node up to date with the current inputs and renders each
    /// region. A failed node blanks only the regions that depend on it.
    pub async fn render(&mut self) -> DashboardView {
        let series = match self.coordinate_node() {
            Ok(location) => {
                let dates = self.inputs.dates();
                let query =
                    QueryParams::new(location, dates.start(), dates.end(), self.inputs.units());
                self.raw_series_node(query).await
            }
            Err(e) => Err(e),
        };

        if let Err(e) = &series {
            warn!("Rendering without data for '{}': {}", self.inputs.city(), e);
        }

        // Map and text use the archive's resolved coordinate, not the catalog's
        let coordinate_text = series
            .as_ref()
            .map(|s| s.location().to_string())
            .map_err(Clone::clone);
        let map = series
            .as_ref()
            .map(|s| MapMarker::at(s.location()))
            .map_err(Clone::clone);
        let plot = series.clone().and_then(|s| self.plot_region(s));
        let table = series.and_then(|s| self.table_node(s));

        DashboardView {
            inputs: self.inputs.clone(),
            coordinate_text,
            map,
            plot,
            table,
        }
    }

    fn coordinate_node(&mut self) -> Result<LatLon, RegionError> {
        let catalog = &self.catalog;
        let city = self.inputs.city();
        self.coordinate
            .get_or_try_compute(city.to_string(), || {
                debug!("Looking up '{}' in the catalog", city);
                catalog.lookup(city).map(|entry| entry.location)
            })
            .copied()
            .map_err(|e| RegionError::from(&e))
    }

    async fn raw_series_node(
        &mut self,
        query: QueryParams,
    ) -> Result<Arc<DailyTemperatureSeries>, RegionError> {
        let fetcher = &self.fetcher;
        self.raw_series
            .get_or_try_compute_async(query, || async move {
                fetcher.fetch(&query).await.map(Arc::new)
            })
            .await
            .cloned()
            .map_err(|e| RegionError::from(&e))
    }

    fn derived_node(&mut self, series: &Arc<DailyTemperatureSeries>) -> Arc<DerivedSeries> {
        self.derived
            .get_or_compute(SeriesKey(Arc::clone(series)), || {
                debug!("Deriving rolling means over {} days", series.len());
                Arc::new(derive(series))
            })
            .clone()
    }

    fn table_node(
        &mut self,
        series: Arc<DailyTemperatureSeries>,
    ) -> Result<Vec<ThresholdRow>, RegionError> {
        let (low, high) = self.inputs.table_range().value();
        self.table
            .get_or_try_compute((SeriesKey(Arc::clone(&series)), (low, high)), || {
                debug!("Summarizing thresholds {}..={}", low, high);
                summarize(&series, low, high)
            })
            .cloned()
            .map_err(|e| RegionError::from(&e))
    }

    fn plot_region(&mut self, series: Arc<DailyTemperatureSeries>) -> Result<PlotView, RegionError> {
        if series.is_empty() {
            return Err(RegionError::NoData);
        }
        let derived = self.derived_node(&series);
        let threshold = self.inputs.plot_threshold().value();
        let overlays = self.inputs.overlays();
        let split = partition(&series, f64::from(threshold));

        Ok(PlotView {
            threshold,
            y_label: y_axis_label(series.units()),
            above: split.at_or_above,
            below: split.below,
            weekly: overlays.weekly.then(|| derived.weekly_line()),
            monthly: overlays.monthly.then(|| derived.monthly_line()),
        })
    }
}
