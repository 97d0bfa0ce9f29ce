//! The read-only city lookup table the dashboard's city selector is built from.

use crate::catalog::error::CatalogError;
use crate::types::lat_lon::LatLon;
use log::{debug, info};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub(crate) const LABEL_COLUMN: &str = "label";
pub(crate) const LATITUDE_COLUMN: &str = "latitude";
pub(crate) const LONGITUDE_COLUMN: &str = "longitude";

/// A city the dashboard can be pointed at.
#[derive(Debug, Clone, PartialEq)]
pub struct CityEntry {
    /// Display label, `"City, State"`. Unique within a catalog.
    pub label: String,
    pub location: LatLon,
}

/// All selectable cities, in file order, with a label index.
///
/// Built once at startup with [`CityCatalog::load`] and never mutated.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    entries: Vec<CityEntry>,
    index: HashMap<String, usize>,
}

impl CityCatalog {
    /// Loads a catalog CSV with header `label,latitude,longitude`.
    ///
    /// # Errors
    ///
    /// Any [`CatalogError`] other than `NotFound`: the file is missing or unreadable,
    /// a column is absent, a value is null or non-numeric, a coordinate is out of
    /// range, a label repeats, or the table is empty.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CatalogError::MissingFile(path.to_path_buf()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| CatalogError::CsvRead(path.to_path_buf(), e))?
            .finish()
            .map_err(|e| CatalogError::CsvRead(path.to_path_buf(), e))?;
        debug!("Read {} catalog rows from {}", df.height(), path.display());

        let catalog = Self::from_frame(&df, path)?;
        info!(
            "Loaded {} cities from {}",
            catalog.entries.len(),
            path.display()
        );
        Ok(catalog)
    }

    fn from_frame(df: &DataFrame, path: &Path) -> Result<Self, CatalogError> {
        let missing_column = |column: &str| {
            let path = path.to_path_buf();
            let column = column.to_string();
            move |source: PolarsError| CatalogError::MissingColumn {
                path,
                column,
                source,
            }
        };

        let labels = df
            .column(LABEL_COLUMN)
            .and_then(|c| c.cast(&DataType::String))
            .map_err(missing_column(LABEL_COLUMN))?;
        let latitudes = df
            .column(LATITUDE_COLUMN)
            .and_then(|c| c.cast(&DataType::Float64))
            .map_err(missing_column(LATITUDE_COLUMN))?;
        let longitudes = df
            .column(LONGITUDE_COLUMN)
            .and_then(|c| c.cast(&DataType::Float64))
            .map_err(missing_column(LONGITUDE_COLUMN))?;

        let rows = labels
            .str()?
            .into_iter()
            .zip(latitudes.f64()?)
            .zip(longitudes.f64()?)
            .enumerate();

        let mut entries = Vec::with_capacity(df.height());
        let mut index = HashMap::with_capacity(df.height());
        for (row, ((label, latitude), longitude)) in rows {
            let null = |column| CatalogError::NullValue {
                path: path.to_path_buf(),
                row,
                column,
            };
            let label = label.ok_or_else(|| null(LABEL_COLUMN))?;
            let latitude = latitude.ok_or_else(|| null(LATITUDE_COLUMN))?;
            let longitude = longitude.ok_or_else(|| null(LONGITUDE_COLUMN))?;

            let location = LatLon(latitude, longitude);
            if !location.is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    path: path.to_path_buf(),
                    row,
                    label: label.to_string(),
                    latitude,
                    longitude,
                });
            }
            if index.insert(label.to_string(), entries.len()).is_some() {
                return Err(CatalogError::DuplicateLabel {
                    path: path.to_path_buf(),
                    label: label.to_string(),
                });
            }
            entries.push(CityEntry {
                label: label.to_string(),
                location,
            });
        }

        if entries.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }
        Ok(Self { entries, index })
    }

    /// Finds the entry for a `"City, State"` label.
    pub fn lookup(&self, label: &str) -> Result<&CityEntry, CatalogError> {
        self.index
            .get(label)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| CatalogError::NotFound(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Labels in file order, for populating a selector.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn entries(&self) -> &[CityEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CityEntry> for CityCatalog {
    /// Builds an in-memory catalog. Later duplicates of a label are ignored.
    fn from_iter<T: IntoIterator<Item = CityEntry>>(iter: T) -> Self {
        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for entry in iter {
            if index.contains_key(&entry.label) {
                continue;
            }
            index.insert(entry.label.clone(), entries.len());
            entries.push(entry);
        }
        Self { entries, index }
    }
}

/// Where the catalog lives when no path is configured.
pub fn default_catalog_path() -> PathBuf {
    PathBuf::from("data").join("cities.csv")
}
