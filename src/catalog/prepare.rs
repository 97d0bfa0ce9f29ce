//! Turns a raw US city table into the catalog the dashboard loads.
//!
//! The raw table needs at least `city`, `state_name`, `lat`, `lng` and
//! `population` columns (the SimpleMaps `uscities.csv` layout).

use crate::catalog::city_catalog::{LABEL_COLUMN, LATITUDE_COLUMN, LONGITUDE_COLUMN};
use crate::catalog::error::CatalogError;
use log::{info, warn};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

/// Cities smaller than this are left out of the default catalog.
pub const DEFAULT_MIN_POPULATION: u64 = 10_000;

/// Filters `raw_path` down to cities with at least `min_population` residents,
/// derives the `"City, State"` label and writes `label,latitude,longitude` to `out_path`.
///
/// Rows with a null city, state or coordinate are skipped. When two rows produce
/// the same label the first one wins.
///
/// Returns the number of cities written.
pub fn prepare_catalog(
    raw_path: &Path,
    out_path: &Path,
    min_population: u64,
) -> Result<usize, CatalogError> {
    if !raw_path.is_file() {
        return Err(CatalogError::MissingFile(raw_path.to_path_buf()));
    }

    let df = LazyCsvReader::new(raw_path)
        .with_has_header(true)
        .finish()
        .map_err(|e| CatalogError::CsvRead(raw_path.to_path_buf(), e))?
        .filter(
            col("population")
                .cast(DataType::Float64)
                .gt_eq(lit(min_population as f64)),
        )
        .select([
            concat_str([col("city"), col("state_name")], ", ", false).alias(LABEL_COLUMN),
            col("lat").cast(DataType::Float64).alias(LATITUDE_COLUMN),
            col("lng").cast(DataType::Float64).alias(LONGITUDE_COLUMN),
        ])
        .filter(
            col(LABEL_COLUMN)
                .is_not_null()
                .and(col(LATITUDE_COLUMN).is_not_null())
                .and(col(LONGITUDE_COLUMN).is_not_null()),
        )
        .collect()
        .map_err(|e| CatalogError::CsvRead(raw_path.to_path_buf(), e))?;

    let mut seen = HashSet::with_capacity(df.height());
    let mut duplicates = 0usize;
    let first_occurrence: BooleanChunked = df
        .column(LABEL_COLUMN)?
        .str()?
        .into_iter()
        .map(|label| {
            let first = label.is_some_and(|l| seen.insert(l.to_string()));
            if !first {
                duplicates += 1;
            }
            Some(first)
        })
        .collect();
    if duplicates > 0 {
        warn!(
            "Dropped {} rows with a repeated city label from {}",
            duplicates,
            raw_path.display()
        );
    }
    let mut df = df.filter(&first_occurrence)?;

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| CatalogError::Io(parent.to_path_buf(), e))?;
    }
    let mut file = std::fs::File::create(out_path)
        .map_err(|e| CatalogError::Io(out_path.to_path_buf(), e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| CatalogError::CsvWrite(out_path.to_path_buf(), e))?;

    info!(
        "Wrote {} cities with population >= {} to {}",
        df.height(),
        min_population,
        out_path.display()
    );
    Ok(df.height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::city_catalog::CityCatalog;
    use crate::types::lat_lon::LatLon;
    use tempfile::tempdir;

    const RAW: &str = "\
city,city_ascii,state_id,state_name,lat,lng,population
Urbana,Urbana,IL,Illinois,40.1106,-88.2073,38336
Tiny Town,Tiny Town,IL,Illinois,40.0,-88.0,812
Chicago,Chicago,IL,Illinois,41.8375,-87.6866,2721308
Portland,Portland,OR,Oregon,45.5371,-122.65,641162
Portland,Portland,OR,Oregon,45.6,-122.7,10000
Portland,Portland,ME,Maine,43.6773,-70.2715,68313
";

    #[test]
    fn test_prepare_filters_and_labels() -> Result<(), CatalogError> {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("uscities.csv");
        let out = dir.path().join("data").join("cities.csv");
        std::fs::write(&raw, RAW).unwrap();

        let written = prepare_catalog(&raw, &out, DEFAULT_MIN_POPULATION)?;
        assert_eq!(written, 4);

        let catalog = CityCatalog::load(&out)?;
        assert_eq!(
            catalog.labels().collect::<Vec<_>>(),
            [
                "Urbana, Illinois",
                "Chicago, Illinois",
                "Portland, Oregon",
                "Portland, Maine"
            ]
        );
        assert!(!catalog.contains("Tiny Town, Illinois"));
        // First row wins for a repeated label
        assert_eq!(
            catalog.lookup("Portland, Oregon")?.location,
            LatLon(45.5371, -122.65)
        );
        Ok(())
    }

    #[test]
    fn test_population_threshold_is_inclusive() -> Result<(), CatalogError> {
        let dir = tempdir().unwrap();
        let raw = dir.path().join("uscities.csv");
        let out = dir.path().join("cities.csv");
        std::fs::write(&raw, RAW).unwrap();

        let written = prepare_catalog(&raw, &out, 641_162)?;
        assert_eq!(written, 2); // Chicago and the first Portland, Oregon
        Ok(())
    }

    #[test]
    fn test_missing_raw_file() {
        let dir = tempdir().unwrap();
        let err = prepare_catalog(
            &dir.path().join("nope.csv"),
            &dir.path().join("out.csv"),
            DEFAULT_MIN_POPULATION,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::MissingFile(_)));
    }
}
