//! Keeps every validated series ever fetched, in memory and optionally on disk.
//!
//! Entries are keyed by the full request (coordinate, dates, units) and never
//! expire: archive days in the past do not change. Failures are never stored.

use crate::types::series::DailyTemperatureSeries;
use crate::weather_data::error::WeatherDataError;
use crate::weather_data::query::QueryParams;
use bincode::config::{Configuration, Fixint, LittleEndian};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

const CACHE_FILE_EXTENSION: &str = "bin";
const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

pub struct SeriesCache {
    folder: Option<PathBuf>,
    memory: Mutex<HashMap<String, DailyTemperatureSeries>>,
}

impl SeriesCache {
    /// A cache that persists entries as files in `folder`.
    ///
    /// The folder is expected to exist; see [`crate::DashboardConfig::open_fetcher`].
    pub fn on_disk(folder: &Path) -> Self {
        Self {
            folder: Some(folder.to_path_buf()),
            memory: Mutex::new(HashMap::new()),
        }
    }

    /// A cache that only lives as long as this value.
    pub fn in_memory() -> Self {
        Self {
            folder: None,
            memory: Mutex::new(HashMap::new()),
        }
    }

    fn file_for(&self, query: &QueryParams) -> Option<PathBuf> {
        self.folder.as_ref().map(|folder| {
            folder.join(format!("{}.{}", query.cache_key(), CACHE_FILE_EXTENSION))
        })
    }

    /// Looks the query up in memory, then on disk.
    ///
    /// Disk problems are logged and reported as a miss.
    pub async fn get(&self, query: &QueryParams) -> Option<DailyTemperatureSeries> {
        let key = query.cache_key();
        {
            let memory = self.memory.lock().await;
            if let Some(series) = memory.get(&key) {
                debug!("Memory cache hit for {}", key);
                return Some(series.clone());
            }
        }

        let path = self.file_for(query)?;
        match Self::read_file(&path).await {
            Ok(Some(series)) => {
                info!("Disk cache hit for {} at {}", key, path.display());
                self.memory.lock().await.insert(key, series.clone());
                Some(series)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Stores a validated series. Disk problems are logged, never returned.
    pub async fn put(&self, query: &QueryParams, series: &DailyTemperatureSeries) {
        let key = query.cache_key();
        self.memory.lock().await.insert(key.clone(), series.clone());

        let Some(path) = self.file_for(query) else {
            return;
        };
        match Self::write_file(series.clone(), path.clone()).await {
            Ok(()) => debug!("Cached {} to {}", key, path.display()),
            Err(e) => warn!("Failed to persist cache entry {}: {}", path.display(), e),
        }
    }

    /// Number of entries currently held in memory.
    pub async fn len(&self) -> usize {
        self.memory.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.memory.lock().await.is_empty()
    }

    async fn read_file(path: &Path) -> Result<Option<DailyTemperatureSeries>, WeatherDataError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(WeatherDataError::CacheRead(path.to_path_buf(), e)),
        };
        let (series, _) =
            bincode::serde::decode_from_slice::<DailyTemperatureSeries, _>(&bytes, BINCODE_CONFIG)
                .map_err(|e| WeatherDataError::CacheDecode(path.to_path_buf(), Box::new(e)))?;
        Ok(Some(series))
    }

    /// Writes through a temporary file in the same folder so readers never see half an entry.
    async fn write_file(series: DailyTemperatureSeries, path: PathBuf) -> Result<(), WeatherDataError> {
        tokio::task::spawn_blocking(move || {
            let bytes = bincode::serde::encode_to_vec(&series, BINCODE_CONFIG)
                .map_err(|e| WeatherDataError::CacheEncode(Box::new(e)))?;
            let folder = path.parent().unwrap_or_else(|| Path::new("."));
            let mut temp_file = NamedTempFile::new_in(folder)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e))?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e))?;
            temp_file
                .persist(&path)
                .map_err(|e| WeatherDataError::CacheWrite(path.clone(), e.error))?;
            Ok::<(), WeatherDataError>(())
        })
        .await??;
        Ok(())
    }
}
