use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("City catalog file '{0}' does not exist")]
    MissingFile(PathBuf),

    #[error("Failed to read city catalog '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Required column '{column}' not found in '{path}'")]
    MissingColumn {
        path: PathBuf,
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Row {row} of '{path}' has a missing or non-numeric {column}")]
    NullValue {
        path: PathBuf,
        row: usize,
        column: &'static str,
    },

    #[error("Row {row} of '{path}' has an invalid coordinate ({latitude}, {longitude}) for '{label}'")]
    InvalidCoordinate {
        path: PathBuf,
        row: usize,
        label: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("City label '{label}' appears more than once in '{path}'")]
    DuplicateLabel { path: PathBuf, label: String },

    #[error("City catalog '{0}' contains no cities")]
    Empty(PathBuf),

    #[error("City '{0}' is not in the catalog")]
    NotFound(String),

    #[error("Failed to write city catalog '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed processing city table: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

impl CatalogError {
    /// True for every failure that means the catalog file itself is unusable.
    pub fn is_data_load(&self) -> bool {
        !matches!(self, CatalogError::NotFound(_))
    }
}
