use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Invalid weather query: {0}")]
    InvalidQuery(String),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    // Transient: retried by the fetcher
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Archive answered {status} for {url}")]
    ServerError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Archive did not answer within {0:?}")]
    AttemptTimeout(Duration),

    // Final outcome once every retry is spent
    #[error("Weather archive unavailable after {attempts} attempts ({elapsed:?})")]
    UpstreamUnavailable {
        attempts: u32,
        elapsed: Duration,
        #[source]
        last_error: Box<WeatherDataError>,
    },

    #[error("Archive rejected the request with status {status}: {reason}")]
    UpstreamRejected {
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error(transparent)]
    UpstreamData(#[from] UpstreamDataError),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode cache data from '{0}'")]
    CacheDecode(PathBuf, #[source] Box<bincode::error::DecodeError>),

    #[error("Failed to encode cache data")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl WeatherDataError {
    /// Whether another attempt at the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WeatherDataError::NetworkRequest(..)
                | WeatherDataError::ServerError { .. }
                | WeatherDataError::AttemptTimeout(_)
        )
    }
}

/// The archive answered, but not with the data that was asked for.
#[derive(Debug, Error)]
pub enum UpstreamDataError {
    #[error("Archive response is not valid JSON for the expected schema")]
    Decode(#[source] serde_json::Error),

    #[error("Archive response is missing the '{0}' block")]
    MissingVariable(&'static str),

    #[error("Archive returned {found} values for '{variable}' but {expected} dates")]
    LengthMismatch {
        variable: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Archive returned {found} days, expected {expected}")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("Archive row {index} is dated {found}, expected {expected}")]
    DateMisaligned {
        index: usize,
        expected: NaiveDate,
        found: NaiveDate,
    },

    #[error("Archive has no minimum temperature for {0}")]
    MissingValue(NaiveDate),

    #[error("Archive resolved an invalid coordinate ({latitude}, {longitude})")]
    InvalidLocation { latitude: f64, longitude: f64 },
}
