use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("elevations CSV not found: {0}")]
    NotFound(PathBuf),
    #[error("elevations CSV is empty")]
    EmptyData,
    #[error("elevations CSV header is missing the `{0}` column")]
    MissingColumn(&'static str),
    #[error("invalid elevations CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("graph not found: {0}")]
    NotFound(PathBuf),
    #[error("malformed graph document {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },
    #[error("failed to encode graph: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for a trailgraph run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Elevation(#[from] ElevationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
