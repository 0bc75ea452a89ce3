use crate::types::record_kind::RecordKind;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PowerApiError {
    #[error("Network request failed for {kind} query {url}")]
    NetworkRequest {
        kind: RecordKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{kind} query timed out: {url}")]
    Timeout {
        kind: RecordKind,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Cannot download {kind} dataset, status code {status}: {url}")]
    HttpStatus {
        kind: RecordKind,
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timeout must be positive (got {0:?})")]
    InvalidTimeout(std::time::Duration),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Response download failed")]
    DownloadIo(#[from] std::io::Error),

    #[error("Failed to parse {kind} response from {url}")]
    JsonParse {
        kind: RecordKind,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} response does not contain parameter '{parameter}'")]
    MissingParameter { kind: RecordKind, parameter: String },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cached response '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cached response '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
