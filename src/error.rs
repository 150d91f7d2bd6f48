//! Error types for the fetch and persistence stages.
//!
//! HTML extraction has no error type: a page missing the expected elements
//! simply yields empty or absent fields.

use reqwest::StatusCode;
use reqwest::header::InvalidHeaderValue;
use thiserror::Error;

/// Failure to retrieve a page over HTTP.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("user agent is not a valid header value: {0}")]
    UserAgent(#[source] InvalidHeaderValue),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Failure to talk to the SQLite store.
///
/// A uniqueness collision on `url_hash` is not represented here; it is the
/// expected outcome of a duplicate insert.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open database {path}: {source}")]
    Connect {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("database query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}
