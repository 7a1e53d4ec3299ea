//! Error types for the capture pipeline.
//!
//! Each stage has its own error type so the scheduler can tell a network
//! failure from an extraction or filesystem failure when it reports a genre.
//! Optional fields that are missing are not errors; they become sentinels.

use crate::models::Field;
use std::path::PathBuf;

/// A ranking page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("failed reading body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A listing entry is missing a field that is configured as required.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} element not found for item {index}")]
pub struct ExtractionError {
    /// Zero-based position of the entry on the page.
    pub index: usize,
    pub field: Field,
}

/// Writing a run file failed.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl WriteError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Settings could not be loaded or are inconsistent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed reading config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field} selector {selector:?}: {message}")]
    Selector {
        field: &'static str,
        selector: String,
        message: String,
    },

    #[error("no selector candidates configured for {0}")]
    EmptyCandidates(&'static str),

    #[error("unknown genre code {0:?}")]
    UnknownGenre(String),

    #[error("invalid genre code {0:?}: must be a non-empty file name without '/', '\\' or '..'")]
    InvalidGenreCode(String),

    #[error("genre code {0:?} is configured more than once")]
    DuplicateGenre(String),

    #[error("invalid pause of {0} seconds")]
    InvalidPause(f64),

    #[error("no genres configured")]
    NoGenres,

    #[error("failed building HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Why a single genre could not be captured.
#[derive(Debug, thiserror::Error)]
pub enum GenreError {
    #[error("network error: {0}")]
    Network(#[from] FetchError),

    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("filesystem error: {0}")]
    Filesystem(#[from] WriteError),
}
