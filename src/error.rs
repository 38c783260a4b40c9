//! Error types for the WNBA ingestion CLI

use crate::provider::Category;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("fetch failed for {category}: {message}")]
    Fetch { category: Category, message: String },

    #[error("invalid {category} payload: {message}")]
    Payload { category: Category, message: String },

    #[error("{category} record {index}: {message}")]
    Parse {
        category: Category,
        index: usize,
        message: String,
    },

    #[error("persist failed for {category} record {identifier}: {source}")]
    Persist {
        category: Category,
        identifier: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("import cancelled before {stage} stage")]
    Cancelled { stage: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("provider base URL not provided and {env_var} environment variable not set")]
    MissingBaseUrl { env_var: String },

    #[error("could not determine a data directory for the league database")]
    DataDir,

    #[error("failed to parse season year: {0}")]
    InvalidSeason(#[from] std::num::ParseIntError),
}
