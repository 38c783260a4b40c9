//! Ingestion configuration.
//!
//! Everything a run needs is resolved up front into an explicit
//! [`IngestConfig`] and passed into components at construction. Nothing in
//! the pipeline reads configuration ad hoc.

use crate::cli::types::Season;
use crate::error::{IngestError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Env var consulted when `--base-url` is not passed on the command line.
pub const BASE_URL_ENV_VAR: &str = "WNBA_INGEST_BASE_URL";

/// Upper bound on any single provider request.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Width of the per-game fetch fan-out for play-by-play and box scores.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 8;

/// Resolved settings for one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub base_url: String,
    pub season: Season,
    pub db_path: PathBuf,
    pub fetch_timeout: Duration,
    pub fetch_concurrency: usize,
}

impl IngestConfig {
    /// Resolve a config from CLI overrides, falling back to env vars and
    /// platform defaults.
    pub fn resolve(
        base_url: Option<String>,
        season: Season,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(url) => url,
            None => std::env::var(BASE_URL_ENV_VAR).map_err(|_| IngestError::MissingBaseUrl {
                env_var: BASE_URL_ENV_VAR.to_string(),
            })?,
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            season,
            db_path: resolve_db_path(db_path)?,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        })
    }
}

/// Default database location: `<platform data dir>/wnba-ingest/league.db`.
pub fn resolve_db_path(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    let data_dir = dirs::data_dir().ok_or(IngestError::DataDir)?;
    Ok(data_dir.join("wnba-ingest").join("league.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_url_wins_and_trailing_slash_is_trimmed() {
        let config = IngestConfig::resolve(
            Some("https://provider.test/v1/".to_string()),
            Season::new(2024),
            Some(PathBuf::from("/tmp/league.db")),
        )
        .unwrap();

        assert_eq!(config.base_url, "https://provider.test/v1");
        assert_eq!(config.season.as_u16(), 2024);
        assert_eq!(config.db_path, PathBuf::from("/tmp/league.db"));
    }

    // Set and unset cases share one test so parallel test threads never
    // race on the env var.
    #[test]
    fn test_base_url_env_fallback() {
        std::env::set_var(BASE_URL_ENV_VAR, "https://env.test/api");
        let config = IngestConfig::resolve(
            None,
            Season::default(),
            Some(PathBuf::from("/tmp/league.db")),
        )
        .unwrap();
        assert_eq!(config.base_url, "https://env.test/api");

        std::env::remove_var(BASE_URL_ENV_VAR);
        let result = IngestConfig::resolve(
            None,
            Season::default(),
            Some(PathBuf::from("/tmp/league.db")),
        );
        assert!(matches!(result, Err(IngestError::MissingBaseUrl { .. })));
    }

    #[test]
    fn test_db_path_override() {
        let path = resolve_db_path(Some(PathBuf::from("/somewhere/else.db"))).unwrap();
        assert_eq!(path, PathBuf::from("/somewhere/else.db"));
    }
}
