//! WNBA Data Ingestion CLI Library
//!
//! A Rust library and CLI for loading professional basketball league data
//! from an external provider into a local SQLite store that downstream
//! analytics and prediction services query.
//!
//! ## Features
//!
//! - **Ordered ingestion**: Teams, schedule, play-by-play, and box scores
//!   load in dependency order, each category fetched, parsed, and persisted
//!   as one atomic batch
//! - **Idempotent reruns**: Records upsert by the provider's external
//!   identifier, so reimporting identical data never duplicates rows
//! - **Force mode**: Dependency-ordered reset clears the store for a full
//!   reimport, downgrading per-table failures to warnings
//! - **Fail-fast runs**: Any fetch, parse, or persist error aborts the run
//!   before later categories can load against missing rows
//! - **Run summaries**: Per-table row counts reported after every
//!   successful run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wnba_ingest::{commands::import::*, Season};
//!
//! # async fn example() -> wnba_ingest::Result<()> {
//! let params = ImportParams {
//!     force: false,
//!     season: Season::new(2025),
//!     base_url: Some("https://provider.example/v1".to_string()),
//!     db_path: None,
//!     verbose: false,
//! };
//!
//! handle_import(params).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Set the provider base URL to avoid passing it in every command:
//! ```bash
//! export WNBA_INGEST_BASE_URL=https://provider.example/v1
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod provider;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{GameId, PlayerId, Season, TeamId};
pub use config::{IngestConfig, BASE_URL_ENV_VAR};
pub use error::{IngestError, Result};
pub use provider::Category;
