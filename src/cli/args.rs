//! CLI argument definitions and parsing structures.

use super::types::time::Season;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "wnba-ingest", about = "WNBA league data ingestion CLI")]
pub struct WnbaIngest {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch teams, schedule, play-by-play, and box scores from the data
    /// provider and load them into the local database.
    ///
    /// Categories run in dependency order; any fetch, parse, or persist
    /// failure aborts the run with a non-zero exit code.
    Import {
        /// Clear all existing league data before importing (full reimport).
        #[clap(long)]
        force: bool,

        /// Season year (e.g. 2025).
        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Data provider base URL (or set `WNBA_INGEST_BASE_URL` env var).
        #[clap(long)]
        base_url: Option<String>,

        /// Database file path (defaults under the platform data directory).
        #[clap(long)]
        db_path: Option<PathBuf>,

        /// Show detailed progress information.
        #[clap(long)]
        verbose: bool,
    },

    /// Show row counts for the six imported tables.
    Status {
        /// Database file path (defaults under the platform data directory).
        #[clap(long)]
        db_path: Option<PathBuf>,

        /// Output counts as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}
