//! Import command: run the full ingestion pipeline.

use crate::cli::types::Season;
use crate::config::IngestConfig;
use crate::error::Result;
use crate::pipeline::{CancelFlag, Pipeline, RunSummary};
use crate::provider::HttpProvider;
use crate::storage::LeagueDatabase;
use std::path::PathBuf;

pub struct ImportParams {
    pub force: bool,
    pub season: Season,
    pub base_url: Option<String>,
    pub db_path: Option<PathBuf>,
    pub verbose: bool,
}

/// Run the pipeline end to end and print the operator summary.
pub async fn handle_import(params: ImportParams) -> Result<()> {
    let config = IngestConfig::resolve(params.base_url, params.season, params.db_path)?;

    println!("Starting WNBA data import (season {})...", config.season);
    if params.verbose {
        println!("Provider: {}", config.base_url);
        println!("Database: {}", config.db_path.display());
    }

    let mut db = LeagueDatabase::open(&config.db_path)?;
    let provider = HttpProvider::new(&config)?;

    // Ctrl-C requests a stop at the next stage boundary.
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Cancellation requested, stopping at the next stage boundary...");
                cancel.cancel();
            }
        });
    }

    let mut pipeline = Pipeline::new(&provider, &mut db, config.season)
        .with_cancel_flag(cancel)
        .with_verbose(params.verbose);
    let summary = pipeline.run(params.force).await?;

    print_summary(&summary);
    println!("WNBA data import completed successfully.");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let counts = &summary.counts;
    println!("Import summary:");
    println!("  teams:        {}", counts.teams);
    println!("  players:      {}", counts.players);
    println!("  games:        {}", counts.games);
    println!("  game teams:   {}", counts.game_teams);
    println!("  plays:        {}", counts.plays);
    println!("  player stats: {}", counts.player_games);
    if !summary.reset_warnings.is_empty() {
        println!(
            "  reset warnings: {} (see lines above)",
            summary.reset_warnings.len()
        );
    }
}
