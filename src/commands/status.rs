//! Status command: read-only row counts for the imported tables.

use crate::config::resolve_db_path;
use crate::error::Result;
use crate::storage::LeagueDatabase;
use std::path::PathBuf;

pub struct StatusParams {
    pub db_path: Option<PathBuf>,
    pub json: bool,
}

pub fn handle_status(params: StatusParams) -> Result<()> {
    let db_path = resolve_db_path(params.db_path)?;
    let db = LeagueDatabase::open(&db_path)?;
    let counts = db.table_counts()?;

    if params.json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
    } else {
        println!("Database: {}", db_path.display());
        println!("  teams:        {}", counts.teams);
        println!("  players:      {}", counts.players);
        println!("  games:        {}", counts.games);
        println!("  game teams:   {}", counts.game_teams);
        println!("  plays:        {}", counts.plays);
        println!("  player stats: {}", counts.player_games);
    }

    Ok(())
}
