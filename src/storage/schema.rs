//! Database connection and schema management

use crate::error::Result;
use rusqlite::Connection;
use std::path::Path;

/// Connection manager for the league store.
///
/// Foreign-key enforcement is switched on for every connection, so the
/// dependency preconditions between categories are enforced by SQLite
/// itself rather than assumed by the pipeline.
pub struct LeagueDatabase {
    pub(crate) conn: Connection,
}

impl LeagueDatabase {
    /// Open (or create) the database file and ensure tables exist
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::configure(Connection::open(db_path)?)
    }

    /// In-memory database for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS teams (
                team_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                abbreviation TEXT NOT NULL,
                conference TEXT,
                division TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS players (
                player_id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                position TEXT,
                team_id INTEGER REFERENCES teams(team_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                game_id INTEGER PRIMARY KEY,
                season INTEGER NOT NULL,
                scheduled_at TEXT NOT NULL,
                home_team_id INTEGER NOT NULL REFERENCES teams(team_id),
                away_team_id INTEGER NOT NULL REFERENCES teams(team_id),
                status TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS game_teams (
                game_id INTEGER NOT NULL REFERENCES games(game_id),
                team_id INTEGER NOT NULL REFERENCES teams(team_id),
                is_home INTEGER NOT NULL,
                points INTEGER,
                PRIMARY KEY (game_id, team_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS plays (
                game_id INTEGER NOT NULL REFERENCES games(game_id),
                play_sequence INTEGER NOT NULL,
                team_id INTEGER REFERENCES teams(team_id),
                period INTEGER NOT NULL,
                clock TEXT,
                description TEXT NOT NULL,
                home_score INTEGER,
                away_score INTEGER,
                PRIMARY KEY (game_id, play_sequence)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_games (
                game_id INTEGER NOT NULL REFERENCES games(game_id),
                player_id INTEGER NOT NULL REFERENCES players(player_id),
                minutes REAL,
                points INTEGER NOT NULL,
                rebounds INTEGER NOT NULL,
                assists INTEGER NOT NULL,
                steals INTEGER NOT NULL,
                blocks INTEGER NOT NULL,
                turnovers INTEGER NOT NULL,
                field_goals_made INTEGER NOT NULL,
                field_goals_attempted INTEGER NOT NULL,
                three_pointers_made INTEGER NOT NULL,
                three_pointers_attempted INTEGER NOT NULL,
                free_throws_made INTEGER NOT NULL,
                free_throws_attempted INTEGER NOT NULL,
                PRIMARY KEY (game_id, player_id)
            )",
            [],
        )?;

        // Read-path indexes for the downstream query layer
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_season ON games(season)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_plays_team ON plays(team_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_player_games_player
             ON player_games(player_id)",
            [],
        )?;

        Ok(())
    }
}
