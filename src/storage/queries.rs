//! Persistence operations and count queries.
//!
//! Each category persists inside one transaction: either the whole batch
//! commits or none of it does, so a mid-batch failure never leaves a
//! category half-loaded. Parent tables (teams, players, games) upsert with
//! `ON CONFLICT DO UPDATE` rather than `INSERT OR REPLACE`, which on a
//! parent row is a delete+insert and would trip child foreign keys on a
//! rerun. Child tables upsert by replacement on their composite keys.

use super::models::*;
use super::schema::LeagueDatabase;
use crate::cli::types::{GameId, PlayerId, TeamId};
use crate::error::{IngestError, Result};
use crate::provider::Category;
use chrono::{DateTime, Utc};
use rusqlite::params;
use std::fmt;

fn persist_error(
    category: Category,
    identifier: impl fmt::Display,
    source: rusqlite::Error,
) -> IngestError {
    IngestError::Persist {
        category,
        identifier: identifier.to_string(),
        source,
    }
}

impl LeagueDatabase {
    /// Upsert all team rows as one atomic batch
    pub fn persist_teams(&mut self, teams: &[Team]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for team in teams {
            tx.execute(
                "INSERT INTO teams (team_id, name, abbreviation, conference, division)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(team_id) DO UPDATE SET
                     name = excluded.name,
                     abbreviation = excluded.abbreviation,
                     conference = excluded.conference,
                     division = excluded.division",
                params![
                    team.team_id.as_u32(),
                    team.name,
                    team.abbreviation,
                    team.conference,
                    team.division
                ],
            )
            .map_err(|e| persist_error(Category::Teams, team.team_id, e))?;
        }
        tx.commit()?;
        Ok(teams.len())
    }

    /// Upsert all games and their per-team context rows as one atomic batch.
    ///
    /// Team references must already exist; a dangling reference fails the
    /// whole batch with the offending game id.
    pub fn persist_schedule(&mut self, games: &[Game], game_teams: &[GameTeam]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for game in games {
            tx.execute(
                "INSERT INTO games
                     (game_id, season, scheduled_at, home_team_id, away_team_id, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(game_id) DO UPDATE SET
                     season = excluded.season,
                     scheduled_at = excluded.scheduled_at,
                     home_team_id = excluded.home_team_id,
                     away_team_id = excluded.away_team_id,
                     status = excluded.status",
                params![
                    game.game_id.as_u64(),
                    game.season.as_u16(),
                    game.scheduled_at.to_rfc3339(),
                    game.home_team_id.as_u32(),
                    game.away_team_id.as_u32(),
                    game.status.as_str()
                ],
            )
            .map_err(|e| persist_error(Category::Schedule, game.game_id, e))?;
        }
        for game_team in game_teams {
            tx.execute(
                "INSERT OR REPLACE INTO game_teams (game_id, team_id, is_home, points)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    game_team.game_id.as_u64(),
                    game_team.team_id.as_u32(),
                    game_team.is_home,
                    game_team.points
                ],
            )
            .map_err(|e| {
                persist_error(
                    Category::Schedule,
                    format!("{}:{}", game_team.game_id, game_team.team_id),
                    e,
                )
            })?;
        }
        tx.commit()?;
        Ok(games.len())
    }

    /// Upsert all play rows as one atomic batch
    pub fn persist_plays(&mut self, plays: &[Play]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for play in plays {
            tx.execute(
                "INSERT OR REPLACE INTO plays
                     (game_id, play_sequence, team_id, period, clock, description,
                      home_score, away_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    play.game_id.as_u64(),
                    play.sequence,
                    play.team_id.map(|t| t.as_u32()),
                    play.period,
                    play.clock,
                    play.description,
                    play.home_score,
                    play.away_score
                ],
            )
            .map_err(|e| {
                persist_error(
                    Category::PlayByPlay,
                    format!("{}#{}", play.game_id, play.sequence),
                    e,
                )
            })?;
        }
        tx.commit()?;
        Ok(plays.len())
    }

    /// Upsert player rows and their stat lines as one atomic batch.
    ///
    /// Players go in first so the stat lines' references resolve within the
    /// same transaction.
    pub fn persist_box_scores(
        &mut self,
        players: &[Player],
        stats: &[PlayerGameStat],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for player in players {
            tx.execute(
                "INSERT INTO players (player_id, name, position, team_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(player_id) DO UPDATE SET
                     name = excluded.name,
                     position = excluded.position,
                     team_id = excluded.team_id",
                params![
                    player.player_id.as_u32(),
                    player.name,
                    player.position,
                    player.team_id.map(|t| t.as_u32())
                ],
            )
            .map_err(|e| persist_error(Category::BoxScore, player.player_id, e))?;
        }
        for stat in stats {
            tx.execute(
                "INSERT OR REPLACE INTO player_games
                     (game_id, player_id, minutes, points, rebounds, assists, steals,
                      blocks, turnovers, field_goals_made, field_goals_attempted,
                      three_pointers_made, three_pointers_attempted,
                      free_throws_made, free_throws_attempted)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    stat.game_id.as_u64(),
                    stat.player_id.as_u32(),
                    stat.minutes,
                    stat.points,
                    stat.rebounds,
                    stat.assists,
                    stat.steals,
                    stat.blocks,
                    stat.turnovers,
                    stat.field_goals_made,
                    stat.field_goals_attempted,
                    stat.three_pointers_made,
                    stat.three_pointers_attempted,
                    stat.free_throws_made,
                    stat.free_throws_attempted
                ],
            )
            .map_err(|e| {
                persist_error(
                    Category::BoxScore,
                    format!("{}:{}", stat.game_id, stat.player_id),
                    e,
                )
            })?;
        }
        tx.commit()?;
        Ok(stats.len())
    }

    /// Row counts for all six tables
    pub fn table_counts(&self) -> Result<TableCounts> {
        Ok(TableCounts {
            teams: self.count("teams")?,
            players: self.count("players")?,
            games: self.count("games")?,
            game_teams: self.count("game_teams")?,
            plays: self.count("plays")?,
            player_games: self.count("player_games")?,
        })
    }

    pub(crate) fn count(&self, table: &str) -> Result<u64> {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .map_err(Into::into)
    }

    /// Get a team by external id
    pub fn get_team(&self, team_id: TeamId) -> Result<Option<Team>> {
        let result = self.conn.query_row(
            "SELECT team_id, name, abbreviation, conference, division
             FROM teams WHERE team_id = ?1",
            params![team_id.as_u32()],
            |row| {
                Ok(Team {
                    team_id: TeamId::new(row.get(0)?),
                    name: row.get(1)?,
                    abbreviation: row.get(2)?,
                    conference: row.get(3)?,
                    division: row.get(4)?,
                })
            },
        );
        match result {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a player by external id
    pub fn get_player(&self, player_id: PlayerId) -> Result<Option<Player>> {
        let result = self.conn.query_row(
            "SELECT player_id, name, position, team_id FROM players WHERE player_id = ?1",
            params![player_id.as_u32()],
            |row| {
                Ok(Player {
                    player_id: PlayerId::new(row.get(0)?),
                    name: row.get(1)?,
                    position: row.get(2)?,
                    team_id: row.get::<_, Option<u32>>(3)?.map(TeamId::new),
                })
            },
        );
        match result {
            Ok(player) => Ok(Some(player)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a game by external id
    pub fn get_game(&self, game_id: GameId) -> Result<Option<Game>> {
        let result = self.conn.query_row(
            "SELECT game_id, season, scheduled_at, home_team_id, away_team_id, status
             FROM games WHERE game_id = ?1",
            params![game_id.as_u64()],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u16>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, String>(5)?,
                ))
            },
        );
        let (id, season, scheduled_at, home, away, status) = match result {
            Ok(fields) => fields,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let scheduled_at = DateTime::parse_from_rfc3339(&scheduled_at)
            .map(|t| t.with_timezone(&Utc))
            .map_err(|e| IngestError::Payload {
                category: Category::Schedule,
                message: format!("stored tipoff `{scheduled_at}` is not RFC 3339: {e}"),
            })?;
        let status = GameStatus::parse(&status).ok_or_else(|| IngestError::Payload {
            category: Category::Schedule,
            message: format!("stored game status `{status}` is unrecognized"),
        })?;

        Ok(Some(Game {
            game_id: GameId::new(id),
            season: crate::cli::types::Season::new(season),
            scheduled_at,
            home_team_id: TeamId::new(home),
            away_team_id: TeamId::new(away),
            status,
        }))
    }

    /// All plays for a game in sequence order (in-game chronology)
    pub fn plays_for_game(&self, game_id: GameId) -> Result<Vec<Play>> {
        let mut stmt = self.conn.prepare(
            "SELECT game_id, play_sequence, team_id, period, clock, description,
                    home_score, away_score
             FROM plays WHERE game_id = ?1
             ORDER BY play_sequence",
        )?;

        let rows = stmt.query_map(params![game_id.as_u64()], |row| {
            Ok(Play {
                game_id: GameId::new(row.get(0)?),
                sequence: row.get(1)?,
                team_id: row.get::<_, Option<u32>>(2)?.map(TeamId::new),
                period: row.get(3)?,
                clock: row.get(4)?,
                description: row.get(5)?,
                home_score: row.get(6)?,
                away_score: row.get(7)?,
            })
        })?;

        let mut plays = Vec::new();
        for row in rows {
            plays.push(row?);
        }
        Ok(plays)
    }
}
