//! Structural validation of raw provider payloads.
//!
//! Each parse function converts one category's payload into typed records.
//! Malformed records are never dropped silently; any violation fails the
//! whole parse with the offending record's index so the operator can find
//! it in the payload.

use super::types::{RawBoxScorePage, RawGame, RawPlay, RawPlayPage, RawPlayerLine, RawTeam};
use super::Category;
use crate::cli::types::{GameId, PlayerId, Season, TeamId};
use crate::error::{IngestError, Result};
use crate::storage::models::{Game, GameStatus, GameTeam, Play, Player, PlayerGameStat, Team};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

fn payload_array(category: Category, payload: &Value) -> Result<&Vec<Value>> {
    payload
        .as_array()
        .ok_or_else(|| IngestError::Payload {
            category,
            message: "expected a JSON array of records".to_string(),
        })
}

fn record<T: DeserializeOwned>(category: Category, index: usize, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| IngestError::Parse {
        category,
        index,
        message: e.to_string(),
    })
}

fn parse_err(category: Category, index: usize, message: impl Into<String>) -> IngestError {
    IngestError::Parse {
        category,
        index,
        message: message.into(),
    }
}

fn parse_tipoff(index: usize, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            parse_err(
                Category::Schedule,
                index,
                format!("tipoff `{raw}` is not RFC 3339: {e}"),
            )
        })
}

/// Parse the teams payload into team records.
pub fn parse_teams(payload: &Value) -> Result<Vec<Team>> {
    let rows = payload_array(Category::Teams, payload)?;
    let mut teams = Vec::with_capacity(rows.len());

    for (index, value) in rows.iter().enumerate() {
        let raw: RawTeam = record(Category::Teams, index, value)?;
        if raw.team_id == 0 {
            return Err(parse_err(Category::Teams, index, "teamId must be nonzero"));
        }
        if raw.name.trim().is_empty() {
            return Err(parse_err(Category::Teams, index, "name must not be empty"));
        }
        teams.push(Team {
            team_id: TeamId::new(raw.team_id),
            name: raw.name,
            abbreviation: raw.abbreviation,
            conference: raw.conference,
            division: raw.division,
        });
    }

    Ok(teams)
}

/// Parse the schedule payload into game rows plus the per-team game context.
///
/// Every game yields exactly two game-team rows (home and away).
pub fn parse_schedule(payload: &Value, season: Season) -> Result<(Vec<Game>, Vec<GameTeam>)> {
    let rows = payload_array(Category::Schedule, payload)?;
    let mut games = Vec::with_capacity(rows.len());
    let mut game_teams = Vec::with_capacity(rows.len() * 2);

    for (index, value) in rows.iter().enumerate() {
        let raw: RawGame = record(Category::Schedule, index, value)?;
        if raw.game_id == 0 {
            return Err(parse_err(Category::Schedule, index, "gameId must be nonzero"));
        }
        if raw.home_team_id == 0 || raw.away_team_id == 0 {
            return Err(parse_err(
                Category::Schedule,
                index,
                "team references must be nonzero",
            ));
        }
        if raw.home_team_id == raw.away_team_id {
            return Err(parse_err(
                Category::Schedule,
                index,
                format!("home and away team are both {}", raw.home_team_id),
            ));
        }
        let status = GameStatus::parse(&raw.status).ok_or_else(|| {
            parse_err(
                Category::Schedule,
                index,
                format!("unrecognized game status `{}`", raw.status),
            )
        })?;

        let game_id = GameId::new(raw.game_id);
        games.push(Game {
            game_id,
            season,
            scheduled_at: parse_tipoff(index, &raw.tipoff)?,
            home_team_id: TeamId::new(raw.home_team_id),
            away_team_id: TeamId::new(raw.away_team_id),
            status,
        });
        game_teams.push(GameTeam {
            game_id,
            team_id: TeamId::new(raw.home_team_id),
            is_home: true,
            points: raw.home_score,
        });
        game_teams.push(GameTeam {
            game_id,
            team_id: TeamId::new(raw.away_team_id),
            is_home: false,
            points: raw.away_score,
        });
    }

    Ok((games, game_teams))
}

/// Parse the play-by-play payload (one page per game) into play records.
///
/// Pages parse in parallel; indexed collection keeps both the page order and
/// each game's provider sequence order intact, which downstream readers rely
/// on to reconstruct in-game chronology.
pub fn parse_play_by_play(payload: &Value) -> Result<Vec<Play>> {
    let pages = payload_array(Category::PlayByPlay, payload)?;

    let per_game: Vec<Vec<Play>> = pages
        .par_iter()
        .enumerate()
        .map(|(page_index, page)| parse_game_plays(page_index, page))
        .collect::<Result<Vec<_>>>()?;

    Ok(per_game.into_iter().flatten().collect())
}

fn parse_game_plays(page_index: usize, page: &Value) -> Result<Vec<Play>> {
    let raw_page: RawPlayPage = record(Category::PlayByPlay, page_index, page)?;
    if raw_page.game_id == 0 {
        return Err(parse_err(
            Category::PlayByPlay,
            page_index,
            "gameId must be nonzero",
        ));
    }
    let game_id = GameId::new(raw_page.game_id);

    let mut plays = Vec::with_capacity(raw_page.plays.len());
    for (index, value) in raw_page.plays.iter().enumerate() {
        let raw: RawPlay = record(Category::PlayByPlay, index, value).map_err(|e| match e {
            IngestError::Parse { index, message, .. } => IngestError::Parse {
                category: Category::PlayByPlay,
                index,
                message: format!("game {game_id}: {message}"),
            },
            other => other,
        })?;
        if raw.period == 0 {
            return Err(parse_err(
                Category::PlayByPlay,
                index,
                format!("game {game_id}: period must be at least 1"),
            ));
        }
        if raw.description.trim().is_empty() {
            return Err(parse_err(
                Category::PlayByPlay,
                index,
                format!("game {game_id}: description must not be empty"),
            ));
        }
        plays.push(Play {
            game_id,
            sequence: raw.sequence,
            team_id: raw.team_id.map(TeamId::new),
            period: raw.period,
            clock: raw.clock,
            description: raw.description,
            home_score: raw.home_score,
            away_score: raw.away_score,
        });
    }

    Ok(plays)
}

/// Parse the box-score payload (one page per game) into player rows and
/// per-player-per-game stat lines.
///
/// Players repeat across games; the roster output is deduplicated by
/// external id with the last occurrence winning. Stat lines deduplicate on
/// the (game, player) key the store is unique on.
pub fn parse_box_scores(payload: &Value) -> Result<(Vec<Player>, Vec<PlayerGameStat>)> {
    let pages = payload_array(Category::BoxScore, payload)?;

    let per_game: Vec<(Vec<Player>, Vec<PlayerGameStat>)> = pages
        .par_iter()
        .enumerate()
        .map(|(page_index, page)| parse_game_box_score(page_index, page))
        .collect::<Result<Vec<_>>>()?;

    let mut players: BTreeMap<PlayerId, Player> = BTreeMap::new();
    let mut stats: BTreeMap<(GameId, PlayerId), PlayerGameStat> = BTreeMap::new();
    for (page_players, page_stats) in per_game {
        for player in page_players {
            players.insert(player.player_id, player);
        }
        for stat in page_stats {
            stats.insert((stat.game_id, stat.player_id), stat);
        }
    }

    Ok((
        players.into_values().collect(),
        stats.into_values().collect(),
    ))
}

fn parse_game_box_score(
    page_index: usize,
    page: &Value,
) -> Result<(Vec<Player>, Vec<PlayerGameStat>)> {
    let raw_page: RawBoxScorePage = record(Category::BoxScore, page_index, page)?;
    if raw_page.game_id == 0 {
        return Err(parse_err(
            Category::BoxScore,
            page_index,
            "gameId must be nonzero",
        ));
    }
    let game_id = GameId::new(raw_page.game_id);

    let mut players = Vec::with_capacity(raw_page.players.len());
    let mut stats = Vec::with_capacity(raw_page.players.len());
    for (index, value) in raw_page.players.iter().enumerate() {
        let raw: RawPlayerLine = record(Category::BoxScore, index, value)?;
        if raw.player_id == 0 {
            return Err(parse_err(
                Category::BoxScore,
                index,
                format!("game {game_id}: playerId must be nonzero"),
            ));
        }
        if raw.name.trim().is_empty() {
            return Err(parse_err(
                Category::BoxScore,
                index,
                format!("game {game_id}: player name must not be empty"),
            ));
        }
        let player_id = PlayerId::new(raw.player_id);
        players.push(Player {
            player_id,
            name: raw.name,
            position: raw.position,
            team_id: raw.team_id.map(TeamId::new),
        });
        stats.push(PlayerGameStat {
            game_id,
            player_id,
            minutes: raw.minutes,
            points: raw.points,
            rebounds: raw.rebounds,
            assists: raw.assists,
            steals: raw.steals,
            blocks: raw.blocks,
            turnovers: raw.turnovers,
            field_goals_made: raw.field_goals_made,
            field_goals_attempted: raw.field_goals_attempted,
            three_pointers_made: raw.three_pointers_made,
            three_pointers_attempted: raw.three_pointers_attempted,
            free_throws_made: raw.free_throws_made,
            free_throws_attempted: raw.free_throws_attempted,
        });
    }

    Ok((players, stats))
}
