//! Data models for the storage layer

use crate::cli::types::{GameId, PlayerId, Season, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// League team, unique by provider-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub team_id: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub conference: Option<String>,
    pub division: Option<String>,
}

/// Player, unique by provider-assigned id.
///
/// The team reference is the player's current team, a weak lookup rather
/// than ownership; players without a team (free agents) carry `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    pub position: Option<String>,
    pub team_id: Option<TeamId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    /// Parse a provider status string; unknown values return `None` so the
    /// caller can report the violation with record context.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(GameStatus::Scheduled),
            "in_progress" => Some(GameStatus::InProgress),
            "final" => Some(GameStatus::Final),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::InProgress => "in_progress",
            GameStatus::Final => "final",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scheduled or completed game, unique by provider-assigned id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub game_id: GameId,
    pub season: Season,
    pub scheduled_at: DateTime<Utc>,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub status: GameStatus,
}

/// Per-team game context, unique on (game, team)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTeam {
    pub game_id: GameId,
    pub team_id: TeamId,
    pub is_home: bool,
    pub points: Option<u32>,
}

/// Sequence-numbered in-game event.
///
/// Neutral events such as period boundaries carry no team reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub game_id: GameId,
    pub sequence: u32,
    pub team_id: Option<TeamId>,
    pub period: u32,
    pub clock: Option<String>,
    pub description: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

/// One player's stat line for one game, unique on (game, player)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGameStat {
    pub game_id: GameId,
    pub player_id: PlayerId,
    pub minutes: Option<f64>,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_pointers_made: u32,
    pub three_pointers_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
}

/// Row counts per table, the post-run completeness report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
    pub teams: u64,
    pub players: u64,
    pub games: u64,
    pub game_teams: u64,
    pub plays: u64,
    pub player_games: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_status_round_trip() {
        for status in [GameStatus::Scheduled, GameStatus::InProgress, GameStatus::Final] {
            assert_eq!(GameStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_game_status_rejects_unknown() {
        assert_eq!(GameStatus::parse("postponed"), None);
        assert_eq!(GameStatus::parse("FINAL"), None);
        assert_eq!(GameStatus::parse(""), None);
    }
}
