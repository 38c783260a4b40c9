//! Raw payload types as the provider serves them.
//!
//! These deserialize straight off the wire and stay separate from the
//! storage models; the parse layer validates and converts between the two.
//! Per-record fields the provider may omit carry `#[serde(default)]` so a
//! missing stat reads as zero rather than a hard failure, while identifying
//! fields stay required.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct RawTeam {
    #[serde(rename = "teamId")]
    pub team_id: u32,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGame {
    #[serde(rename = "gameId")]
    pub game_id: u64,
    /// Tipoff instant, RFC 3339.
    pub tipoff: String,
    #[serde(rename = "homeTeamId")]
    pub home_team_id: u32,
    #[serde(rename = "awayTeamId")]
    pub away_team_id: u32,
    pub status: String,
    #[serde(rename = "homeScore", default)]
    pub home_score: Option<u32>,
    #[serde(rename = "awayScore", default)]
    pub away_score: Option<u32>,
}

/// One game's page of the play-by-play payload.
///
/// Plays stay as raw values here so each element can be deserialized
/// individually and a violation reported with its index.
#[derive(Debug, Deserialize)]
pub struct RawPlayPage {
    #[serde(rename = "gameId")]
    pub game_id: u64,
    #[serde(default)]
    pub plays: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlay {
    pub sequence: u32,
    #[serde(rename = "teamId", default)]
    pub team_id: Option<u32>,
    pub period: u32,
    #[serde(default)]
    pub clock: Option<String>,
    pub description: String,
    #[serde(rename = "homeScore", default)]
    pub home_score: Option<u32>,
    #[serde(rename = "awayScore", default)]
    pub away_score: Option<u32>,
}

/// One game's page of the box-score payload.
#[derive(Debug, Deserialize)]
pub struct RawBoxScorePage {
    #[serde(rename = "gameId")]
    pub game_id: u64,
    #[serde(default)]
    pub players: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawPlayerLine {
    #[serde(rename = "playerId")]
    pub player_id: u32,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(rename = "teamId", default)]
    pub team_id: Option<u32>,
    #[serde(default)]
    pub minutes: Option<f64>,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub rebounds: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub steals: u32,
    #[serde(default)]
    pub blocks: u32,
    #[serde(default)]
    pub turnovers: u32,
    #[serde(rename = "fieldGoalsMade", default)]
    pub field_goals_made: u32,
    #[serde(rename = "fieldGoalsAttempted", default)]
    pub field_goals_attempted: u32,
    #[serde(rename = "threePointersMade", default)]
    pub three_pointers_made: u32,
    #[serde(rename = "threePointersAttempted", default)]
    pub three_pointers_attempted: u32,
    #[serde(rename = "freeThrowsMade", default)]
    pub free_throws_made: u32,
    #[serde(rename = "freeThrowsAttempted", default)]
    pub free_throws_attempted: u32,
}
