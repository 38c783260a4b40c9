//! External data provider boundary.
//!
//! The provider is an opaque JSON-over-HTTP source keyed by [`Category`].
//! [`DataProvider`] is the seam the pipeline is generic over, so tests can
//! swap the real [`HttpProvider`] for canned payloads.

pub mod http;
pub mod parse;
pub mod types;

use crate::cli::types::{GameId, Season};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;

pub use http::HttpProvider;

/// One data kind ingested per run, in dependency order.
///
/// Later categories reference rows created by earlier ones, so the order of
/// [`Category::ALL`] is load-bearing: a game row must exist before a play or
/// a player-game stat row referencing it can be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Teams,
    Schedule,
    PlayByPlay,
    BoxScore,
}

impl Category {
    /// All categories in run order.
    pub const ALL: [Category; 4] = [
        Category::Teams,
        Category::Schedule,
        Category::PlayByPlay,
        Category::BoxScore,
    ];

    /// The category that runs after this one, if any.
    pub fn next(self) -> Option<Category> {
        match self {
            Category::Teams => Some(Category::Schedule),
            Category::Schedule => Some(Category::PlayByPlay),
            Category::PlayByPlay => Some(Category::BoxScore),
            Category::BoxScore => None,
        }
    }

    /// 1-based position in the run order, for progress lines.
    pub fn step(self) -> usize {
        match self {
            Category::Teams => 1,
            Category::Schedule => 2,
            Category::PlayByPlay => 3,
            Category::BoxScore => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Teams => "teams",
            Category::Schedule => "schedule",
            Category::PlayByPlay => "play-by-play",
            Category::BoxScore => "box score",
        };
        write!(f, "{name}")
    }
}

/// Retrieves the raw payload for one category.
///
/// Pure I/O with no persistence side effects. `game_ids` carries the games
/// persisted by the schedule stage; it is only consulted for the two
/// per-game categories and is empty before the schedule has loaded.
pub trait DataProvider {
    fn fetch(
        &self,
        category: Category,
        season: Season,
        game_ids: &[GameId],
    ) -> impl Future<Output = Result<Value>> + Send;
}
