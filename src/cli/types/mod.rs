//! Type-safe wrappers shared between the CLI, provider, and storage layers.

pub mod ids;
pub mod time;

pub use ids::{GameId, PlayerId, TeamId};
pub use time::Season;
