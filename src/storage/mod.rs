//! Storage layer for the WNBA ingestion pipeline
//!
//! A thin abstraction over the SQLite store, organized into logical
//! components:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Per-category persistence and count queries
//! - `reset`: Dependency-ordered bulk clear for force mode

pub mod models;
pub mod queries;
pub mod reset;
pub mod schema;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use reset::{ResetReport, ResetWarning, RESET_ORDER};
pub use schema::LeagueDatabase;
