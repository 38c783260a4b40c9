//! Dependency-ordered bulk reset for force-mode reimports.
//!
//! Tables clear in reverse-dependency order so no row is deleted while a
//! referencing row still exists. Foreign-key enforcement is suspended for
//! the duration of the reset window through an RAII guard that restores it
//! on every exit path, including failure. A table that cannot be cleared
//! becomes a warning rather than aborting the run; downstream tables are
//! already empty at that point and a best-effort clear beats leaving the
//! store half-reset.

use super::schema::LeagueDatabase;
use crate::error::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::fmt;

/// Clear order: children before parents.
pub const RESET_ORDER: [&str; 6] = [
    "player_games",
    "plays",
    "game_teams",
    "games",
    "players",
    "teams",
];

/// One table that could not be cleared. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetWarning {
    pub table: String,
    pub message: String,
}

impl fmt::Display for ResetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not clear {}: {}", self.table, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearedTable {
    pub table: String,
    pub rows: u64,
    /// True when the bulk delete was rejected and rows went one at a time.
    pub fallback: bool,
}

/// Outcome of one reset pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResetReport {
    pub cleared: Vec<ClearedTable>,
    pub warnings: Vec<ResetWarning>,
}

/// Scoped suspension of foreign-key enforcement.
///
/// Enforcement comes back on when the guard drops, whichever way the reset
/// exits.
struct ForeignKeyGuard<'c> {
    conn: &'c Connection,
}

impl<'c> ForeignKeyGuard<'c> {
    fn suspend(conn: &'c Connection) -> rusqlite::Result<Self> {
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self { conn })
    }
}

impl Drop for ForeignKeyGuard<'_> {
    fn drop(&mut self) {
        // Nothing useful to do with a failure here; the connection is torn
        // down with the process anyway.
        let _ = self.conn.pragma_update(None, "foreign_keys", true);
    }
}

impl LeagueDatabase {
    /// Clear all six tables for a full reimport.
    ///
    /// Invoked only when the operator explicitly requests force mode.
    pub fn reset(&mut self) -> Result<ResetReport> {
        let guard = ForeignKeyGuard::suspend(&self.conn)?;

        let mut report = ResetReport::default();
        for table in RESET_ORDER {
            match clear_table(&self.conn, table) {
                Ok(cleared) => report.cleared.push(cleared),
                Err(e) => report.warnings.push(ResetWarning {
                    table: table.to_string(),
                    message: e.to_string(),
                }),
            }
        }

        drop(guard);
        Ok(report)
    }
}

fn clear_table(conn: &Connection, table: &str) -> rusqlite::Result<ClearedTable> {
    let rows: u64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    if rows == 0 {
        return Ok(ClearedTable {
            table: table.to_string(),
            rows: 0,
            fallback: false,
        });
    }

    match conn.execute(&format!("DELETE FROM {table}"), []) {
        Ok(_) => Ok(ClearedTable {
            table: table.to_string(),
            rows,
            fallback: false,
        }),
        // Bulk delete rejected; fall back to deleting row by row.
        Err(_) => {
            clear_table_by_row(conn, table)?;
            Ok(ClearedTable {
                table: table.to_string(),
                rows,
                fallback: true,
            })
        }
    }
}

pub(crate) fn clear_table_by_row(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    let rowids: Vec<i64> = {
        let mut stmt = conn.prepare(&format!("SELECT rowid FROM {table}"))?;
        let ids = stmt.query_map([], |row| row.get(0))?;
        ids.collect::<rusqlite::Result<Vec<i64>>>()?
    };
    for rowid in rowids {
        conn.execute(
            &format!("DELETE FROM {table} WHERE rowid = ?1"),
            params![rowid],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::TeamId;
    use crate::storage::models::Team;

    fn db_with_teams() -> LeagueDatabase {
        let mut db = LeagueDatabase::open_in_memory().unwrap();
        let teams: Vec<Team> = (1..=3)
            .map(|i| Team {
                team_id: TeamId::new(i),
                name: format!("Team {i}"),
                abbreviation: format!("T{i}"),
                conference: None,
                division: None,
            })
            .collect();
        db.persist_teams(&teams).unwrap();
        db
    }

    fn foreign_keys_enabled(db: &LeagueDatabase) -> bool {
        db.conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get::<_, bool>(0))
            .unwrap()
    }

    #[test]
    fn test_reset_clears_and_reports_counts() {
        let mut db = db_with_teams();

        let report = db.reset().unwrap();
        assert!(report.warnings.is_empty());
        assert_eq!(report.cleared.len(), RESET_ORDER.len());

        let teams_entry = report.cleared.iter().find(|c| c.table == "teams").unwrap();
        assert_eq!(teams_entry.rows, 3);
        assert!(!teams_entry.fallback);
        assert_eq!(db.table_counts().unwrap().teams, 0);
    }

    #[test]
    fn test_reset_restores_foreign_key_enforcement() {
        let mut db = db_with_teams();
        assert!(foreign_keys_enabled(&db));
        db.reset().unwrap();
        assert!(foreign_keys_enabled(&db));
    }

    #[test]
    fn test_guard_restores_enforcement_when_dropped_early() {
        let db = LeagueDatabase::open_in_memory().unwrap();
        {
            let _guard = ForeignKeyGuard::suspend(&db.conn).unwrap();
            assert!(!foreign_keys_enabled(&db));
        }
        assert!(foreign_keys_enabled(&db));
    }

    #[test]
    fn test_unclearable_table_becomes_warning_and_reset_continues() {
        let mut db = db_with_teams();
        // Simulate the store rejecting one table's clear entirely.
        db.conn.execute("DROP TABLE plays", []).unwrap();

        let report = db.reset().unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].table, "plays");
        // The tables after the failing one still cleared.
        assert_eq!(db.count("teams").unwrap(), 0);
        assert!(foreign_keys_enabled(&db));
    }

    #[test]
    fn test_clear_table_by_row_drains_a_populated_table() {
        let db = db_with_teams();
        clear_table_by_row(&db.conn, "teams").unwrap();
        assert_eq!(db.count("teams").unwrap(), 0);
    }

    #[test]
    fn test_reset_on_empty_store_is_a_no_op() {
        let mut db = LeagueDatabase::open_in_memory().unwrap();
        let report = db.reset().unwrap();
        assert!(report.warnings.is_empty());
        assert!(report.cleared.iter().all(|c| c.rows == 0));
    }
}
