//! Pipeline orchestration.
//!
//! One run walks the stage machine below; each fetching stage runs
//! fetch, parse, and persist for its category to completion before the
//! next stage starts. Any stage error aborts the run, because later
//! categories reference rows the failed one should have created. Runs are
//! not resumable from a failed midpoint; operators re-invoke from the
//! start, optionally with force.

use crate::cli::types::{GameId, Season};
use crate::error::{IngestError, Result};
use crate::provider::{
    parse::{parse_box_scores, parse_play_by_play, parse_schedule, parse_teams},
    Category, DataProvider,
};
use crate::storage::{LeagueDatabase, ResetWarning, TableCounts};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation, checked at stage boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Stages of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Resetting,
    Fetching(Category),
    Summarizing,
    Done,
    Failed,
}

impl Stage {
    /// Successor in a healthy run. `Failed` is only entered on error and
    /// never left.
    pub fn next(self, force: bool) -> Stage {
        match self {
            Stage::Idle if force => Stage::Resetting,
            Stage::Idle => Stage::Fetching(Category::Teams),
            Stage::Resetting => Stage::Fetching(Category::Teams),
            Stage::Fetching(category) => match category.next() {
                Some(next) => Stage::Fetching(next),
                None => Stage::Summarizing,
            },
            Stage::Summarizing => Stage::Done,
            Stage::Done => Stage::Done,
            Stage::Failed => Stage::Failed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Resetting => write!(f, "resetting"),
            Stage::Fetching(category) => write!(f, "fetching {category}"),
            Stage::Summarizing => write!(f, "summarizing"),
            Stage::Done => write!(f, "done"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

/// Post-run report: per-table row counts plus any reset warnings.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub counts: TableCounts,
    pub reset_warnings: Vec<ResetWarning>,
}

/// Sequences the four categories through fetch, parse, and persist.
pub struct Pipeline<'a, P: DataProvider> {
    provider: &'a P,
    db: &'a mut LeagueDatabase,
    season: Season,
    cancel: CancelFlag,
    verbose: bool,
    stage: Stage,
}

impl<'a, P: DataProvider> Pipeline<'a, P> {
    pub fn new(provider: &'a P, db: &'a mut LeagueDatabase, season: Season) -> Self {
        Self {
            provider,
            db,
            season,
            cancel: CancelFlag::new(),
            verbose: false,
            stage: Stage::Idle,
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// The stage the run last entered.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the pipeline to completion.
    ///
    /// Any error leaves the machine in `Failed`; already-committed
    /// categories stay committed.
    pub async fn run(&mut self, force: bool) -> Result<RunSummary> {
        let result = self.drive(force).await;
        if result.is_err() {
            self.stage = Stage::Failed;
        }
        result
    }

    async fn drive(&mut self, force: bool) -> Result<RunSummary> {
        self.stage = Stage::Idle;
        let mut reset_warnings = Vec::new();

        if force {
            self.enter(Stage::Resetting)?;
            println!("Force mode: clearing existing league data...");
            let report = self.db.reset()?;
            for cleared in &report.cleared {
                if self.verbose && cleared.rows > 0 {
                    let how = if cleared.fallback { " (row-by-row)" } else { "" };
                    println!("  cleared {} rows from {}{}", cleared.rows, cleared.table, how);
                }
            }
            for warning in &report.warnings {
                println!("⚠ {warning}");
            }
            reset_warnings = report.warnings;
        }

        // Game ids persisted by the schedule stage; the two per-game
        // categories fetch against them.
        let mut game_ids: Vec<GameId> = Vec::new();

        let mut category = Some(Category::Teams);
        while let Some(current) = category {
            self.enter(Stage::Fetching(current))?;
            println!("Step {}/4: importing {} data...", current.step(), current);
            let loaded = self.run_category(current, &mut game_ids).await?;
            println!("✓ {} import complete ({} records)", current, loaded);
            category = current.next();
        }

        self.enter(Stage::Summarizing)?;
        let counts = self.db.table_counts()?;
        self.stage = Stage::Done;

        Ok(RunSummary {
            counts,
            reset_warnings,
        })
    }

    /// Stage-boundary transition; the cancellation point.
    fn enter(&mut self, next: Stage) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(IngestError::Cancelled {
                stage: next.to_string(),
            });
        }
        self.stage = next;
        Ok(())
    }

    async fn run_category(
        &mut self,
        category: Category,
        game_ids: &mut Vec<GameId>,
    ) -> Result<usize> {
        let payload = self.provider.fetch(category, self.season, game_ids).await?;

        match category {
            Category::Teams => {
                let teams = parse_teams(&payload)?;
                self.db.persist_teams(&teams)
            }
            Category::Schedule => {
                let (games, game_teams) = parse_schedule(&payload, self.season)?;
                *game_ids = games.iter().map(|g| g.game_id).collect();
                self.db.persist_schedule(&games, &game_teams)
            }
            Category::PlayByPlay => {
                let plays = parse_play_by_play(&payload)?;
                self.db.persist_plays(&plays)
            }
            Category::BoxScore => {
                let (players, stats) = parse_box_scores(&payload)?;
                self.db.persist_box_scores(&players, &stats)
            }
        }
    }
}
